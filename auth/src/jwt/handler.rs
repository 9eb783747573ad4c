use std::fmt;

use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::TokenError;
use crate::secret::SigningSecret;

/// JWT codec for encoding and verifying tokens.
///
/// Generic over the claims type. Signs with HS512 and accepts nothing else.
/// Expiry is deliberately not checked here; the caller compares `exp` against
/// its own clock.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
}

impl JwtHandler {
    /// Create a new JWT handler from a signing secret.
    ///
    /// # Arguments
    /// * `secret` - 64-byte symmetric key
    ///
    /// # Returns
    /// JwtHandler configured with HS512
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS512,
            issuer: None,
        }
    }

    /// Require the `iss` claim to equal `issuer` when decoding.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature (and issuer, if configured) and decode claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, algorithm or issuer check failed, or a claim is missing
    /// * `MalformedToken` - Token is not a decodable JWT
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        // Json errors past this point come from a signed payload, not the header.
        decode_header(token).map_err(|_| TokenError::MalformedToken)?;

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidSubject
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::Json(_) => TokenError::InvalidToken(e.to_string()),
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        iss: String,
    }

    fn secret(byte: u8) -> SigningSecret {
        SigningSecret::from_hex(&format!("{:02x}", byte).repeat(SigningSecret::LENGTH)).unwrap()
    }

    fn claims() -> TestClaims {
        TestClaims {
            sub: "john.doe123".to_string(),
            iss: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(&secret(1));

        let token = handler.encode(&claims()).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded: TestClaims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_header_uses_hs512() {
        let handler = JwtHandler::new(&secret(1));
        let token = handler.encode(&claims()).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let handler = JwtHandler::new(&secret(1));

        let result = handler.decode::<TestClaims>("invalid.token.here");
        assert_eq!(result, Err(TokenError::MalformedToken));

        let result = handler.decode::<TestClaims>("");
        assert_eq!(result, Err(TokenError::MalformedToken));
    }

    #[test]
    fn test_decode_unreadable_header_is_malformed() {
        let handler = JwtHandler::new(&secret(1));

        // Header segments decode to `notjson` and `{}` respectively.
        for token in ["bm90anNvbg.e30.c2ln", "e30.e30.c2ln"] {
            let result = handler.decode::<TestClaims>(token);
            assert_eq!(result, Err(TokenError::MalformedToken), "{token}");
        }
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(&secret(1));
        let handler2 = JwtHandler::new(&secret(2));

        let token = handler1.encode(&claims()).expect("Failed to encode token");

        let result = handler2.decode::<TestClaims>(&token);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_rejects_other_algorithm() {
        let key = secret(1);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims(),
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap();

        let result = JwtHandler::new(&key).decode::<TestClaims>(&token);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_checks_issuer() {
        let key = secret(1);
        let token = JwtHandler::new(&key).encode(&claims()).unwrap();

        let strict = JwtHandler::new(&key).with_issuer("another-issuer");
        let result = strict.decode::<TestClaims>(&token);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));

        let matching = JwtHandler::new(&key).with_issuer("test-issuer");
        assert!(matching.decode::<TestClaims>(&token).is_ok());
    }

    #[test]
    fn test_decode_tampered_payload() {
        let handler = JwtHandler::new(&secret(1));
        let token = handler.encode(&claims()).unwrap();
        let other = handler
            .encode(&TestClaims {
                sub: "someone.else".to_string(),
                iss: "test-issuer".to_string(),
            })
            .unwrap();

        // Splice the other payload under the original signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        let result = handler.decode::<TestClaims>(&forged);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }
}
