pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::Claims;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use issuer::TokenIssuer;
pub use issuer::TOKEN_ISSUER;
pub use issuer::TOKEN_VALIDITY_MINUTES;
