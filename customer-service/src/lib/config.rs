use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub collection: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// `secret` is the hex-encoded 64 byte HS512 key. There is no default.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Argon2id cost; omitted values fall back to the library defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HashingConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl HashingConfig {
    pub fn cost(&self) -> auth::HashingCost {
        let defaults = auth::HashingCost::default();
        auth::HashingCost {
            memory_kib: self.memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            parallelism: self.parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=mongodb://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_cost_falls_back_to_defaults() {
        let config = HashingConfig {
            memory_kib: Some(1024),
            iterations: None,
            parallelism: None,
        };

        let cost = config.cost();
        let defaults = auth::HashingCost::default();
        assert_eq!(cost.memory_kib, 1024);
        assert_eq!(cost.iterations, defaults.iterations);
        assert_eq!(cost.parallelism, defaults.parallelism);
    }

    #[test]
    fn test_jwt_secret_is_redacted() {
        let config = JwtConfig {
            secret: "abcdef".to_string(),
        };
        assert!(!format!("{:?}", config).contains("abcdef"));
    }
}
