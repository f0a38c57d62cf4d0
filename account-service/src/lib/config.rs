use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const MIN_JWT_SECRET_BYTES: usize = 32;
// Ten years.
const MAX_JWT_EXPIRATION_SECONDS: i64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    /// Absent means the in-memory store is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: i64,
}

/// Argon2id work factor for newly hashed passwords.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_seconds() -> i64 {
    3600
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        if self.jwt.expiration_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_seconds must be positive".to_string(),
            ));
        }

        if self.jwt.expiration_seconds > MAX_JWT_EXPIRATION_SECONDS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_seconds must be at most {}",
                MAX_JWT_EXPIRATION_SECONDS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, expiration_seconds: i64) -> Config {
        Config {
            server: ServerConfig { http_port: 8080 },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_seconds,
            },
            password: PasswordConfig::default(),
            database: None,
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        let config = config("test-secret-key-for-jwt-signing-at-least-32-bytes", 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        assert!(config("too-short", 3600).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_expiration() {
        let config = config("test-secret-key-for-jwt-signing-at-least-32-bytes", 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_expiration() {
        let secret = "test-secret-key-for-jwt-signing-at-least-32-bytes";

        assert!(config(secret, MAX_JWT_EXPIRATION_SECONDS).validate().is_ok());
        assert!(config(secret, MAX_JWT_EXPIRATION_SECONDS + 1)
            .validate()
            .is_err());
        assert!(config(secret, 10_000_000_000_000).validate().is_err());
    }

    #[test]
    fn test_password_defaults_match_argon2() {
        let defaults = PasswordConfig::default();
        assert_eq!(defaults.memory_kib, 19 * 1024);
        assert_eq!(defaults.iterations, 2);
        assert_eq!(defaults.parallelism, 1);
    }

    #[test]
    fn test_deserialize_without_optional_sections() {
        let config: Config = ConfigBuilder::builder()
            .set_override("server.http_port", 9000)
            .unwrap()
            .set_override("jwt.secret", "test-secret-key-for-jwt-signing-at-least-32-bytes")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.jwt.expiration_seconds, 3600);
        assert_eq!(config.password, PasswordConfig::default());
        assert!(config.database.is_none());
    }
}
