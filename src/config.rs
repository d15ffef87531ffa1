use config::{Config, Environment};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Volatile store, for local demos; everything is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub environment: String,
    pub frontend_urls: Vec<String>,
    pub jwt_secret: Option<String>,
    pub default_created_by: Option<i64>,
    pub docs_url: String,
    pub storage: StorageBackend,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
}

fn optional(source: &Config, key: &str) -> Option<String> {
    source
        .get_string(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let source = Config::builder()
            .add_source(Environment::default())
            .build()?;

        Self::from_source(&source)
    }

    /// Builds the configuration from already-collected settings; keys are the
    /// lower-cased environment variable names.
    pub fn from_source(source: &Config) -> Result<Self, ConfigError> {
        let environment = optional(source, "environment").unwrap_or_else(|| "development".to_string());

        let port = optional(source, "server_port")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidFormat("SERVER_PORT must be a valid port number".to_string()))?;

        let storage = match optional(source, "storage").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidFormat(format!(
                    "STORAGE must be 'postgres' or 'memory', got '{}'",
                    other
                )))
            }
        };

        let database_url = optional(source, "database_url");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVariable("DATABASE_URL".to_string()));
        }

        let database_max_connections = optional(source, "database_max_connections")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidFormat("DATABASE_MAX_CONNECTIONS must be a positive number".to_string())
            })?;

        // Parse allowed origins
        let frontend_urls = optional(source, "cors_allowed_origins")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let default_created_by = match optional(source, "default_created_by") {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| {
                        ConfigError::InvalidFormat("DEFAULT_CREATED_BY must be a positive user id".to_string())
                    })?,
            ),
            None if environment == "development" => Some(1),
            None => None,
        };

        let docs_url = optional(source, "docs_url").unwrap_or_else(|| format!("http://localhost:{}/docs/", port));

        Ok(AppConfig {
            database_url,
            database_max_connections,
            port,
            environment,
            frontend_urls,
            jwt_secret: optional(source, "jwt_secret"),
            default_created_by,
            docs_url,
            storage,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn development_defaults() {
        let config = AppConfig::from_source(&source(&[("database_url", "postgres://localhost/maintenance")])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.is_development());
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.default_created_by, Some(1));
        assert_eq!(config.frontend_urls, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.docs_url, "http://localhost:8080/docs/");
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn production_has_no_placeholder_creator() {
        let config = AppConfig::from_source(&source(&[
            ("database_url", "postgres://db/maintenance"),
            ("environment", "production"),
        ]))
        .unwrap();

        assert!(!config.is_development());
        assert_eq!(config.default_created_by, None);
    }

    #[test]
    fn explicit_placeholder_creator_wins() {
        let config = AppConfig::from_source(&source(&[
            ("storage", "memory"),
            ("environment", "production"),
            ("default_created_by", "9"),
        ]))
        .unwrap();

        assert_eq!(config.default_created_by, Some(9));
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = AppConfig::from_source(&source(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn memory_storage_needs_no_database() {
        let config = AppConfig::from_source(&source(&[("storage", "memory")])).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_source(&source(&[("storage", "memory"), ("server_port", "http")])),
            Err(ConfigError::InvalidFormat(_))
        ));
        assert!(matches!(
            AppConfig::from_source(&source(&[("storage", "sqlite")])),
            Err(ConfigError::InvalidFormat(_))
        ));
        assert!(matches!(
            AppConfig::from_source(&source(&[("storage", "memory"), ("default_created_by", "0")])),
            Err(ConfigError::InvalidFormat(_))
        ));
        assert!(matches!(
            AppConfig::from_source(&source(&[("storage", "memory"), ("database_max_connections", "0")])),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = AppConfig::from_source(&source(&[
            ("storage", "memory"),
            ("cors_allowed_origins", "http://a.test, http://b.test ,"),
            ("server_port", "85"),
        ]))
        .unwrap();

        assert_eq!(config.frontend_urls, vec!["http://a.test".to_string(), "http://b.test".to_string()]);
        assert_eq!(config.docs_url, "http://localhost:85/docs/");
    }
}
