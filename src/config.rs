use serde::{Deserialize, Serialize};

/// Which persistence backend serves the item collection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated. "*" allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// MongoDB connection string
    #[serde(default = "default_mongo_url")]
    pub mongo_url: String,

    /// MongoDB database name
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Collection holding the items
    #[serde(default = "default_items_collection")]
    pub items_collection: String,

    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        // Load from environment variables using envy
        Ok(envy::from_env::<Config>()?)
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "prod" || self.environment.to_lowercase() == "production"
    }

    /// Allowed CORS origins, or `None` when any origin is accepted
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: default_cors_origins(),
            log_level: default_log_level(),
            mongo_url: default_mongo_url(),
            db_name: default_db_name(),
            items_collection: default_items_collection(),
            store_backend: default_store_backend(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] envy::Error),
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_mongo_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_db_name() -> String {
    "crud_lab".to_string()
}

fn default_items_collection() -> String {
    "items".to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Mongodb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.server_address(), "0.0.0.0:8001");
        assert_eq!(config.mongo_url, "mongodb://localhost:27017");
        assert_eq!(config.db_name, "crud_lab");
        assert_eq!(config.items_collection, "items");
        assert_eq!(config.store_backend, StoreBackend::Mongodb);
        assert!(!config.is_production());
    }

    #[test]
    fn reads_database_and_backend_settings() {
        let config = from_pairs(&[
            ("MONGO_URL", "mongodb://db:27017"),
            ("DB_NAME", "lab"),
            ("STORE_BACKEND", "memory"),
            ("ENVIRONMENT", "Production"),
        ]);
        assert_eq!(config.mongo_url, "mongodb://db:27017");
        assert_eq!(config.db_name, "lab");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.is_production());
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let config = from_pairs(&[("CORS_ORIGINS", "https://a.test, *")]);
        assert_eq!(config.allowed_origins(), None);
    }

    #[test]
    fn explicit_origins_are_trimmed() {
        let config = from_pairs(&[("CORS_ORIGINS", "https://a.test, https://b.test,")]);
        assert_eq!(
            config.allowed_origins(),
            Some(vec!["https://a.test".to_string(), "https://b.test".to_string()])
        );
    }
}
