use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret used when no ACCESS_TOKEN_SECRET is configured in development.
const DEV_TOKEN_SECRET: &str = "notes-api-development-secret";

/// Accepted access token lifetimes, up to ten years.
const TOKEN_EXPIRY_HOURS: std::ops::RangeInclusive<u64> = 1..=87_600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ACCESS_TOKEN_SECRET must be set in {0:?} mode")]
    MissingTokenSecret(Environment),

    #[error("SECURITY_JWT_EXPIRY_HOURS must be between 1 and 87600, got {0}")]
    InvalidTokenExpiry(u64),

    #[error("DATABASE_URL must be set when using the postgres store")]
    MissingDatabaseUrl,

    #[error("Unknown store kind: {0}")]
    UnknownStore(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub notes: NotesConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    pub list_page_size: u32,
    pub search_page_size: u32,
    pub max_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Some(port) = env::var("NOTES_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("NOTES_STORE") {
            self.server.store = v.parse()?;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Notes overrides
        if let Ok(v) = env::var("NOTES_MAX_LIMIT") {
            self.notes.max_limit = v.parse().unwrap_or(self.notes.max_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    /// Checks the settings that cannot be defaulted safely. Run after all
    /// overrides (env and command line) are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingTokenSecret(self.environment));
        }
        if !TOKEN_EXPIRY_HOURS.contains(&self.security.jwt_expiry_hours) {
            return Err(ConfigError::InvalidTokenExpiry(self.security.jwt_expiry_hours));
        }
        if self.server.store == StoreKind::Postgres && self.database.url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.security.jwt_secret == DEV_TOKEN_SECRET
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8000,
                store: StoreKind::Postgres,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            notes: NotesConfig {
                list_page_size: 9,
                search_page_size: 10,
                max_limit: 1000,
            },
            security: SecurityConfig {
                jwt_secret: DEV_TOKEN_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8000,
                store: StoreKind::Postgres,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            notes: NotesConfig {
                list_page_size: 9,
                search_page_size: 10,
                max_limit: 500,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8000,
                store: StoreKind::Postgres,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            notes: NotesConfig {
                list_page_size: 9,
                search_page_size: 10,
                max_limit: 100,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    /// In-memory configuration for tests and local demos.
    pub fn for_memory_store(secret: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.server.store = StoreKind::Memory;
        config.security.jwt_secret = secret.into();
        config
    }
}
