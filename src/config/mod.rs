use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub log_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub public_key_path: Option<PathBuf>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

pub const DEFAULT_PORT: u16 = 3000;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Some(v) = lookup("STORE_BACKEND") {
            match v.to_ascii_lowercase().as_str() {
                "memory" => self.database.backend = StoreBackend::Memory,
                "postgres" | "postgresql" => self.database.backend = StoreBackend::Postgres,
                other => tracing::warn!("Unknown STORE_BACKEND '{}', keeping {:?}", other, self.database.backend),
            }
        }
        self.database.url = lookup("DATABASE_URL").or(self.database.url.take());
        self.database.user = lookup("DB_USER").or(self.database.user.take());
        self.database.password = lookup("DB_PASS").or(self.database.password.take());
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Identity overrides
        self.identity.jwt_secret = lookup("IDENTITY_JWT_SECRET").filter(|s| !s.is_empty());
        self.identity.public_key_path = lookup("IDENTITY_PUBLIC_KEY_PATH").map(PathBuf::from);
        self.identity.issuer = lookup("IDENTITY_ISSUER");
        self.identity.audience = lookup("IDENTITY_AUDIENCE");

        if let Some(v) = lookup("LOG_FILTER") {
            self.log_filter = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: DEFAULT_PORT,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                user: None,
                password: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            identity: IdentityConfig::default(),
            log_filter: "virtual_bookshelf=debug,tower_http=debug".to_string(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: DEFAULT_PORT,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                user: None,
                password: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            identity: IdentityConfig::default(),
            log_filter: "virtual_bookshelf=info,tower_http=info".to_string(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: DEFAULT_PORT,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                user: None,
                password: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            identity: IdentityConfig::default(),
            log_filter: "virtual_bookshelf=info,tower_http=warn".to_string(),
        }
    }
}
