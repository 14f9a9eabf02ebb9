use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AdminCredentials;

/// Errors raised while assembling the startup configuration. Any of these is fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Only development may run without one, on the
    /// in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub store_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Signing secret and the single admin identity. Never serialized.
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub cors_permissive: bool,
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    pub fn new(
        jwt_secret: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            admin: AdminCredentials::new(admin_username, admin_password),
            cors_permissive: true,
            cors_origins: Vec::new(),
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("admin", &self.admin)
            .field("cors_permissive", &self.cors_permissive)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP mail relay endpoint. Messages are only logged when unset.
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub from: String,
    pub feedback_inbox: String,
    /// PNG embedded in the thank-you mail
    pub thank_you_image: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ConfigError::Missing(key)),
            }
        };

        let security = SecurityConfig::new(
            required("JWT_SECRET_KEY")?,
            required("ADMIN_USERNAME")?,
            required("ADMIN_PASSWORD")?,
        );

        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(security),
            Environment::Staging => Self::staging(security),
            Environment::Development => Self::development(security),
        };

        let config = config.with_overrides(&lookup)?;

        if config.environment != Environment::Development && config.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var(lookup, "PORT")? {
            self.server.port = port;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(v);
        }
        if let Some(n) = parse_var(lookup, "DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = n;
        }
        if let Some(secs) = parse_var::<u64, F>(lookup, "STORE_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "STORE_TIMEOUT_SECS",
                    value: secs.to_string(),
                });
            }
            self.database.store_timeout_secs = secs;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.security.cors_permissive = false;
        }

        // Mail overrides
        if let Some(v) = lookup("MAIL_API_URL").filter(|v| !v.trim().is_empty()) {
            url::Url::parse(&v).map_err(|_| ConfigError::Invalid {
                key: "MAIL_API_URL",
                value: v.clone(),
            })?;
            self.mail.api_url = Some(v);
        }
        if let Some(v) = lookup("MAIL_API_KEY").filter(|v| !v.is_empty()) {
            self.mail.api_key = Some(v);
        }
        if let Some(v) = lookup("MAIL_FROM").filter(|v| !v.is_empty()) {
            self.mail.from = v;
        }
        if let Some(v) = lookup("FEEDBACK_INBOX").filter(|v| !v.is_empty()) {
            self.mail.feedback_inbox = v;
        }
        if let Some(v) = lookup("THANK_YOU_IMAGE_PATH").filter(|v| !v.trim().is_empty()) {
            self.mail.thank_you_image = Some(v);
        }

        Ok(self)
    }

    pub fn development(security: SecurityConfig) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                store_timeout_secs: 5,
            },
            security,
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from: "no-reply@localhost".to_string(),
                feedback_inbox: "feedback@localhost".to_string(),
                thank_you_image: None,
            },
        }
    }

    fn staging(security: SecurityConfig) -> Self {
        let mut config = Self::development(security);
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.security.cors_permissive = false;
        config
    }

    fn production(security: SecurityConfig) -> Self {
        let mut config = Self::development(security);
        config.environment = Environment::Production;
        config.database.max_connections = 20;
        config.database.store_timeout_secs = 10;
        config.security.cors_permissive = false;
        config
    }
}

/// Parse an optional numeric variable. Present but malformed is an error.
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(None),
    }
}
