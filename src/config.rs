use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::backup::BackupError;

/// Development fallback for the token secret when `AUTH_SECRET` is unset.
pub const DEFAULT_AUTH_SECRET: &str = "secret_key";

/// File the backup tooling reads its PostgreSQL credentials from.
pub const CREDENTIALS_FILE: &str = "credentials.env";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone, Default)]
pub struct PaymentConfig {
    pub api_key: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthConfig {
    /// True when the secret is still the built-in development value.
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_AUTH_SECRET
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: parse_origins(
                    &env::var("ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
                ),
            },
            auth: AuthConfig {
                secret: env::var("AUTH_SECRET")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_AUTH_SECRET.to_string()),
            },
            payment: PaymentConfig {
                api_key: env::var("PAYMENT_API_KEY").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// PostgreSQL connection settings used by `pg_dump`, `createdb` and `psql`.
#[derive(Clone)]
pub struct BackupConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Only required when taking a backup.
    pub backup_path: Option<PathBuf>,
}

impl fmt::Debug for BackupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("backup_path", &self.backup_path)
            .finish()
    }
}

impl BackupConfig {
    /// Load `credentials.env` (if present) and read the PostgreSQL settings.
    pub fn from_env() -> std::result::Result<Self, BackupError> {
        dotenvy::from_filename(CREDENTIALS_FILE).ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, BackupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BackupError::MissingVar(key.to_string()))
        };

        Ok(Self {
            host: required("POSTGRES_HOST")?,
            port: lookup("POSTGRES_PORT")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "5432".to_string()),
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            database: required("POSTGRES_DATABASE")?,
            backup_path: lookup("BACKUP_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn require_backup_path(&self) -> std::result::Result<&PathBuf, BackupError> {
        self.backup_path
            .as_ref()
            .ok_or_else(|| BackupError::MissingVar("BACKUP_PATH".to_string()))
    }
}
