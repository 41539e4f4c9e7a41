//! Configuration module for the KYUCSA backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Which storage backend holds the site content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackendKind {
    /// SQLite-backed key-value store on local disk
    Local,
    /// PostgREST-style table on a hosted backend
    Remote,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Connection settings for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the project, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous or service key sent as `apikey` and bearer token
    pub api_key: String,
    /// Table holding one row per collection key
    pub table: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for admin routes (required in production)
    pub admin_key: Option<String>,
    /// Path to the SQLite file backing the local store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    pub backend: StoreBackendKind,
    /// Present only when `backend` is `Remote`
    pub remote: Option<RemoteConfig>,
    /// Show generated placeholder notes when a semester has none
    pub mock_notes: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_key = lookup("KYUCSA_ADMIN_KEY").filter(|k| !k.trim().is_empty());

        let db_path = lookup("KYUCSA_DB_PATH")
            .unwrap_or_else(|| "./data/kyucsa.sqlite".to_string())
            .into();

        let bind_raw =
            lookup("KYUCSA_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid KYUCSA_BIND_ADDR: {}", bind_raw)))?;

        let log_level = lookup("KYUCSA_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("KYUCSA_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "Invalid KYUCSA_LOG_FORMAT: {}",
                    other
                )))
            }
        };

        let backend = match lookup("KYUCSA_STORE_BACKEND").as_deref() {
            None | Some("local") => StoreBackendKind::Local,
            Some("remote") => StoreBackendKind::Remote,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "Invalid KYUCSA_STORE_BACKEND: {}",
                    other
                )))
            }
        };

        let remote = match backend {
            StoreBackendKind::Local => None,
            StoreBackendKind::Remote => {
                let url = lookup("KYUCSA_REMOTE_URL").ok_or_else(|| {
                    AppError::Config("KYUCSA_REMOTE_URL is required for the remote backend".into())
                })?;
                let api_key = lookup("KYUCSA_REMOTE_KEY").ok_or_else(|| {
                    AppError::Config("KYUCSA_REMOTE_KEY is required for the remote backend".into())
                })?;
                let table =
                    lookup("KYUCSA_REMOTE_TABLE").unwrap_or_else(|| "site_content".to_string());
                Some(RemoteConfig {
                    url: url.trim_end_matches('/').to_string(),
                    api_key,
                    table,
                })
            }
        };

        let mock_notes = match lookup("KYUCSA_MOCK_NOTES").as_deref() {
            None => true,
            Some(v) => parse_bool(v).ok_or_else(|| {
                AppError::Config(format!("Invalid KYUCSA_MOCK_NOTES: {}", v))
            })?,
        };

        Ok(Self {
            admin_key,
            db_path,
            bind_addr,
            log_level,
            log_format,
            backend,
            remote,
            mock_notes,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
