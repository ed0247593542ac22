// Environment configuration.
// Settings for the store proxy and for clients of the document store.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::info;

use crate::error::{FolioError, Result};
use crate::store::ReadErrorPolicy;

pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_API_URL: &str = "http://localhost:8888/api/";

/// Where a client keeps the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Through the store proxy.
    #[default]
    Http,
    /// In a JSON file on this machine.
    Local,
}

impl FromStr for BackendKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "local" => Ok(BackendKind::Local),
            _ => Err(FolioError::InvalidConfig {
                key: "FOLIO_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Store proxy settings.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub gist_id: String,
    pub github_token: String,
    pub gist_filename: String,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: parse_or(&lookup, "FOLIO_PORT", DEFAULT_PORT)?,
            gist_id: required(&lookup, "GIST_ID")?,
            github_token: required(&lookup, "GITHUB_TOKEN")?,
            gist_filename: required(&lookup, "GIST_FILENAME")?,
        })
    }
}

/// Document store client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub read_error: ReadErrorPolicy,
    pub backend: BackendKind,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: lookup("FOLIO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            read_error: parse_or(&lookup, "FOLIO_READ_ERROR", ReadErrorPolicy::default())?,
            backend: parse_or(&lookup, "FOLIO_BACKEND", BackendKind::default())?,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(FolioError::MissingEnv(key))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T>
where
    T: FromStr + Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| FolioError::InvalidConfig {
            key,
            value,
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Http => f.write_str("http"),
            BackendKind::Local => f.write_str("local"),
        }
    }
}
