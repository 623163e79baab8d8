use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::{header, HeaderName, HeaderValue, Method};
use rf_client::generation::LlmConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
    pub log_dir: PathBuf,
}

impl Config {
    /// Load the configuration from the environment (including `.env`, if it was loaded).
    pub fn from_env(address: String, tls: bool) -> Result<Self> {
        Self::from_lookup(address, tls, |key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(
        address: String,
        tls: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let tls = if tls {
            Some(TLSConfig {
                cert_path: lookup("TLS_CERT_PATH").context("--tls needs TLS_CERT_PATH")?,
                key_path: lookup("TLS_KEY_PATH").context("--tls needs TLS_KEY_PATH")?,
            })
        } else {
            None
        };
        let log_dir = match lookup("LOG_DIR") {
            Some(dir) => dir.into(),
            None => std::env::current_dir().context("Finding the log directory")?,
        };
        Ok(Self {
            server: ServerConfig { address, tls },
            llm: LlmConfig::from_lookup(&lookup),
            cors: CorsConfig::parse(lookup("CORS_ALLOWED_ORIGINS").as_deref().unwrap_or("*")),
            log_dir,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: String,
    pub tls: Option<TLSConfig>,
}

#[derive(Clone, Debug)]
pub struct TLSConfig {
    pub cert_path: String,
    pub key_path: String,
}

/// Which browser origins may call the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    Any,
    /// Exact origins, and host suffixes written as `*.example.com`
    List {
        exact: Vec<String>,
        suffixes: Vec<String>,
    },
}

impl CorsConfig {
    /// Parse a comma separated list of origins. A `*` anywhere allows everything.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(|entry| entry.trim().trim_end_matches('/'))
            .filter(|entry| !entry.is_empty())
            .collect::<Vec<_>>();
        if entries.is_empty() || entries.contains(&"*") {
            return CorsConfig::Any;
        }
        let (suffixes, exact): (Vec<&str>, Vec<&str>) = entries
            .into_iter()
            .partition(|entry| entry.starts_with("*.") || entry.starts_with('.'));
        CorsConfig::List {
            exact: exact.into_iter().map(str::to_string).collect(),
            suffixes: suffixes
                .into_iter()
                .map(|s| s.trim_start_matches('*').to_string())
                .collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            CorsConfig::Any => true,
            CorsConfig::List { exact, suffixes } => {
                exact.iter().any(|e| e == origin) || suffixes.iter().any(|s| origin.ends_with(s))
            }
        }
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            CorsConfig::Any => CorsLayer::permissive(),
            CorsConfig::List { .. } => {
                let me = self.clone();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::predicate(
                        move |origin: &HeaderValue, _request_parts| {
                            origin.to_str().map(|o| me.allows(o)).unwrap_or(false)
                        },
                    ))
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([
                        header::CONTENT_TYPE,
                        header::AUTHORIZATION,
                        HeaderName::from_static("user-id"),
                    ])
                    .allow_credentials(true)
            }
        }
    }
}
