// src/config.rs
use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub api_base_url: Url,
    pub session_ttl: Duration,
    pub images: ImageAllowList,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            api_base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            images: ImageAllowList::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("QUIZ_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_base_url = Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("Invalid value for QUIZ_API_BASE_URL: {}", e)))?;

        let session_ttl = match lookup("SESSION_TTL_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|e| {
                AppError::Config(format!("Invalid value for SESSION_TTL_SECS: {}", e))
            })?),
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            server_address: lookup("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            api_base_url,
            session_ttl,
            images: ImageAllowList::default(),
        })
    }
}

/// A protocol/host/port triple an image URL must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePattern {
    pub protocol: &'static str,
    pub hostname: &'static str,
    pub port: u16,
}

/// Hosts the page is allowed to load quiz images from.
#[derive(Debug, Clone)]
pub struct ImageAllowList {
    patterns: Vec<RemotePattern>,
}

impl Default for ImageAllowList {
    fn default() -> Self {
        Self::new(vec![
            RemotePattern { protocol: "http", hostname: "localhost", port: 8000 },
            RemotePattern { protocol: "http", hostname: "backend", port: 8000 },
        ])
    }
}

impl ImageAllowList {
    pub fn new(patterns: Vec<RemotePattern>) -> Self {
        Self { patterns }
    }

    pub fn is_allowed(&self, image_url: &str) -> bool {
        let Ok(url) = Url::parse(image_url) else {
            return false;
        };
        let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
            return false;
        };
        self.patterns
            .iter()
            .any(|p| p.protocol == url.scheme() && p.hostname == host && p.port == port)
    }
}
