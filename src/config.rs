use std::{env, net::SocketAddr, time::Duration};

use reqwest::Url;
use thiserror::Error;

use crate::dracor_client::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const MAX_RETRIES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Stdio,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub transport: Transport,
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DRACOR_API_BASE_URL must be an absolute http(s) URL")]
    InvalidBaseUrl,
    #[error("DRACOR_TIMEOUT_SECS must be an integer between 1 and 300")]
    InvalidTimeout,
    #[error("DRACOR_MAX_RETRIES must be an integer between 0 and 5")]
    InvalidRetries,
    #[error("MCP_TRANSPORT must be one of: http, stdio")]
    InvalidTransport,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = read("DRACOR_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let parsed_base = Url::parse(&api_base_url).map_err(|_| ConfigError::InvalidBaseUrl)?;
        if !matches!(parsed_base.scheme(), "http" | "https") || parsed_base.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl);
        }

        let request_timeout_secs = read("DRACOR_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if request_timeout_secs == 0 || request_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout);
        }

        let max_retries = read("DRACOR_MAX_RETRIES")
            .map(|value| value.parse::<u32>().map_err(|_| ConfigError::InvalidRetries))
            .transpose()?
            .unwrap_or(0);
        if max_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidRetries);
        }

        let transport = match read("MCP_TRANSPORT")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("http") => Transport::Http,
            Some("stdio") => Transport::Stdio,
            Some(_) => return Err(ConfigError::InvalidTransport),
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let config = Self {
            api_base_url,
            request_timeout_secs,
            max_retries,
            transport,
            bind_addr,
            bind_port,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
