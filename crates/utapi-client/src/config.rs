//! Client configuration

use crate::{ClientError, Result};
use url::Url;

/// Default API host
pub const DEFAULT_HOST: &str = "https://api.uploadthing.com";

/// Default API version path segment
pub const DEFAULT_VERSION: &str = "v6";

/// Client configuration
///
/// Built once and handed to [`UtApi`](crate::UtApi); the client never mutates it.
#[derive(Clone, Debug)]
pub struct Config {
    /// API host URL, without the version segment
    pub host: String,
    /// Secret API key sent as `x-uploadthing-api-key`
    pub api_key: String,
    /// API version path segment
    pub version: String,
    /// User agent string
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: String::new(),
            version: DEFAULT_VERSION.to_string(),
            user_agent: format!("utapi-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Create a new config with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the API host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the API version segment
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the host is an absolute http(s) URL and the version is set
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.host)
            .map_err(|e| ClientError::Config(format!("invalid host {:?}: {}", self.host, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported host scheme: {}",
                url.scheme()
            )));
        }

        if self.version.trim_matches('/').is_empty() {
            return Err(ClientError::Config("API version must not be empty".to_string()));
        }

        Ok(())
    }

    /// Build the base URL for API requests (`host/version`)
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.host.trim_end_matches('/'),
            self.version.trim_matches('/')
        )
    }
}
