#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Accepted request timeout range, in seconds.
pub const TIMEOUT_SECONDS_RANGE: (u64, u64) = (1, 600);

pub(crate) fn validate_timeout_seconds(field_name: &str, seconds: u64) -> Result<()> {
    let (min, max) = TIMEOUT_SECONDS_RANGE;
    validate_range(field_name, seconds, min, max)
}

/// Effective client configuration after merging flags, environment and file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub timeout: Option<Duration>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: None,
            verbose: false,
            json_logs: false,
        }
    }
}

impl ClientConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    pub fn from_toml(file: &TomlConfig) -> Self {
        Self {
            backend_url: file
                .service
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            timeout: file.service.timeout_seconds.map(Duration::from_secs),
            verbose: file.verbose(),
            json_logs: file.json_logs(),
        }
    }
}

impl ConfigProvider for ClientConfig {
    fn backend_url(&self) -> &str {
        &self.backend_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("backend_url", &self.backend_url)?;
        if let Some(timeout) = self.timeout {
            validate_timeout_seconds("timeout_seconds", timeout.as_secs())?;
        }
        Ok(())
    }
}
