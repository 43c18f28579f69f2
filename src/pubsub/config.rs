use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::error::{ProvisionError, ErrorCode};

/// Public Pub/Sub endpoint, used when no emulator is configured
pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com";

/// Environment variable the emulator tooling uses to advertise `host:port`
pub const EMULATOR_HOST_ENV: &str = "PUBSUB_EMULATOR_HOST";

/// Messages requested per pull unless configured otherwise
pub const DEFAULT_PULL_MAX_MESSAGES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub pull_max_messages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_secs: 30,
            pull_max_messages: DEFAULT_PULL_MAX_MESSAGES,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ProvisionError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ProvisionError::new(ErrorCode::ConfigInvalid, format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ProvisionError::new(ErrorCode::ConfigInvalid, format!("Failed to parse TOML: {}", e)))
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProvisionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProvisionError::new(ErrorCode::ConfigInvalid, format!("Failed to serialize to TOML: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| ProvisionError::new(ErrorCode::ConfigInvalid, format!("Failed to write config file: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Picks the base URL: explicit override, then emulator host, then the
    /// configured endpoint, then the public service. A bare `host:port`
    /// from any source gets an `http://` scheme.
    pub fn resolve_endpoint(&self, cli_override: Option<&str>, emulator_host: Option<&str>) -> String {
        let endpoint = [cli_override, emulator_host, self.endpoint.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT);

        let endpoint = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        endpoint.trim_end_matches('/').to_string()
    }
}
