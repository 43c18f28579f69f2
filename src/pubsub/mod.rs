pub mod api;
pub mod config;
pub mod paths;
pub mod provision;
pub mod publisher;
pub mod receiver;
pub mod reset;
pub mod rest;
pub mod topology;
pub mod types;

use log::info;

use crate::error::Result;
use config::{ClientConfig, EMULATOR_HOST_ENV};
use rest::RestClient;

/// Builds the REST client for the resolved endpoint
pub fn connect(config: &ClientConfig, endpoint_override: Option<&str>) -> Result<RestClient> {
    let emulator_host = std::env::var(EMULATOR_HOST_ENV).ok();
    if let Some(host) = &emulator_host {
        info!("{} is set to {}", EMULATOR_HOST_ENV, host);
    }

    let endpoint = config.resolve_endpoint(endpoint_override, emulator_host.as_deref());
    RestClient::new(endpoint, config)
}
