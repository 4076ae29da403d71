//! Builds the HTTP client and registry for a run from its configuration.

use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::{http::HttpClient, nexus::Nexus};

use super::config::{Config, Credentials};

/// Build an HTTP client that authenticates with `credentials`
pub fn build_http_client(credentials: &Credentials) -> Result<HttpClient> {
    let client = Client::builder().user_agent("nxclone-cli").build()?;
    debug!("HTTP client configured for user {}", credentials.user);
    Ok(HttpClient::new(client, credentials.clone()))
}

/// Build the Nexus registry client from configuration
pub fn build_registry(config: &Config) -> Result<Nexus> {
    let http_client = build_http_client(&config.credentials)?;
    Ok(Nexus::new(http_client, &config.base_url))
}
