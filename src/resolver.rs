//! Self-address resolution.
//!
//! The relay needs its externally visible IP address to substitute for the
//! backend's. It asks a well-known "what is my IP" service over plain HTTP;
//! the response body is the address followed by a newline. Failure here is
//! fatal at startup unless the operator passed `--public-ip`.

use log::debug;
use reqwest::header::USER_AGENT;

use crate::error_handling::types::ConfigError;

const LOOKUP_URL: &str = "http://icanhazip.com";

/// Fetches this process's externally visible IP address.
pub async fn public_ip() -> Result<String, ConfigError> {
    let client = reqwest::Client::new();
    let body = client
        .get(LOOKUP_URL)
        .header(USER_AGENT, "curl")
        .send()
        .await
        .map_err(|e| ConfigError::LookupFailed(e.to_string()))?
        .text()
        .await
        .map_err(|e| ConfigError::LookupFailed(e.to_string()))?;

    let ip = body.trim_end().to_string();
    if ip.is_empty() {
        return Err(ConfigError::LookupFailed(format!(
            "empty response from {}",
            LOOKUP_URL
        )));
    }

    debug!("resolved public address: {}", ip);
    Ok(ip)
}
