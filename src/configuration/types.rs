use crate::error_handling::types::ConfigError;

/// Immutable relay configuration, built once at startup and shared (via
/// `Arc`) into the dispatcher and every session.
///
/// # Fields Overview
///
/// - `listen_port`: local TCP port the dispatcher accepts peers on
/// - `backend_addr`: `host:port` the relay dials for every accepted peer
/// - `backend_ip`: host portion of `backend_addr`, used as the literal
///   rewrite pattern on the backend→peer direction
/// - `public_ip`: the relay's externally visible address, used as the
///   rewrite replacement so the backend stays hidden from peers
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub listen_port: u16,
    pub backend_addr: String,
    pub backend_ip: String,
    pub public_ip: String,
}

impl RelayConfig {
    /// Validates `backend_addr` and derives the rewrite pattern from it.
    ///
    /// # Errors
    /// - [`ConfigError::BadAddressFormat`] when `backend_addr` is not a
    ///   non-empty `host:port` pair
    /// - [`ConfigError::BadPortValue`] when the port portion is not a valid
    ///   TCP port number
    pub fn new(
        listen_port: u16,
        backend_addr: String,
        public_ip: String,
    ) -> Result<Self, ConfigError> {
        let backend_ip = split_host(&backend_addr)?;
        Ok(Self {
            listen_port,
            backend_addr,
            backend_ip,
            public_ip,
        })
    }
}

/// Splits a `host:port` pair and returns the host portion.
fn split_host(addr: &str) -> Result<String, ConfigError> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::BadAddressFormat(addr.to_string()))?;

    if host.is_empty() {
        return Err(ConfigError::BadAddressFormat(addr.to_string()));
    }
    if port.parse::<u16>().is_err() {
        return Err(ConfigError::BadPortValue(port.to_string()));
    }

    Ok(host.to_string())
}
