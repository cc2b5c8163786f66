use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    BadAddressFormat(String),
    BadPortValue(String),
    LookupFailed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BadAddressFormat(e) => write!(f, "Address formatting error: {}", e),
            ConfigError::BadPortValue(e) => write!(f, "Port value error: {}", e),
            ConfigError::LookupFailed(e) => write!(f, "Public address lookup error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum NetworkError {
    BindError(std::io::Error),
    DialError(std::io::Error),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::BindError(e) => write!(f, "Network bind error: {}", e),
            NetworkError::DialError(e) => write!(f, "Backend dial error: {}", e),
        }
    }
}

impl std::error::Error for NetworkError {}

#[derive(Debug)]
pub enum RelayError {
    ReadError(std::io::Error),
    WriteError(std::io::Error),
    AddrUnavailable(std::io::Error),
    TaskFailed(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::ReadError(e) => write!(f, "Relay read error: {}", e),
            RelayError::WriteError(e) => write!(f, "Relay write error: {}", e),
            RelayError::AddrUnavailable(e) => write!(f, "Endpoint address unavailable: {}", e),
            RelayError::TaskFailed(e) => write!(f, "Relay task failed: {}", e),
        }
    }
}

impl std::error::Error for RelayError {}

#[derive(Debug)]
pub enum LogError {
    DeflateError(std::io::Error),
    InflateError(std::io::Error),
    Base64Error(base64::DecodeError),
    SerializeError(serde_json::Error),
    SinkError(std::io::Error),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::DeflateError(e) => write!(f, "Payload compression error: {}", e),
            LogError::InflateError(e) => write!(f, "Payload decompression error: {}", e),
            LogError::Base64Error(e) => write!(f, "Payload base64 error: {}", e),
            LogError::SerializeError(e) => write!(f, "Record serialization error: {}", e),
            LogError::SinkError(e) => write!(f, "Log sink write error: {}", e),
        }
    }
}

impl std::error::Error for LogError {}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::SerializeError(err)
    }
}

impl From<base64::DecodeError> for LogError {
    fn from(err: base64::DecodeError) -> Self {
        LogError::Base64Error(err)
    }
}
