pub mod config;
pub mod types;

pub use config::Args;
pub use types::RelayConfig;
