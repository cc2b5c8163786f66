pub mod configuration;
pub use configuration::{Args, RelayConfig};

pub mod error_handling;

pub mod capture;
pub use capture::{CaptureReport, SessionLogger, SessionRecord};

pub mod relay;
pub use relay::{rewrite, RelaySession};

pub mod network;
pub use network::Listener;

pub mod resolver;
