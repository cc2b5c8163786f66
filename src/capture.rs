pub mod codec;
pub mod session_log;

pub use session_log::{CaptureReport, SessionLogger, SessionRecord};
