pub mod rewriter;
pub mod session;

pub use rewriter::rewrite;
pub use session::RelaySession;
