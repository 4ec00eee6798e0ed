mod checker;
mod retry;
mod session;
mod tracker;
mod worker;

pub use checker::BlacklistChecker;
pub use retry::RetryPolicy;
pub use tracker::{CompletionTracker, Credit};
