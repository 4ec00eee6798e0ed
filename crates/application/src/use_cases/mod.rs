pub mod check;

pub use check::{BlacklistChecker, CompletionTracker, Credit, RetryPolicy};
