// Execution Engine Module
// Handles fail-fast case execution and progress reporting

pub mod events;
pub mod executor;

// Re-export key types
pub use events::{progress_channel, EventSender, ExecutionEvent, ProgressReceiver, ProgressSender};
pub use executor::{ExecutorConfig, RegressionExecutor, RunReport};
