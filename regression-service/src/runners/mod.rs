// Runners Module
// Launches case commands as external processes

pub mod preflight;
pub mod shell;

// Re-export key types
pub use preflight::{Preflight, PreflightIssue};
pub use shell::{ShellConfig, ShellOutput, ShellRunner};

use std::path::Path;
use std::sync::Arc;

/// Callback for handling output lines in real-time (line, is_stderr)
pub type OutputCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Trait for case runners
#[async_trait::async_trait]
pub trait Runner: Send + Sync {
    /// Run one rendered command to completion and report its status
    async fn run(
        &self,
        command: &str,
        working_dir: &Path,
        on_output: OutputCallback,
    ) -> ShellOutput;
}
