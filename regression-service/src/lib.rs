// Regression Service Library
// Nightly test matrix enumeration and fail-fast execution of the kernel examples

pub mod error;
pub mod execution;
pub mod matrix;
pub mod runners;

// Re-export commonly used types
pub use error::{RegressionError, RegressionResult};

// Re-export matrix types
pub use matrix::{
    AxisSet, Case, CommandTemplate, FlagSubsets, KernelAxes, KernelSpec, MatrixExpander,
    KERNEL_FAMILIES,
};

// Re-export execution types
pub use execution::{
    progress_channel, ExecutionEvent, ExecutorConfig, ProgressReceiver, ProgressSender,
    RegressionExecutor, RunReport,
};

// Re-export runner types
pub use runners::{Preflight, PreflightIssue, Runner, ShellConfig, ShellOutput, ShellRunner};
