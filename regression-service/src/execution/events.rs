// Execution Events
// Progress reporting and event types for a regression run

use std::time::Duration;
use tokio::sync::mpsc;

/// Sender for execution progress events
pub type ProgressSender = mpsc::UnboundedSender<ExecutionEvent>;

/// Receiver for execution progress events
pub type ProgressReceiver = mpsc::UnboundedReceiver<ExecutionEvent>;

/// Create a new progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Events emitted during a regression run, in the order they happen
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// Run started
    RunStarted {
        kernels: Vec<String>,
        total_cases: u64,
    },

    /// First case of a kernel family is about to run
    KernelStarted { kernel: String, cases: u64 },

    /// A case is about to be launched; `command` is exactly what runs
    CaseStarted { index: u64, command: String },

    /// One line of case output (stdout/stderr)
    CaseOutput {
        index: u64,
        line: String,
        is_error: bool,
    },

    /// A case passed
    CaseCompleted { index: u64, duration: Duration },

    /// A case failed and the run stopped
    RunHalted {
        index: u64,
        command: String,
        exit_code: Option<i32>,
        reason: Option<String>,
    },

    /// Every case passed
    RunCompleted { cases: u64, duration: Duration },
}

impl ExecutionEvent {
    /// Create a run started event
    pub fn run_started(kernels: Vec<String>, total_cases: u64) -> Self {
        Self::RunStarted {
            kernels,
            total_cases,
        }
    }

    /// Create a kernel started event
    pub fn kernel_started(kernel: impl Into<String>, cases: u64) -> Self {
        Self::KernelStarted {
            kernel: kernel.into(),
            cases,
        }
    }

    /// Create a case started event
    pub fn case_started(index: u64, command: impl Into<String>) -> Self {
        Self::CaseStarted {
            index,
            command: command.into(),
        }
    }

    /// Create a case output event
    pub fn case_output(index: u64, line: impl Into<String>, is_error: bool) -> Self {
        Self::CaseOutput {
            index,
            line: line.into(),
            is_error,
        }
    }

    /// Create a case completed event
    pub fn case_completed(index: u64, duration: Duration) -> Self {
        Self::CaseCompleted { index, duration }
    }

    /// Create a run halted event
    pub fn run_halted(
        index: u64,
        command: impl Into<String>,
        exit_code: Option<i32>,
        reason: Option<String>,
    ) -> Self {
        Self::RunHalted {
            index,
            command: command.into(),
            exit_code,
            reason,
        }
    }

    /// Create a run completed event
    pub fn run_completed(cases: u64, duration: Duration) -> Self {
        Self::RunCompleted { cases, duration }
    }

    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RunHalted { .. } | Self::RunCompleted { .. })
    }
}

/// Helper trait for sending events
pub trait EventSender {
    fn send_event(&self, event: ExecutionEvent);
}

impl EventSender for ProgressSender {
    fn send_event(&self, event: ExecutionEvent) {
        let _ = self.send(event);
    }
}

impl EventSender for Option<ProgressSender> {
    fn send_event(&self, event: ExecutionEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}
