// Regression Executor
// Runs every case of the matrix in order and stops at the first failure

use crate::error::{RegressionError, RegressionResult};
use crate::execution::events::{EventSender, ExecutionEvent, ProgressSender};
use crate::matrix::{AxisSet, Case, CommandTemplate, MatrixExpander};
use crate::runners::{OutputCallback, Runner, ShellRunner};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a run in which every case passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Number of cases executed
    pub cases: u64,
    /// Total duration
    pub duration: Duration,
}

/// Configuration for a regression run
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Directory the commands run in
    pub working_dir: PathBuf,
    /// How cases become command lines
    pub template: CommandTemplate,
    /// Kernel families to run (empty = all)
    pub kernels: Vec<String>,
    /// Family-independent axes
    pub axes: AxisSet,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            template: CommandTemplate::default(),
            kernels: Vec::new(),
            axes: AxisSet::nightly(),
        }
    }
}

impl ExecutorConfig {
    /// The expander for the configured kernels and axes
    pub fn expander(&self) -> MatrixExpander {
        let expander = if self.kernels.is_empty() {
            MatrixExpander::new()
        } else {
            MatrixExpander::for_kernels(&self.kernels)
        };
        expander.with_axes(self.axes.clone())
    }
}

/// Fail-fast regression executor.
///
/// Cases run one at a time; each is awaited before the next is rendered.
/// The first case that does not pass ends the run with
/// [`RegressionError::CaseFailed`] or [`RegressionError::LaunchFailed`],
/// and nothing after it is launched.
pub struct RegressionExecutor<R: Runner = ShellRunner> {
    config: ExecutorConfig,
    runner: R,
    event_tx: Option<ProgressSender>,
}

impl RegressionExecutor<ShellRunner> {
    /// Create an executor that launches cases through the shell
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            runner: ShellRunner::new(),
            event_tx: None,
        }
    }
}

impl<R: Runner> RegressionExecutor<R> {
    /// Replace the runner used to launch cases
    pub fn with_runner<T: Runner>(self, runner: T) -> RegressionExecutor<T> {
        RegressionExecutor {
            config: self.config,
            runner,
            event_tx: self.event_tx,
        }
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute every case in order
    pub async fn execute(&self) -> RegressionResult<RunReport> {
        let start = Instant::now();
        self.check_working_dir()?;

        let expander = self.config.expander();
        let kernels = expander
            .kernels()
            .iter()
            .map(|kernel| kernel.name.clone())
            .collect();
        self.event_tx
            .send_event(ExecutionEvent::run_started(kernels, expander.total_cases()));

        let mut current_kernel: Option<String> = None;
        let mut executed = 0u64;

        for case in expander.cases() {
            if current_kernel.as_deref() != Some(case.kernel.name.as_str()) {
                self.event_tx.send_event(ExecutionEvent::kernel_started(
                    &case.kernel.name,
                    expander.kernel_cases(&case.kernel),
                ));
                current_kernel = Some(case.kernel.name.clone());
            }

            self.run_case(&case).await?;
            executed += 1;
        }

        let duration = start.elapsed();
        self.event_tx
            .send_event(ExecutionEvent::run_completed(executed, duration));

        Ok(RunReport {
            cases: executed,
            duration,
        })
    }

    /// Render, launch, and gate on a single case
    async fn run_case(&self, case: &Case) -> RegressionResult<()> {
        let command = self.config.template.render(case);
        self.event_tx
            .send_event(ExecutionEvent::case_started(case.index, &command));

        let start = Instant::now();
        let output = self
            .runner
            .run(
                &command,
                &self.config.working_dir,
                self.output_callback(case.index),
            )
            .await;

        if output.succeeded() {
            self.event_tx
                .send_event(ExecutionEvent::case_completed(case.index, start.elapsed()));
            return Ok(());
        }

        let reason = output
            .spawn_error
            .clone()
            .or_else(|| output.timed_out.then(|| "timed out".to_string()));
        self.event_tx.send_event(ExecutionEvent::run_halted(
            case.index,
            &command,
            output.exit_code,
            reason,
        ));

        Err(match output.spawn_error {
            Some(reason) => RegressionError::LaunchFailed {
                index: case.index,
                command,
                reason,
            },
            None => RegressionError::CaseFailed {
                index: case.index,
                command,
                exit_code: output.exit_code,
            },
        })
    }

    fn output_callback(&self, index: u64) -> OutputCallback {
        let tx = self.event_tx.clone();
        Arc::new(move |line: &str, is_error: bool| {
            tx.send_event(ExecutionEvent::case_output(index, line, is_error));
        })
    }

    fn check_working_dir(&self) -> RegressionResult<()> {
        let path = &self.config.working_dir;
        let metadata = std::fs::metadata(path).map_err(|source| RegressionError::WorkingDir {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(RegressionError::WorkingDir {
                path: path.clone(),
                source: io::Error::other("not a directory"),
            });
        }
        Ok(())
    }
}
