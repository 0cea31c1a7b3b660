// Shell Runner
// Executes rendered case commands through the system shell

use crate::runners::{OutputCallback, Runner};

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Shell executable and arguments used to interpret case commands
fn shell_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", &["/C"])
    } else {
        ("sh", &["-c"])
    }
}

/// Configuration for shell execution
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    /// Kill the case after this long (None = wait forever)
    pub timeout: Option<Duration>,
}

/// Outcome of one command.
///
/// Output lines are streamed through the callback, so only the status
/// is kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code; None when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Set when the shell could not be spawned
    pub spawn_error: Option<String>,
    /// Set when the configured timeout expired
    pub timed_out: bool,
}

impl ShellOutput {
    /// Output for a process that exited with the given code
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    /// Output for a process that could not be started
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            spawn_error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Whether the case passed
    pub fn succeeded(&self) -> bool {
        self.spawn_error.is_none() && !self.timed_out && self.exit_code == Some(0)
    }
}

/// Shell runner for case commands
#[derive(Debug, Clone)]
pub struct ShellRunner {
    config: ShellConfig,
}

impl ShellRunner {
    /// Create a new shell runner that waits on every case indefinitely
    pub fn new() -> Self {
        Self {
            config: ShellConfig::default(),
        }
    }

    /// Set shell configuration
    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute a command, streaming each output line to `on_output`
    pub async fn run_streaming(
        &self,
        command: &str,
        working_dir: &Path,
        on_output: OutputCallback,
    ) -> ShellOutput {
        let (shell_cmd, shell_args) = shell_command();

        let mut cmd = Command::new(shell_cmd);
        cmd.args(shell_args);
        cmd.arg(command);
        cmd.current_dir(working_dir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ShellOutput::spawn_failed(format!(
                    "Failed to spawn shell process '{}': {}",
                    shell_cmd, e
                ));
            }
        };

        let stdout_handle = child
            .stdout
            .take()
            .map(|stdout| forward_lines(stdout, on_output.clone(), false));
        let stderr_handle = child
            .stderr
            .take()
            .map(|stderr| forward_lines(stderr, on_output, true));

        let wait_result = match self.config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(result) => result,
                Err(_) => {
                    let _ = child.kill().await;
                    // Grandchildren may still hold the pipes open
                    abort_readers(stdout_handle, stderr_handle).await;
                    return ShellOutput {
                        timed_out: true,
                        ..ShellOutput::default()
                    };
                }
            },
            None => child.wait().await,
        };

        // Drain remaining output before reporting the status
        join_readers(stdout_handle, stderr_handle).await;

        match wait_result {
            Ok(status) => ShellOutput {
                exit_code: status.code(),
                ..ShellOutput::default()
            },
            Err(e) => ShellOutput::spawn_failed(format!("Failed to wait for process: {}", e)),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Runner for ShellRunner {
    async fn run(
        &self,
        command: &str,
        working_dir: &Path,
        on_output: OutputCallback,
    ) -> ShellOutput {
        self.run_streaming(command, working_dir, on_output).await
    }
}

fn forward_lines<R>(stream: R, on_output: OutputCallback, is_error: bool) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            on_output(&line, is_error);
        }
    })
}

async fn join_readers(stdout: Option<JoinHandle<()>>, stderr: Option<JoinHandle<()>>) {
    if let Some(handle) = stdout {
        let _ = handle.await;
    }
    if let Some(handle) = stderr {
        let _ = handle.await;
    }
}

async fn abort_readers(stdout: Option<JoinHandle<()>>, stderr: Option<JoinHandle<()>>) {
    for handle in [stdout, stderr].into_iter().flatten() {
        handle.abort();
        let _ = handle.await;
    }
}
