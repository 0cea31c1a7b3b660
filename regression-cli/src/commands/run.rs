use crate::commands::MatrixArgs;
use crate::output::Console;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use regression_service::{
    progress_channel, ExecutionEvent, Preflight, RegressionExecutor, Runner,
};

/// Run the regression matrix, stopping at the first failing case
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Working directory the commands run in
    #[arg(long, short = 'w', value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Only print commands, their output, and the failure line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let working_dir = match &args.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let mut config = args.matrix.executor_config();
    config.working_dir = working_dir;

    let mut console = Console::stdio(args.quiet);
    let expander = config.expander();
    let preflight = Preflight::new(&config.working_dir, &config.template);
    for issue in preflight.check(expander.kernels()) {
        console.warning(&issue.to_string())?;
    }

    let outcome = drive(RegressionExecutor::new(config), &mut console).await?;
    if outcome == RunOutcome::Halted {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}

/// How a run ended, as seen by the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    Halted,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Passed => 0,
            RunOutcome::Halted => 1,
        }
    }
}

/// Run the executor and report its events to `console`.
///
/// A failing case is an outcome, not an error; errors are reserved for
/// runs that could not start (missing working directory) or a console
/// that can no longer be written to.
pub async fn drive<R, O, E>(
    executor: RegressionExecutor<R>,
    console: &mut Console<O, E>,
) -> Result<RunOutcome>
where
    R: Runner + 'static,
    O: Write,
    E: Write,
{
    let (tx, mut rx) = progress_channel();
    let executor = executor.with_progress(tx);

    // Spawn execution in background
    let exec_handle = tokio::spawn(async move { executor.execute().await });

    // Process events in the foreground
    while let Some(event) = rx.recv().await {
        report(console, event)?;
    }

    // Wait for executor to finish
    match exec_handle.await? {
        Ok(_) => Ok(RunOutcome::Passed),
        Err(e) if e.command().is_some() => Ok(RunOutcome::Halted),
        Err(e) => Err(e.into()),
    }
}

fn report<O, E>(console: &mut Console<O, E>, event: ExecutionEvent) -> io::Result<()>
where
    O: Write,
    E: Write,
{
    match event {
        ExecutionEvent::RunStarted {
            kernels,
            total_cases,
        } => console.header(&format!(
            "Nightly regression: {} kernel families, {} cases",
            kernels.len(),
            total_cases
        )),

        ExecutionEvent::KernelStarted { kernel, cases } => {
            console.status("Kernel", &format!("{} ({} cases)", kernel, cases))
        }

        ExecutionEvent::CaseStarted { command, .. } => console.case_command(&command),

        ExecutionEvent::CaseOutput { line, is_error, .. } => console.case_output(&line, is_error),

        ExecutionEvent::CaseCompleted { .. } => Ok(()),

        ExecutionEvent::RunHalted {
            index,
            command,
            exit_code,
            reason,
        } => {
            let detail = match (exit_code, reason) {
                (_, Some(reason)) => reason,
                (Some(code), None) => format!("exit code {}", code),
                (None, None) => "terminated by signal".to_string(),
            };
            console.failure(&format!("Case {} failed: {}", index, detail))?;
            // Must stay the last line written
            console.regression_failed(&command)
        }

        ExecutionEvent::RunCompleted { cases, duration } => console.success(&format!(
            "All {} cases passed in {:.2}s",
            cases,
            duration.as_secs_f64()
        )),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use regression_service::{AxisSet, ExecutorConfig};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Both console streams interleaved in write order, as a terminal sees them
    #[derive(Clone, Default)]
    struct Transcript(Arc<Mutex<Vec<u8>>>);

    impl Write for Transcript {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transcript {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn kernel_dir(name: &str, body: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("examples")).unwrap();
        let script = dir.path().join("examples").join(name);
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    }

    fn single_point_executor(dir: &TempDir, kernel: &str) -> RegressionExecutor {
        RegressionExecutor::new(ExecutorConfig {
            working_dir: dir.path().to_path_buf(),
            kernels: vec![kernel.to_string()],
            axes: AxisSet {
                sizes: vec![2],
                thetas: vec![0.5],
                threads: vec![1],
                cache_sizes: vec![1],
                distributions: vec!['c'],
            },
            ..ExecutorConfig::default()
        })
    }

    #[tokio::test]
    async fn test_halt_ends_with_failed_command_and_nonzero_status() {
        let dir = kernel_dir(
            "laplace_cartesian",
            "case \" $* \" in *\" -j \"*) echo diverged; exit 3;; esac",
        );
        let transcript = Transcript::default();
        let mut console = Console::new(transcript.clone(), transcript.clone(), false);

        let outcome = drive(single_point_executor(&dir, "laplace_cartesian"), &mut console)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Halted);
        assert_ne!(outcome.exit_code(), 0);

        let lines = transcript.lines();
        let failed = "./examples/laplace_cartesian -aDv -p ./examples/ -r 10 -j -n 2 -t .5 -T 1 -c 1 -d c -i 0";
        assert_eq!(
            lines.last().unwrap(),
            &format!("Regression failed @ {}", failed)
        );
        assert!(lines[lines.len() - 2].contains("Case 1 failed: exit code 3"));
        assert!(lines.contains(&"diverged".to_string()));
        // Nothing after the failing case was launched
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("./examples/")).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_quiet_halt_still_names_command_last() {
        let dir = kernel_dir("laplace_cartesian", "exit 2");
        let transcript = Transcript::default();
        let mut console = Console::new(transcript.clone(), transcript.clone(), true);

        let outcome = drive(single_point_executor(&dir, "laplace_cartesian"), &mut console)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Halted);
        assert_eq!(
            transcript.lines(),
            vec![
                "./examples/laplace_cartesian -aDv -p ./examples/ -r 10 -n 2 -t .5 -T 1 -c 1 -d c -i 0",
                "Regression failed @ ./examples/laplace_cartesian -aDv -p ./examples/ -r 10 -n 2 -t .5 -T 1 -c 1 -d c -i 0",
            ]
        );
    }

    #[tokio::test]
    async fn test_completion_exits_zero() {
        let dir = kernel_dir("laplace_cartesian", "exit 0");
        let transcript = Transcript::default();
        let mut console = Console::new(transcript.clone(), transcript.clone(), false);

        let outcome = drive(single_point_executor(&dir, "laplace_cartesian"), &mut console)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Passed);
        assert_eq!(outcome.exit_code(), 0);

        let lines = transcript.lines();
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("./examples/")).count(),
            64
        );
        assert!(lines.last().unwrap().contains("All 64 cases passed"));
        assert!(!lines.iter().any(|l| l.starts_with("Regression failed")));
    }

    #[tokio::test]
    async fn test_missing_working_dir_is_an_error() {
        let executor = RegressionExecutor::new(ExecutorConfig {
            working_dir: "/definitely/not/here".into(),
            ..ExecutorConfig::default()
        });
        let transcript = Transcript::default();
        let mut console = Console::new(transcript.clone(), transcript.clone(), false);

        assert!(drive(executor, &mut console).await.is_err());
        assert!(transcript.lines().is_empty());
    }
}
