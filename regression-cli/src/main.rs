mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use commands::{kernels::KernelsArgs, plan::PlanArgs, run::RunArgs};

/// Nightly regression driver for the FMM kernel examples
#[derive(Parser, Debug)]
#[command(name = "nightly", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every case, stopping at the first failure (default)
    Run(RunArgs),
    /// List the commands a run would execute
    Plan(PlanArgs),
    /// Show each kernel family's axes and case count
    Kernels(KernelsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(args).await,
        Some(Commands::Plan(args)) => commands::plan::execute(args),
        Some(Commands::Kernels(args)) => commands::kernels::execute(args),
        None => commands::run::execute(RunArgs::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_match_nightly() {
        let cli = Cli::parse_from(["nightly", "run"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };

        assert!(args.matrix.kernels.is_empty());
        assert_eq!(args.matrix.examples_dir, "./examples/");
        assert_eq!(args.matrix.launcher, "mpirun");
        assert!(!args.quiet);
        assert_eq!(
            args.matrix.template(),
            regression_service::CommandTemplate::default()
        );
    }

    #[test]
    fn test_kernel_filter_is_repeatable() {
        let cli = Cli::parse_from([
            "nightly",
            "plan",
            "-k",
            "ewald_mpi",
            "--kernel",
            "laplace_cartesian",
            "--count",
        ]);
        let Some(Commands::Plan(args)) = cli.command else {
            panic!("expected plan");
        };

        assert_eq!(args.matrix.kernels, vec!["ewald_mpi", "laplace_cartesian"]);
        assert!(args.count);

        let names: Vec<String> = args
            .matrix
            .executor_config()
            .expander()
            .kernels()
            .iter()
            .map(|k| k.name.clone())
            .collect();
        assert_eq!(names, vec!["laplace_cartesian", "ewald_mpi"]);
    }

    #[test]
    fn test_no_subcommand_runs() {
        let cli = Cli::parse_from(["nightly"]);
        assert!(cli.command.is_none());
        assert_eq!(RunArgs::default().matrix.launcher, "mpirun");
    }
}
