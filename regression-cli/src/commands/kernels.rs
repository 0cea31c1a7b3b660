use crate::commands::MatrixArgs;
use crate::output;

use clap::Args;
use color_eyre::Result;
use serde_json::json;

use regression_service::matrix::case::render_flags;
use regression_service::Preflight;

/// Show the matrix definition of each kernel family
#[derive(Args, Debug)]
pub struct KernelsArgs {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Print the definitions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: KernelsArgs) -> Result<()> {
    let config = args.matrix.executor_config();
    let expander = config.expander();

    if args.json {
        let kernels: Vec<_> = expander
            .kernels()
            .iter()
            .map(|kernel| {
                json!({
                    "name": kernel.name,
                    "axes": kernel.axes(),
                    "cases": expander.kernel_cases(kernel),
                })
            })
            .collect();
        let document = json!({
            "kernels": kernels,
            "axes": expander.axes(),
            "total_cases": expander.total_cases(),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    output::header(&format!("{} kernel families", expander.kernels().len()));
    for kernel in expander.kernels() {
        let axes = kernel.axes();
        let mut traits = Vec::new();
        if axes.is_distributed {
            traits.push("distributed");
        }
        if axes.is_ewald {
            traits.push("ewald");
        }
        let traits = if traits.is_empty() {
            "serial".to_string()
        } else {
            traits.join(", ")
        };

        println!("{} ({})", kernel.name, traits);
        println!(
            "    flags:      {}",
            render_flags(&axes.flags).unwrap_or_default()
        );
        println!("    np:         {}", join(&axes.process_counts));
        println!("    iterations: {}", join(&axes.iteration_counts));
        println!("    cases:      {}", expander.kernel_cases(kernel));
    }
    output::info(&format!("{} cases in total", expander.total_cases()));

    let cwd = std::env::current_dir()?;
    let preflight = Preflight::new(&cwd, &config.template);
    if expander.kernels().iter().any(|k| k.is_distributed()) {
        match preflight.find_launcher() {
            Some(path) => output::dim(&format!("launcher: {}", path.display())),
            None => output::warning(&format!(
                "launcher '{}' not found",
                config.template.launcher
            )),
        }
    }

    Ok(())
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
