use crate::commands::MatrixArgs;
use crate::output;

use std::io::{self, BufWriter, Write};

use clap::Args;
use color_eyre::Result;
use serde_json::json;

use regression_service::{CommandTemplate, MatrixExpander};

/// Print the cases of a run in order without launching anything
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Only print how many cases each kernel family expands to
    #[arg(long)]
    pub count: bool,

    /// Print one JSON object per case instead of the command line
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let config = args.matrix.executor_config();
    let expander = config.expander();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let written = if args.count {
        output::header("Case counts");
        write_counts(&mut out, &expander)
    } else {
        output::status("Planning", &format!("{} cases", expander.total_cases()));
        write_cases(&mut out, &expander, &config.template, args.json)
    };

    match written.and_then(|_| out.flush()) {
        Ok(()) => Ok(()),
        // Output piped into `head` and friends
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_counts(out: &mut impl Write, expander: &MatrixExpander) -> io::Result<()> {
    for kernel in expander.kernels() {
        writeln!(out, "{:<28} {:>9}", kernel.name, expander.kernel_cases(kernel))?;
    }
    writeln!(out, "{:<28} {:>9}", "total", expander.total_cases())
}

fn write_cases(
    out: &mut impl Write,
    expander: &MatrixExpander,
    template: &CommandTemplate,
    as_json: bool,
) -> io::Result<()> {
    for case in expander.cases() {
        let command = template.render(&case);
        if as_json {
            let line = json!({ "case": case, "command": command });
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}", command)?;
        }
    }
    Ok(())
}
