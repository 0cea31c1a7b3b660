pub mod kernels;
pub mod plan;
pub mod run;

use clap::Args;
use regression_service::matrix::case::{DEFAULT_EXAMPLES_DIR, DEFAULT_LAUNCHER};
use regression_service::{CommandTemplate, ExecutorConfig};

/// Options selecting which cases exist and how they render
#[derive(Args, Debug, Clone)]
pub struct MatrixArgs {
    /// Run only this kernel family (can be repeated)
    #[arg(long = "kernel", short = 'k', value_name = "NAME")]
    pub kernels: Vec<String>,

    /// Directory holding the example executables
    #[arg(long, value_name = "DIR", default_value = DEFAULT_EXAMPLES_DIR)]
    pub examples_dir: String,

    /// Launcher used for distributed kernels
    #[arg(long, value_name = "PROG", default_value = DEFAULT_LAUNCHER)]
    pub launcher: String,
}

impl Default for MatrixArgs {
    fn default() -> Self {
        Self {
            kernels: Vec::new(),
            examples_dir: DEFAULT_EXAMPLES_DIR.to_string(),
            launcher: DEFAULT_LAUNCHER.to_string(),
        }
    }
}

impl MatrixArgs {
    pub fn template(&self) -> CommandTemplate {
        CommandTemplate::new()
            .with_examples_dir(self.examples_dir.clone())
            .with_launcher(self.launcher.clone())
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            template: self.template(),
            kernels: self.kernels.clone(),
            ..ExecutorConfig::default()
        }
    }
}
