// Test Cases
// A fully resolved matrix point and its rendering into a shell command

use crate::matrix::kernel::KernelSpec;

use serde::Serialize;

/// Directory holding the example executables, relative to the run directory
pub const DEFAULT_EXAMPLES_DIR: &str = "./examples/";

/// Launcher used to wrap distributed kernels
pub const DEFAULT_LAUNCHER: &str = "mpirun";

/// Repeat count passed to every example (`-r`)
pub const DEFAULT_REPEAT: u32 = 10;

/// One point of the test matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    /// Zero-based position in the run's enumeration order
    pub index: u64,
    pub kernel: KernelSpec,
    pub process_count: u32,
    pub size: u64,
    pub theta: f64,
    pub threads: u32,
    pub cache_size: u32,
    pub distribution: char,
    pub iterations: u32,
    /// Chosen subset of the kernel's optional flags, in flag order
    pub flags: Vec<char>,
}

/// How cases are turned into command lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTemplate {
    /// Executable directory, always ending in `/`
    pub examples_dir: String,
    pub launcher: String,
    pub repeat: u32,
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            examples_dir: DEFAULT_EXAMPLES_DIR.to_string(),
            launcher: DEFAULT_LAUNCHER.to_string(),
            repeat: DEFAULT_REPEAT,
        }
    }
}

impl CommandTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the executable directory
    pub fn with_examples_dir(mut self, dir: impl Into<String>) -> Self {
        let mut dir = dir.into();
        if !dir.ends_with('/') {
            dir.push('/');
        }
        self.examples_dir = dir;
        self
    }

    /// Set the distributed launcher program
    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    /// Path of the example executable for a kernel
    pub fn executable(&self, kernel: &KernelSpec) -> String {
        format!("{}{}", self.examples_dir, kernel.name)
    }

    /// Render a case into the exact command line that is executed.
    ///
    /// The same case always renders to the same string.
    pub fn render(&self, case: &Case) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(24);

        if case.kernel.is_distributed() {
            parts.push(self.launcher.clone());
            parts.push("-np".to_string());
            parts.push(case.process_count.to_string());
        }

        parts.push(self.executable(&case.kernel));
        parts.push("-aDv".to_string());
        parts.push("-p".to_string());
        parts.push(self.examples_dir.clone());
        parts.push("-r".to_string());
        parts.push(self.repeat.to_string());

        if let Some(bundle) = render_flags(&case.flags) {
            parts.push(bundle);
        }

        let values = [
            ("-n", case.size.to_string()),
            ("-t", format_real(case.theta)),
            ("-T", case.threads.to_string()),
            ("-c", case.cache_size.to_string()),
            ("-d", case.distribution.to_string()),
            ("-i", case.iterations.to_string()),
        ];
        for (flag, value) in values {
            parts.push(flag.to_string());
            parts.push(value);
        }

        parts.join(" ")
    }
}

/// Bundle optional flags behind a single `-`, or nothing for the empty subset
pub fn render_flags(flags: &[char]) -> Option<String> {
    if flags.is_empty() {
        return None;
    }
    let mut bundle = String::with_capacity(flags.len() + 1);
    bundle.push('-');
    bundle.extend(flags);
    Some(bundle)
}

/// Format a real-valued axis the way the examples expect it (`.5`, not `0.5`)
pub fn format_real(value: f64) -> String {
    let text = value.to_string();
    match text.strip_prefix("0.") {
        Some(fraction) => format!(".{}", fraction),
        None => text,
    }
}
