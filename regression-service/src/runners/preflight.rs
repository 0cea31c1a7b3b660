// Preflight Checks
// Looks for example executables and the MPI launcher before a run starts

use crate::matrix::{CommandTemplate, KernelSpec};

use std::fmt;
use std::path::{Path, PathBuf};

/// Something that will make cases fail once the run reaches them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightIssue {
    /// A kernel's example executable does not exist
    MissingExecutable { kernel: String, path: PathBuf },
    /// The distributed launcher is not on PATH
    MissingLauncher { launcher: String },
}

impl fmt::Display for PreflightIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreflightIssue::MissingExecutable { kernel, path } => {
                write!(f, "executable for '{}' not found at {}", kernel, path.display())
            }
            PreflightIssue::MissingLauncher { launcher } => {
                write!(f, "launcher '{}' not found on PATH", launcher)
            }
        }
    }
}

/// Checks the environment a run depends on.
///
/// Issues are advisory: the run still starts, and the affected case
/// fails through the normal path.
pub struct Preflight<'a> {
    working_dir: &'a Path,
    template: &'a CommandTemplate,
}

impl<'a> Preflight<'a> {
    pub fn new(working_dir: &'a Path, template: &'a CommandTemplate) -> Self {
        Self {
            working_dir,
            template,
        }
    }

    /// Check every kernel, launcher first when any kernel needs it
    pub fn check(&self, kernels: &[KernelSpec]) -> Vec<PreflightIssue> {
        let mut issues = Vec::new();

        if kernels.iter().any(KernelSpec::is_distributed) && self.find_launcher().is_none() {
            issues.push(PreflightIssue::MissingLauncher {
                launcher: self.template.launcher.clone(),
            });
        }

        for kernel in kernels {
            let path = self.executable_path(kernel);
            if !path.is_file() {
                issues.push(PreflightIssue::MissingExecutable {
                    kernel: kernel.name.clone(),
                    path,
                });
            }
        }

        issues
    }

    /// Resolve the launcher the same way the shell will
    pub fn find_launcher(&self) -> Option<PathBuf> {
        let launcher = &self.template.launcher;
        if launcher.contains('/') {
            let path = self.working_dir.join(launcher);
            return path.is_file().then_some(path);
        }
        which::which(launcher).ok()
    }

    /// Location of a kernel's executable relative to the working directory
    pub fn executable_path(&self, kernel: &KernelSpec) -> PathBuf {
        self.working_dir.join(self.template.executable(kernel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_executables_are_reported() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("examples")).unwrap();
        fs::write(dir.path().join("examples/laplace_cartesian"), "").unwrap();

        let template = CommandTemplate::default();
        let preflight = Preflight::new(dir.path(), &template);
        let kernels = vec![
            KernelSpec::new("laplace_cartesian"),
            KernelSpec::new("laplace_spherical"),
        ];

        let issues = preflight.check(&kernels);

        assert_eq!(issues.len(), 1);
        match &issues[0] {
            PreflightIssue::MissingExecutable { kernel, path } => {
                assert_eq!(kernel, "laplace_spherical");
                assert!(path.ends_with("examples/laplace_spherical"));
            }
            other => panic!("unexpected issue: {other}"),
        }
    }

    #[test]
    fn test_missing_launcher_only_matters_for_distributed_kernels() {
        let dir = TempDir::new().unwrap();
        let template = CommandTemplate::default().with_launcher("no-such-launcher-xyz");
        let preflight = Preflight::new(dir.path(), &template);

        let serial = preflight.check(&[KernelSpec::new("laplace_cartesian")]);
        assert!(!serial
            .iter()
            .any(|issue| matches!(issue, PreflightIssue::MissingLauncher { .. })));

        let distributed = preflight.check(&[KernelSpec::new("ewald_mpi")]);
        assert_eq!(
            distributed[0],
            PreflightIssue::MissingLauncher {
                launcher: "no-such-launcher-xyz".to_string()
            }
        );
    }

    #[test]
    fn test_relative_launcher_resolves_against_working_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("launch"), "").unwrap();
        let template = CommandTemplate::default().with_launcher("./launch");
        let preflight = Preflight::new(dir.path(), &template);

        assert_eq!(preflight.find_launcher(), Some(dir.path().join("./launch")));
    }
}
