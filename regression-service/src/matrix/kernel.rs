// Kernel Families
// Derives per-family traits and family-dependent axes from the kernel name

use serde::Serialize;

/// Name marker for kernels launched across MPI processes
pub const DISTRIBUTED_MARKER: &str = "mpi";

/// Name marker for Ewald summation kernels
pub const EWALD_MARKER: &str = "ewald";

/// Every kernel family exercised by the nightly run, in run order
pub const KERNEL_FAMILIES: [&str; 9] = [
    "laplace_cartesian",
    "laplace_spherical",
    "helmholtz_spherical",
    "biotsavart_spherical",
    "laplace_cartesian_mpi",
    "laplace_spherical_mpi",
    "helmholtz_spherical_mpi",
    "biotsavart_spherical_mpi",
    "ewald_mpi",
];

const SERIAL_FLAGS: [char; 4] = ['j', 'm', 'o', 'x'];
const DISTRIBUTED_FLAGS: [char; 5] = ['g', 'j', 'm', 'o', 'x'];

const SERIAL_PROCESS_COUNTS: [u32; 1] = [1];
const DISTRIBUTED_PROCESS_COUNTS: [u32; 5] = [1, 2, 4, 8, 16];

const DEFAULT_ITERATIONS: [u32; 4] = [0, 1, 2, 3];
const EWALD_ITERATIONS: [u32; 1] = [3];

/// A kernel family, identified by the name of its example executable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KernelSpec {
    pub name: String,
}

impl KernelSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// All known kernel families in run order
    pub fn all() -> Vec<KernelSpec> {
        KERNEL_FAMILIES.iter().map(|name| KernelSpec::new(*name)).collect()
    }

    /// Whether this family runs under the distributed launcher
    pub fn is_distributed(&self) -> bool {
        self.name.contains(DISTRIBUTED_MARKER)
    }

    /// Whether this family is an Ewald kernel
    pub fn is_ewald(&self) -> bool {
        self.name.contains(EWALD_MARKER)
    }

    /// Resolve the family-dependent axes for this kernel
    pub fn axes(&self) -> KernelAxes {
        let is_distributed = self.is_distributed();
        let is_ewald = self.is_ewald();

        let (flags, process_counts) = if is_distributed {
            (DISTRIBUTED_FLAGS.to_vec(), DISTRIBUTED_PROCESS_COUNTS.to_vec())
        } else {
            (SERIAL_FLAGS.to_vec(), SERIAL_PROCESS_COUNTS.to_vec())
        };

        let iteration_counts = if is_ewald {
            EWALD_ITERATIONS.to_vec()
        } else {
            DEFAULT_ITERATIONS.to_vec()
        };

        KernelAxes {
            is_distributed,
            is_ewald,
            flags,
            process_counts,
            iteration_counts,
        }
    }
}

impl std::fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Traits and family-dependent axes of a kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KernelAxes {
    pub is_distributed: bool,
    pub is_ewald: bool,
    /// Optional single-letter switches; every subset is a case variant
    pub flags: Vec<char>,
    /// Values for `mpirun -np`
    pub process_counts: Vec<u32>,
    /// Values for `-i`
    pub iteration_counts: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_kernel_axes() {
        let axes = KernelSpec::new("laplace_cartesian").axes();

        assert!(!axes.is_distributed);
        assert!(!axes.is_ewald);
        assert_eq!(axes.flags, vec!['j', 'm', 'o', 'x']);
        assert_eq!(axes.process_counts, vec![1]);
        assert_eq!(axes.iteration_counts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_distributed_kernel_axes() {
        let axes = KernelSpec::new("helmholtz_spherical_mpi").axes();

        assert!(axes.is_distributed);
        assert!(!axes.is_ewald);
        assert_eq!(axes.flags, vec!['g', 'j', 'm', 'o', 'x']);
        assert_eq!(axes.process_counts, vec![1, 2, 4, 8, 16]);
        assert_eq!(axes.iteration_counts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ewald_kernel_axes() {
        let axes = KernelSpec::new("ewald_mpi").axes();

        assert!(axes.is_distributed);
        assert!(axes.is_ewald);
        assert_eq!(axes.iteration_counts, vec![3]);
    }

    #[test]
    fn test_unknown_name_uses_defaults() {
        let axes = KernelSpec::new("stokes").axes();

        assert!(!axes.is_distributed);
        assert!(!axes.is_ewald);
        assert_eq!(axes.process_counts, vec![1]);
        assert_eq!(axes.iteration_counts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_traits_follow_every_known_family() {
        for kernel in KernelSpec::all() {
            let axes = kernel.axes();
            assert_eq!(axes.is_distributed, kernel.name.ends_with("_mpi"));
            assert_eq!(axes.flags.contains(&'g'), axes.is_distributed);
            // Derivation is stable for a given name
            assert_eq!(axes, kernel.axes());
        }
    }
}
