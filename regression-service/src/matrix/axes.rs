// Axis Definitions
// Fixed value sequences shared by every kernel family

use crate::matrix::combinations::subset_count;
use crate::matrix::kernel::KernelAxes;

use serde::Serialize;

/// The family-independent axes of the test matrix.
///
/// Each axis is an ordered sequence; the order fixes enumeration order,
/// so a failing case can be reproduced by its position in the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSet {
    /// Number of bodies (`-n`)
    pub sizes: Vec<u64>,
    /// Multipole acceptance criterion (`-t`)
    pub thetas: Vec<f64>,
    /// Worker thread count (`-T`)
    pub threads: Vec<u32>,
    /// Leaf cache size (`-c`)
    pub cache_sizes: Vec<u32>,
    /// Body distribution selector (`-d`)
    pub distributions: Vec<char>,
}

impl AxisSet {
    /// The axes used by the nightly run
    pub fn nightly() -> Self {
        Self {
            sizes: vec![2, 10, 100, 1000, 10000, 100000],
            thetas: vec![0.5, 0.4, 0.3],
            threads: vec![1, 2, 4],
            cache_sizes: vec![1, 8, 64, 512],
            distributions: vec!['c', 'l', 's', 'o', 'p'],
        }
    }

    /// Number of leaf cases a single kernel family expands to
    pub fn cases_per_kernel(&self, kernel: &KernelAxes) -> u64 {
        let flag_subsets = subset_count(kernel.flags.len());
        [
            kernel.process_counts.len(),
            self.sizes.len(),
            self.thetas.len(),
            self.threads.len(),
            self.cache_sizes.len(),
            self.distributions.len(),
            kernel.iteration_counts.len(),
        ]
        .iter()
        .map(|len| *len as u64)
        .fold(flag_subsets, u64::saturating_mul)
    }
}

impl Default for AxisSet {
    fn default() -> Self {
        Self::nightly()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::kernel::KernelSpec;

    #[test]
    fn test_serial_case_count() {
        let axes = AxisSet::nightly();
        let kernel = KernelSpec::new("laplace_cartesian").axes();

        // 6 sizes * 3 thetas * 3 threads * 4 caches * 5 distributions * 4 iterations * 2^4
        assert_eq!(axes.cases_per_kernel(&kernel), 69_120);
    }

    #[test]
    fn test_distributed_case_count() {
        let axes = AxisSet::nightly();

        let laplace = KernelSpec::new("laplace_spherical_mpi").axes();
        assert_eq!(axes.cases_per_kernel(&laplace), 5 * 1080 * 4 * 32);

        let ewald = KernelSpec::new("ewald_mpi").axes();
        assert_eq!(axes.cases_per_kernel(&ewald), 5 * 1080 * 32);
    }

    #[test]
    fn test_empty_axis_yields_no_cases() {
        let mut axes = AxisSet::nightly();
        axes.cache_sizes.clear();
        let kernel = KernelSpec::new("laplace_cartesian").axes();

        assert_eq!(axes.cases_per_kernel(&kernel), 0);
    }

    #[test]
    fn test_oversized_flag_set_saturates() {
        let axes = AxisSet::nightly();
        let mut kernel = KernelSpec::new("laplace_cartesian").axes();
        kernel.flags = ('A'..='Z').chain('a'..='z').chain('0'..='9').chain(['+', '@']).collect();
        assert_eq!(kernel.flags.len(), 64);

        assert_eq!(axes.cases_per_kernel(&kernel), u64::MAX);
    }
}
