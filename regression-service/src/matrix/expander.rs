// Matrix Expansion
// Lazily expands kernel families and axes into concrete test cases

use crate::matrix::axes::AxisSet;
use crate::matrix::case::Case;
use crate::matrix::combinations::FlagSubsets;
use crate::matrix::kernel::{KernelAxes, KernelSpec, KERNEL_FAMILIES};

/// Axis count below the kernel level: process count, size, theta,
/// threads, cache size, distribution, iterations
const DEPTH: usize = 7;

/// Expands the nightly matrix into cases.
///
/// Enumeration order, outermost first: kernel family, process count,
/// size, theta, threads, cache size, distribution, iterations, flag
/// subset. The full nightly matrix runs to millions of cases, so cases
/// are produced on demand rather than collected.
#[derive(Debug, Clone)]
pub struct MatrixExpander {
    kernels: Vec<KernelSpec>,
    axes: AxisSet,
}

impl MatrixExpander {
    /// Expander over every known kernel family with the nightly axes
    pub fn new() -> Self {
        Self {
            kernels: KernelSpec::all(),
            axes: AxisSet::nightly(),
        }
    }

    /// Expander restricted to the named kernels.
    ///
    /// Known families keep their run order no matter how they are listed;
    /// names outside the known list follow them in the order given.
    pub fn for_kernels<S: AsRef<str>>(names: &[S]) -> Self {
        let requested: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();

        let mut kernels: Vec<KernelSpec> = KERNEL_FAMILIES
            .iter()
            .filter(|known| requested.contains(*known))
            .map(|known| KernelSpec::new(*known))
            .collect();

        for name in requested {
            if !KERNEL_FAMILIES.contains(&name) && !kernels.iter().any(|k| k.name == name) {
                kernels.push(KernelSpec::new(name));
            }
        }

        Self {
            kernels,
            axes: AxisSet::nightly(),
        }
    }

    /// Replace the family-independent axes
    pub fn with_axes(mut self, axes: AxisSet) -> Self {
        self.axes = axes;
        self
    }

    /// Kernel families in run order
    pub fn kernels(&self) -> &[KernelSpec] {
        &self.kernels
    }

    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Look up a kernel family in this expander by name
    pub fn kernel(&self, name: &str) -> Option<&KernelSpec> {
        self.kernels.iter().find(|kernel| kernel.name == name)
    }

    /// Number of cases a single kernel expands to
    pub fn kernel_cases(&self, kernel: &KernelSpec) -> u64 {
        self.axes.cases_per_kernel(&kernel.axes())
    }

    /// Total number of cases in the run
    pub fn total_cases(&self) -> u64 {
        self.kernels
            .iter()
            .map(|kernel| self.kernel_cases(kernel))
            .fold(0, u64::saturating_add)
    }

    /// Iterate over every case in run order
    pub fn cases(&self) -> Cases<'_> {
        Cases {
            expander: self,
            kernel_pos: 0,
            current: None,
            positions: [0; DEPTH],
            subsets: FlagSubsets::new(Vec::new()),
            next_index: 0,
        }
    }
}

impl Default for MatrixExpander {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy case iterator produced by [`MatrixExpander::cases`]
#[derive(Debug, Clone)]
pub struct Cases<'a> {
    expander: &'a MatrixExpander,
    kernel_pos: usize,
    /// Axes of the kernel currently being expanded
    current: Option<KernelAxes>,
    /// Odometer over the axes below the kernel level
    positions: [usize; DEPTH],
    subsets: FlagSubsets,
    next_index: u64,
}

impl Cases<'_> {
    fn lengths(&self, kernel: &KernelAxes) -> [usize; DEPTH] {
        let axes = &self.expander.axes;
        [
            kernel.process_counts.len(),
            axes.sizes.len(),
            axes.thetas.len(),
            axes.threads.len(),
            axes.cache_sizes.len(),
            axes.distributions.len(),
            kernel.iteration_counts.len(),
        ]
    }

    /// Step the odometer; false once every position has rolled over
    fn increment(&mut self, lengths: &[usize; DEPTH]) -> bool {
        for axis in (0..DEPTH).rev() {
            self.positions[axis] += 1;
            if self.positions[axis] < lengths[axis] {
                return true;
            }
            self.positions[axis] = 0;
        }
        false
    }

    fn build(&self, kernel: &KernelAxes, flags: Vec<char>) -> Case {
        let axes = &self.expander.axes;
        let [np, size, theta, threads, cache, dist, iter] = self.positions;
        Case {
            index: self.next_index,
            kernel: self.expander.kernels[self.kernel_pos].clone(),
            process_count: kernel.process_counts[np],
            size: axes.sizes[size],
            theta: axes.thetas[theta],
            threads: axes.threads[threads],
            cache_size: axes.cache_sizes[cache],
            distribution: axes.distributions[dist],
            iterations: kernel.iteration_counts[iter],
            flags,
        }
    }
}

impl Iterator for Cases<'_> {
    type Item = Case;

    fn next(&mut self) -> Option<Case> {
        loop {
            if self.kernel_pos >= self.expander.kernels.len() {
                return None;
            }

            let kernel = match self.current.take() {
                Some(kernel) => kernel,
                None => {
                    let kernel = self.expander.kernels[self.kernel_pos].axes();
                    if self.lengths(&kernel).contains(&0) {
                        self.kernel_pos += 1;
                        continue;
                    }
                    self.positions = [0; DEPTH];
                    self.subsets = FlagSubsets::new(kernel.flags.clone());
                    kernel
                }
            };

            if let Some(flags) = self.subsets.next() {
                let case = self.build(&kernel, flags);
                self.next_index += 1;
                self.current = Some(kernel);
                return Some(case);
            }

            let lengths = self.lengths(&kernel);
            if self.increment(&lengths) {
                self.subsets = FlagSubsets::new(kernel.flags.clone());
                self.current = Some(kernel);
            } else {
                self.kernel_pos += 1;
            }
        }
    }
}
