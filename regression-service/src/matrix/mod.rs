// Test Matrix Module
// Kernel families, axes, flag power sets, and case rendering

pub mod axes;
pub mod case;
pub mod combinations;
pub mod expander;
pub mod kernel;

// Re-export key types
pub use axes::AxisSet;
pub use case::{Case, CommandTemplate};
pub use combinations::FlagSubsets;
pub use expander::{Cases, MatrixExpander};
pub use kernel::{KernelAxes, KernelSpec, KERNEL_FAMILIES};
