//! CLI command implementations.

pub mod brand;
pub mod compare;
pub mod shell;

pub use brand::BrandCommand;
pub use compare::CompareCommand;
pub use shell::{ShellCommand, ShellMode};
