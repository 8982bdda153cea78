//! Utility modules for common functionality
//!
//! Provides process execution and terminal output helpers.

pub mod output;
pub mod process;

pub use process::{CommandRunner, ProcessRunner, ShellCommand};
