//! Command-line interface for envcheck.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - Policy/environment assembly and output rendering

pub mod args;
pub mod run;

pub use args::{Cli, OutputFormat};
pub use run::{build_policy, execute, open_environment, render, runtime_requirement};
