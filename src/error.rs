//! Error types for envcheck operations.
//!
//! This module defines [`EnvcheckError`], the error type for everything that
//! can stop a verification run from starting, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - An incompatible environment is never an error. It is reported as
//!   messages in the [`Report`](crate::requirements::Report).
//! - Failures while probing a single module are [`ProbeError`](crate::environment::ProbeError)s
//!   and are contained by the [`CapabilityProbe`](crate::requirements::CapabilityProbe).
//! - `EnvcheckError` covers bad input: unreadable or invalid policy and
//!   manifest files, or an interpreter that cannot be located.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envcheck operations.
#[derive(Debug, Error)]
pub enum EnvcheckError {
    /// Policy or manifest file not found at the given location.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to parse a policy or manifest file.
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Parsed policy contains invalid values.
    #[error("Invalid policy: {message}")]
    PolicyValidationError { message: String },

    /// The interpreter to inspect could not be located.
    #[error("Interpreter '{program}' not found on PATH")]
    InterpreterNotFound { program: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envcheck operations.
pub type Result<T> = std::result::Result<T, EnvcheckError>;
