//! envcheck - Runtime environment compatibility verification.
//!
//! envcheck decides whether a language runtime and a set of named,
//! optionally-versioned modules (and symbols inside them) satisfy a declared
//! compatibility contract, and reports every violation in a stable,
//! line-oriented format that embedding hosts parse.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and output rendering
//! - [`environment`] - Capability interface over the runtime, with backends
//! - [`error`] - Error types and result aliases
//! - [`policy`] - Compatibility contracts as data
//! - [`requirements`] - Versions, probing, checking and reporting
//!
//! # Example
//!
//! ```
//! use envcheck::environment::{ManifestEnvironment, ModuleManifest};
//! use envcheck::requirements::{CompatibilityChecker, Requirement, VersionRange};
//!
//! let env = ManifestEnvironment::with_runtime("3.9.5")
//!     .module("pandas", ModuleManifest::with_version("0.19.0").symbols(["DataFrame"]));
//!
//! let mut checker = CompatibilityChecker::new(&env, "Python");
//! checker.check_requirement(&Requirement::new("numpy"));
//! checker.check_requirement(
//!     &Requirement::new("pandas")
//!         .with_range(VersionRange::at_least("0.20.0"))
//!         .with_symbols(["DataFrame"]),
//! );
//!
//! let report = checker.get_report();
//! assert_eq!(report[0].as_str(), "Library numpy is missing.");
//! assert_eq!(
//!     report[1].as_str(),
//!     "Library pandas is installed in version 0.19.0, required minimum version is 0.20.0 (inclusive)."
//! );
//! ```

pub mod cli;
pub mod environment;
pub mod error;
pub mod policy;
pub mod requirements;

pub use error::{EnvcheckError, Result};
