//! Requirement probing and compatibility checking.
//!
//! This module decides whether an [`Environment`](crate::environment::Environment)
//! satisfies a compatibility contract and reports every violation.
//!
//! # Modules
//!
//! - [`version`] - Loose versions and version ranges
//! - [`requirement`] - Declared module requirements
//! - [`probe`] - Failure-tolerant probing of a single module
//! - [`status`] - Probe outcome types
//! - [`checker`] - Runtime and requirement checks that build the report
//! - [`report`] - Violation messages and their rendering

pub mod checker;
pub mod probe;
pub mod report;
pub mod requirement;
pub mod status;
pub mod version;

pub use checker::CompatibilityChecker;
pub use probe::CapabilityProbe;
pub use report::{render as render_report, Message, Report};
pub use requirement::Requirement;
pub use status::ProbeResult;
pub use version::{Bound, Component, Version, VersionRange};
