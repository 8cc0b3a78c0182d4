//! Verification policies.
//!
//! A [`Policy`] is the compatibility contract as data: the runtime's major
//! version and range, followed by an ordered list of module requirements.
//! Hosts swap policies (for example one per host version) without touching
//! the checker.
//!
//! # Modules
//!
//! - [`defaults`] - The built-in policy for Python environments
//! - [`loader`] - Policy files in YAML or JSON
//!
//! # Example
//!
//! ```
//! use envcheck::environment::{ManifestEnvironment, ModuleManifest};
//! use envcheck::policy::{verify, Policy, RuntimeRequirement};
//! use envcheck::requirements::{Requirement, VersionRange};
//!
//! let env = ManifestEnvironment::with_runtime("3.9.5")
//!     .module("numpy", ModuleManifest::with_version("1.21.0"));
//! let policy = Policy::new(RuntimeRequirement::new("Python", "3", VersionRange::any()))
//!     .require(Requirement::new("numpy"))
//!     .require(Requirement::new("pandas"));
//!
//! let verification = verify(&env, &policy);
//! assert_eq!(verification.runtime_version.as_deref(), Some("3.9.5"));
//! assert_eq!(verification.render_report(), "Library pandas is missing.");
//! ```

pub mod defaults;
pub mod loader;

pub use defaults::{default_policy, default_requirements, DEFAULT_RUNTIME_NAME};
pub use loader::{load_policy_file, PolicyFile, RequirementConfig};

use crate::environment::Environment;
use crate::requirements::{render_report, CompatibilityChecker, Message, Requirement, VersionRange};
use serde::Serialize;

/// The runtime half of a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeRequirement {
    /// Display name used in messages and the version line (e.g. "Python").
    pub name: String,
    /// Required major version.
    pub major: String,
    /// Required version range.
    pub range: VersionRange,
}

impl RuntimeRequirement {
    pub fn new(name: impl Into<String>, major: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            major: major.into(),
            range,
        }
    }
}

/// A complete compatibility contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub runtime: RuntimeRequirement,
    pub requirements: Vec<Requirement>,
}

impl Policy {
    /// A policy checking only the runtime.
    pub fn new(runtime: RuntimeRequirement) -> Self {
        Self {
            runtime,
            requirements: Vec::new(),
        }
    }

    /// Append a requirement.
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Append unconstrained requirements for each module name.
    pub fn with_additional_modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements
            .extend(names.into_iter().map(Requirement::new));
        self
    }
}

/// Outcome of running a policy against an environment.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    /// Display name of the runtime.
    pub runtime: String,
    /// Discovered runtime version, `None` if it could not be inspected.
    pub runtime_version: Option<String>,
    /// True when no violation was found.
    pub compatible: bool,
    /// Every violation in emission order.
    pub messages: Vec<Message>,
}

impl Verification {
    /// The newline-joined report, empty when fully compatible.
    pub fn render_report(&self) -> String {
        render_report(&self.messages)
    }
}

/// Run a policy: the runtime check first, then each requirement in order.
pub fn verify(env: &dyn Environment, policy: &Policy) -> Verification {
    let runtime = &policy.runtime;
    let mut checker = CompatibilityChecker::new(env, runtime.name.as_str());

    let runtime_version = checker.runtime_version();
    checker.check_runtime(&runtime.major, &runtime.range);
    checker.check_all(&policy.requirements);

    let messages = checker.get_report();
    tracing::info!(
        "Checked {} requirement(s) against {} {}: {} violation(s)",
        policy.requirements.len(),
        runtime.name,
        runtime_version.as_deref().unwrap_or("unknown"),
        messages.len()
    );

    Verification {
        runtime: runtime.name.clone(),
        runtime_version,
        compatible: messages.is_empty(),
        messages,
    }
}
