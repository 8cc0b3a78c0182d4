//! Compatibility checker.
//!
//! The `CompatibilityChecker` checks the runtime and declared requirements
//! of one [`Environment`] and accumulates a message for every violation.
//! The wording of the messages is read by embedding hosts and must stay
//! stable.

use super::probe::CapabilityProbe;
use super::report::{Message, Report};
use super::requirement::Requirement;
use super::version::{Version, VersionRange};
use crate::environment::{Environment, ProbeError};

/// Append the range's bound description and the closing period.
fn with_bounds(text: String, range: &VersionRange) -> String {
    let bounds = range.describe();
    if bounds.is_empty() {
        format!("{}.", text)
    } else {
        format!("{}, {}.", text, bounds)
    }
}

/// Checks one environment against a compatibility contract.
///
/// Single-use per run: the report only ever grows.
pub struct CompatibilityChecker<'a> {
    env: &'a dyn Environment,
    runtime_name: String,
    runtime_version: Option<Result<String, ProbeError>>,
    report: Report,
}

impl<'a> CompatibilityChecker<'a> {
    /// Create a checker. `runtime_name` is used in messages (e.g. "Python").
    pub fn new(env: &'a dyn Environment, runtime_name: impl Into<String>) -> Self {
        Self {
            env,
            runtime_name: runtime_name.into(),
            runtime_version: None,
            report: Report::new(),
        }
    }

    /// Display name of the runtime.
    pub fn runtime_name(&self) -> &str {
        &self.runtime_name
    }

    /// The running runtime's version, discovered once per checker.
    pub fn runtime_version(&mut self) -> Option<String> {
        self.discover_runtime().ok()
    }

    fn discover_runtime(&mut self) -> Result<String, ProbeError> {
        let env = self.env;
        self.runtime_version
            .get_or_insert_with(|| {
                let version = env.runtime_version();
                tracing::debug!("Discovered runtime version: {:?}", version);
                version
            })
            .clone()
    }

    /// Check the runtime's major version and version range.
    ///
    /// Emits at most one message. A major version mismatch still describes
    /// the full range.
    pub fn check_runtime(&mut self, required_major: &str, range: &VersionRange) -> Vec<Message> {
        let name = self.runtime_name.clone();
        let mut messages = Vec::new();

        match self.discover_runtime() {
            Err(e) => {
                let text = with_bounds(
                    format!("{} is missing, required major version is {}", name, required_major),
                    range,
                );
                messages.push(Message::new(format!(
                    "{}\nThe {} installation could not be inspected: {}.",
                    text, name, e
                )));
            }
            Ok(installed) => {
                let version = Version::parse(&installed);
                if version.major() != Some(Version::parse(required_major)) {
                    let text = with_bounds(
                        format!(
                            "{} is required to have a major version of {}",
                            name, required_major
                        ),
                        range,
                    );
                    messages.push(Message::new(format!(
                        "{}\nThe installed {} version is {}.",
                        text, name, installed
                    )));
                } else if !range.contains(&version) {
                    messages.push(Message::new(with_bounds(
                        format!("Installed {} version is {}", name, installed),
                        range,
                    )));
                }
            }
        }

        self.report.extend(messages.iter().cloned());
        messages
    }

    /// Check one declared requirement.
    ///
    /// A missing module or a non-conforming version yields exactly one
    /// message; otherwise one message per missing symbol.
    ///
    /// A requirement tied to another runtime major version than the
    /// installed one is skipped.
    pub fn check_requirement(&mut self, requirement: &Requirement) -> Vec<Message> {
        if requirement.runtime_major().is_some() {
            let installed_major = self
                .discover_runtime()
                .ok()
                .and_then(|v| Version::parse(&v).major());
            if !requirement.applies_to(installed_major.as_ref()) {
                tracing::debug!(
                    "Skipping {}: only checked on major version {:?}",
                    requirement.name(),
                    requirement.runtime_major()
                );
                return Vec::new();
            }
        }

        let result = CapabilityProbe::new(self.env).probe_requirement(requirement);
        let name = requirement.name();
        let range = requirement.range();
        let mut messages = Vec::new();

        if !result.available {
            messages.push(Message::new(with_bounds(
                format!("Library {} is missing", name),
                range,
            )));
        } else if !result.version_conforms {
            let installed = match &result.version {
                Some(v) => format!("Library {} is installed in version {}", name, v),
                None => format!("Library {} is installed in an unknown version", name),
            };
            messages.push(Message::new(with_bounds(installed, range)));
        } else {
            messages.extend(result.missing_symbols.iter().map(|symbol| {
                Message::new(format!(
                    "Required class {} in library {} is missing.",
                    symbol, name
                ))
            }));
        }

        if !messages.is_empty() {
            tracing::debug!("{}: {} violation(s)", name, messages.len());
        }
        self.report.extend(messages.iter().cloned());
        messages
    }

    /// Check requirements in order, returning all messages produced.
    pub fn check_all(&mut self, requirements: &[Requirement]) -> Vec<Message> {
        requirements
            .iter()
            .flat_map(|req| self.check_requirement(req))
            .collect()
    }

    /// A copy of every message accumulated so far, in emission order.
    pub fn get_report(&self) -> Vec<Message> {
        self.report.messages()
    }

    /// Consume the checker, keeping its report.
    pub fn into_report(self) -> Report {
        self.report
    }
}
