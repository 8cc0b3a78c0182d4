//! The built-in policy for Python environments.

use super::{Policy, RuntimeRequirement};
use crate::requirements::{Requirement, VersionRange};

/// Runtime name used by the built-in policy.
pub const DEFAULT_RUNTIME_NAME: &str = "Python";

/// Oldest pandas release the built-in policy accepts.
pub const DEFAULT_MIN_PANDAS_VERSION: &str = "0.20.0";

/// Standard library modules the host relies on.
const BASELINE_MODULES: &[&str] = &[
    "math",
    "socket",
    "struct",
    "base64",
    "traceback",
    "os",
    "pickle",
    "imp",
    "types",
];

/// Standard library requirements. The string buffer module is picked by the
/// installed runtime's major version, not the required one.
pub fn baseline_requirements() -> Vec<Requirement> {
    let mut requirements = vec![
        Requirement::new("io").only_on_major("3"),
        Requirement::new("StringIO").only_on_major("2"),
        Requirement::new("datetime").with_symbols(["datetime"]),
    ];
    requirements.extend(BASELINE_MODULES.iter().copied().map(Requirement::new));
    requirements
}

/// Third-party numeric and tabular libraries.
pub fn third_party_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new("numpy"),
        Requirement::new("pandas")
            .with_range(VersionRange::at_least(DEFAULT_MIN_PANDAS_VERSION))
            .with_symbols(["DataFrame"]),
    ]
}

/// Baseline followed by third-party requirements.
pub fn default_requirements() -> Vec<Requirement> {
    let mut requirements = baseline_requirements();
    requirements.extend(third_party_requirements());
    requirements
}

/// The built-in policy for a runtime contract.
pub fn default_policy(runtime: RuntimeRequirement) -> Policy {
    Policy {
        runtime,
        requirements: default_requirements(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(requirements: &[Requirement]) -> Vec<&str> {
        requirements.iter().map(Requirement::name).collect()
    }

    #[test]
    fn string_buffer_module_depends_on_installed_major() {
        let requirements = baseline_requirements();
        let io = &requirements[0];
        let string_io = &requirements[1];
        assert_eq!(io.name(), "io");
        assert_eq!(io.runtime_major(), Some("3"));
        assert_eq!(string_io.name(), "StringIO");
        assert_eq!(string_io.runtime_major(), Some("2"));
    }

    #[test]
    fn other_baseline_modules_are_unconditional() {
        let requirements = baseline_requirements();
        assert!(requirements[2..].iter().all(|r| r.runtime_major().is_none()));
    }

    #[test]
    fn datetime_requires_datetime_symbol() {
        let baseline = baseline_requirements();
        let datetime = baseline.iter().find(|r| r.name() == "datetime").unwrap();
        assert_eq!(datetime.symbols(), &["datetime".to_string()]);
    }

    #[test]
    fn baseline_has_no_version_constraints() {
        assert!(baseline_requirements()
            .iter()
            .all(|r| r.range().is_unbounded()));
    }

    #[test]
    fn pandas_has_minimum_version_and_dataframe() {
        let third_party = third_party_requirements();
        let pandas = &third_party[1];
        assert_eq!(pandas.name(), "pandas");
        assert_eq!(
            pandas.range().describe(),
            "required minimum version is 0.20.0 (inclusive)"
        );
        assert_eq!(pandas.symbols(), &["DataFrame".to_string()]);
    }

    #[test]
    fn default_policy_orders_baseline_before_third_party() {
        let policy = default_policy(RuntimeRequirement::new("Python", "3", VersionRange::any()));
        let names = names(&policy.requirements);
        assert_eq!(names.len(), 14);
        assert_eq!(&names[12..], &["numpy", "pandas"]);
    }
}
