//! Library integration tests.

use envcheck::environment::{Environment, ManifestEnvironment, ModuleHandle, ModuleManifest, ProbeError};
use envcheck::policy::{default_policy, verify, Policy, RuntimeRequirement};
use envcheck::requirements::{CompatibilityChecker, Requirement, Version, VersionRange};
use envcheck::EnvcheckError;

fn python_range() -> VersionRange {
    VersionRange::any()
        .with_min(Version::parse("3.6.0"), true)
        .with_max(Version::parse("3.10.0"), false)
}

#[test]
fn error_types_are_public() {
    let err = EnvcheckError::InterpreterNotFound {
        program: "python3".into(),
    };
    assert!(err.to_string().contains("python3"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> envcheck::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn check_runtime_against_simulated_versions() {
    let cases = [("3.9.5", 0), ("2.7.18", 1), ("3.11.0", 1), ("3.6.0", 0), ("3.10.0", 1)];
    for (version, expected) in cases {
        let env = ManifestEnvironment::with_runtime(version);
        let mut checker = CompatibilityChecker::new(&env, "Python");
        let messages = checker.check_runtime("3", &python_range());
        assert_eq!(messages.len(), expected, "runtime {}", version);
    }
}

#[test]
fn major_mismatch_and_range_mismatch_are_worded_differently() {
    let old = ManifestEnvironment::with_runtime("2.7.18");
    let new = ManifestEnvironment::with_runtime("3.11.0");

    let old_msg = CompatibilityChecker::new(&old, "Python").check_runtime("3", &python_range());
    let new_msg = CompatibilityChecker::new(&new, "Python").check_runtime("3", &python_range());

    assert!(old_msg[0].as_str().contains("major version of 3"));
    assert!(old_msg[0].as_str().contains("3.10.0 (exclusive)"));
    assert!(new_msg[0].as_str().contains("Installed Python version is 3.11.0"));
}

/// A backend defined outside the crate, with a module whose version marker
/// is not a plain number.
struct VendoredEnvironment;

struct VendoredModule;

impl ModuleHandle for VendoredModule {
    fn name(&self) -> &str {
        "vendored"
    }

    fn version(&self) -> Option<String> {
        Some("2.0.0-dev+local".to_string())
    }

    fn try_resolve_symbol(&self, symbol: &str) -> Result<(), ProbeError> {
        Err(ProbeError::SymbolNotFound {
            module: "vendored".to_string(),
            symbol: symbol.to_string(),
        })
    }
}

impl Environment for VendoredEnvironment {
    fn runtime_version(&self) -> Result<String, ProbeError> {
        Ok("3.8.10".to_string())
    }

    fn try_load(&self, name: &str) -> Result<Box<dyn ModuleHandle + '_>, ProbeError> {
        match name {
            "vendored" => Ok(Box::new(VendoredModule)),
            _ => Err(ProbeError::ModuleNotFound {
                name: name.to_string(),
            }),
        }
    }
}

#[test]
fn custom_environment_plugs_into_checker() {
    let env = VendoredEnvironment;
    let policy = Policy::new(RuntimeRequirement::new("Python", "3", python_range()))
        .require(Requirement::new("vendored").with_range(VersionRange::at_least("1.5")))
        .require(Requirement::new("vendored").with_symbols(["helper"]));

    let verification = verify(&env, &policy);
    assert_eq!(verification.runtime_version.as_deref(), Some("3.8.10"));
    assert_eq!(
        verification.render_report(),
        "Required class helper in library vendored is missing."
    );
}

#[test]
fn default_policy_end_to_end() {
    let env = ManifestEnvironment::with_runtime("3.9.5")
        .module("io", ModuleManifest::default())
        .module("datetime", ModuleManifest::default())
        .module("pandas", ModuleManifest::with_version("0.19.0"));
    let policy = default_policy(RuntimeRequirement::new("Python", "3", python_range()))
        .with_additional_modules(["pyarrow"]);

    let verification = verify(&env, &policy);
    let lines: Vec<&str> = verification.messages.iter().map(|m| m.as_str()).collect();

    assert_eq!(lines[0], "Required class datetime in library datetime is missing.");
    assert!(lines.contains(&"Library numpy is missing."));
    assert!(lines.contains(
        &"Library pandas is installed in version 0.19.0, required minimum version is 0.20.0 (inclusive)."
    ));
    assert_eq!(*lines.last().unwrap(), "Library pyarrow is missing.");
    assert!(!lines.iter().any(|l| l.contains("Library io ")));
}
