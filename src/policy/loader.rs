//! Policy file loading.
//!
//! A policy file replaces the built-in requirement list:
//!
//! ```yaml
//! runtime: Python
//! requirements:
//!   - name: numpy
//!     min: "1.16.0"
//!   - name: pandas
//!     min: "0.23.0"
//!     max: "2.0.0"
//!     max_inclusive: false
//!     symbols: [DataFrame]
//!   - name: StringIO
//!     runtime_major: "2"
//! ```
//!
//! Bounds are inclusive unless stated otherwise. Files ending in `.json`
//! are read as JSON, everything else as YAML.

use crate::environment::manifest::is_json;
use crate::error::{EnvcheckError, Result};
use crate::requirements::{Requirement, Version, VersionRange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_inclusive() -> bool {
    true
}

/// Root of a policy file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    /// Runtime display name, overrides the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Requirements in the order they are checked.
    #[serde(default)]
    pub requirements: Vec<RequirementConfig>,
}

/// One requirement as written in a policy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementConfig {
    /// Module name.
    pub name: String,

    /// Lower version bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default = "default_inclusive")]
    pub min_inclusive: bool,

    /// Upper version bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(default = "default_inclusive")]
    pub max_inclusive: bool,

    /// Symbols that must resolve inside the module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,

    /// Only check this requirement when the installed runtime has this
    /// major version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_major: Option<String>,
}

impl RequirementConfig {
    fn validate(&self, index: usize) -> Result<()> {
        let invalid = |message: String| Err(EnvcheckError::PolicyValidationError { message });

        if self.name.trim().is_empty() {
            return invalid(format!("requirement #{} has an empty name", index + 1));
        }
        if self.name.chars().any(char::is_whitespace) {
            return invalid(format!(
                "requirement name '{}' contains whitespace",
                self.name
            ));
        }
        if let Some(symbol) = self
            .symbols
            .iter()
            .find(|s| s.trim().is_empty() || s.chars().any(char::is_whitespace))
        {
            return invalid(format!(
                "requirement '{}' has an invalid symbol name '{}'",
                self.name, symbol
            ));
        }
        Ok(())
    }

    fn to_requirement(&self) -> Requirement {
        let mut range = VersionRange::any();
        if let Some(min) = &self.min {
            range = range.with_min(Version::parse(min), self.min_inclusive);
        }
        if let Some(max) = &self.max {
            range = range.with_max(Version::parse(max), self.max_inclusive);
        }
        let requirement = Requirement::new(self.name.as_str())
            .with_range(range)
            .with_symbols(self.symbols.iter().cloned());
        match &self.runtime_major {
            Some(major) => requirement.only_on_major(major.as_str()),
            None => requirement,
        }
    }
}

impl PolicyFile {
    /// Validate and convert to requirements, keeping file order.
    pub fn to_requirements(&self) -> Result<Vec<Requirement>> {
        self.requirements
            .iter()
            .enumerate()
            .map(|(i, config)| -> Result<Requirement> {
                config.validate(i)?;
                Ok(config.to_requirement())
            })
            .collect()
    }
}

/// Read and parse a policy file.
pub fn load_policy_file(path: &Path) -> Result<PolicyFile> {
    if !path.exists() {
        return Err(EnvcheckError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let parsed = if is_json(path) {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    let policy: PolicyFile = parsed.map_err(|message| EnvcheckError::ParseError {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(
        "Loaded {} requirement(s) from {}",
        policy.requirements.len(),
        path.display()
    );
    Ok(policy)
}
