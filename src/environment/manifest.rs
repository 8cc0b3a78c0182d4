//! Environment snapshot backend.
//!
//! Some hosts collect facts about their runtime themselves (package
//! metadata, exported symbol tables) and only need the verdict. They hand
//! those facts over as a manifest:
//!
//! ```yaml
//! runtime:
//!   version: 3.9.5
//! modules:
//!   numpy:
//!     version: 1.21.0
//!   pandas:
//!     version: 0.19.0
//!     symbols: [DataFrame, Series]
//!   brokenlib:
//!     error: "ImportError: libfoo.so: cannot open shared object file"
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as YAML.

use super::{Environment, ModuleHandle, ProbeError};
use crate::error::{EnvcheckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Root of an environment manifest file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentManifest {
    /// Facts about the runtime itself.
    pub runtime: RuntimeManifest,

    /// Installed modules by name.
    pub modules: BTreeMap<String, ModuleManifest>,
}

/// Facts about the runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeManifest {
    /// Runtime version. Missing means the runtime could not be inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Facts about one installed module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleManifest {
    /// Version marker exposed by the module, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Symbols the module exposes.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub symbols: BTreeSet<String>,

    /// Loading the module fails with this reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModuleManifest {
    /// A module with the given version marker.
    pub fn with_version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Default::default()
        }
    }

    /// A module that fails to load.
    pub fn broken(reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Add exposed symbols.
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }
}

/// An [`Environment`] answered entirely from an [`EnvironmentManifest`].
#[derive(Debug, Clone, Default)]
pub struct ManifestEnvironment {
    manifest: EnvironmentManifest,
}

impl ManifestEnvironment {
    /// Wrap an in-memory manifest.
    pub fn new(manifest: EnvironmentManifest) -> Self {
        Self { manifest }
    }

    /// An environment running the given runtime version with no modules.
    pub fn with_runtime(version: &str) -> Self {
        let mut manifest = EnvironmentManifest::default();
        manifest.runtime.version = Some(version.to_string());
        Self { manifest }
    }

    /// Add a module.
    pub fn module(mut self, name: &str, module: ModuleManifest) -> Self {
        self.manifest.modules.insert(name.to_string(), module);
        self
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EnvcheckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let manifest = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| EnvcheckError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| EnvcheckError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };
        tracing::debug!("Loaded environment manifest from {}", path.display());
        Ok(Self::new(manifest))
    }

    /// The underlying manifest.
    pub fn manifest(&self) -> &EnvironmentManifest {
        &self.manifest
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

struct ManifestModule<'a> {
    name: String,
    module: &'a ModuleManifest,
}

impl ModuleHandle for ManifestModule<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<String> {
        self.module.version.clone()
    }

    fn try_resolve_symbol(&self, symbol: &str) -> std::result::Result<(), ProbeError> {
        if self.module.symbols.contains(symbol) {
            Ok(())
        } else {
            Err(ProbeError::SymbolNotFound {
                module: self.name.clone(),
                symbol: symbol.to_string(),
            })
        }
    }
}

impl Environment for ManifestEnvironment {
    fn runtime_version(&self) -> std::result::Result<String, ProbeError> {
        self.manifest
            .runtime
            .version
            .clone()
            .ok_or_else(|| ProbeError::RuntimeUnavailable {
                reason: "no runtime version recorded in manifest".to_string(),
            })
    }

    fn try_load(&self, name: &str) -> std::result::Result<Box<dyn ModuleHandle + '_>, ProbeError> {
        let module = self
            .manifest
            .modules
            .get(name)
            .ok_or_else(|| ProbeError::ModuleNotFound {
                name: name.to_string(),
            })?;
        if let Some(reason) = &module.error {
            return Err(ProbeError::LoadFailed {
                name: name.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(Box::new(ManifestModule {
            name: name.to_string(),
            module,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML_MANIFEST: &str = r#"
runtime:
  version: 3.9.5
modules:
  numpy:
    version: 1.21.0
  pandas:
    version: 0.19.0
    symbols: [DataFrame, Series]
  brokenlib:
    error: "ImportError: cannot open shared object file"
"#;

    #[test]
    fn loads_yaml_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.yml");
        fs::write(&path, YAML_MANIFEST).unwrap();

        let env = ManifestEnvironment::load(&path).unwrap();
        assert_eq!(env.runtime_version().unwrap(), "3.9.5");
        assert_eq!(env.manifest().modules.len(), 3);
    }

    #[test]
    fn loads_json_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.json");
        fs::write(
            &path,
            r#"{"runtime": {"version": "2.7.18"}, "modules": {"numpy": {}}}"#,
        )
        .unwrap();

        let env = ManifestEnvironment::load(&path).unwrap();
        assert_eq!(env.runtime_version().unwrap(), "2.7.18");
        let numpy = env.try_load("numpy").unwrap();
        assert!(numpy.version().is_none());
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let result = ManifestEnvironment::load(Path::new("/nonexistent/env.yml"));
        assert!(matches!(result, Err(EnvcheckError::FileNotFound { .. })));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.yml");
        fs::write(&path, "modules: [not, a, map]").unwrap();

        let result = ManifestEnvironment::load(&path);
        assert!(matches!(result, Err(EnvcheckError::ParseError { .. })));
    }

    #[test]
    fn unknown_module_is_not_found() {
        let env = ManifestEnvironment::with_runtime("3.9.5");
        let err = env.try_load("numpy").err().unwrap();
        assert!(matches!(err, ProbeError::ModuleNotFound { name } if name == "numpy"));
    }

    #[test]
    fn broken_module_fails_to_load() {
        let env = ManifestEnvironment::with_runtime("3.9.5")
            .module("brokenlib", ModuleManifest::broken("SyntaxError"));
        let err = env.try_load("brokenlib").err().unwrap();
        assert!(matches!(err, ProbeError::LoadFailed { reason, .. } if reason == "SyntaxError"));
    }

    #[test]
    fn resolves_declared_symbols_only() {
        let env = ManifestEnvironment::with_runtime("3.9.5").module(
            "pandas",
            ModuleManifest::with_version("1.3.0").symbols(["DataFrame"]),
        );
        let pandas = env.try_load("pandas").unwrap();
        assert_eq!(pandas.name(), "pandas");
        assert_eq!(pandas.version().as_deref(), Some("1.3.0"));
        assert!(pandas.try_resolve_symbol("DataFrame").is_ok());
        assert!(matches!(
            pandas.try_resolve_symbol("Panel"),
            Err(ProbeError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn missing_runtime_version_is_unavailable() {
        let env = ManifestEnvironment::default();
        assert!(matches!(
            env.runtime_version(),
            Err(ProbeError::RuntimeUnavailable { .. })
        ));
    }
}
