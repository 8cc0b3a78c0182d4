//! External interpreter backend.
//!
//! Inspects an interpreter executable (e.g. `python3`) without linking
//! against it. Each request spawns the interpreter with a fixed probe
//! program and passes the request as process arguments:
//!
//! - `runtime` - report the interpreter version
//! - `module <name>` - import a module and report its `__version__`
//! - `symbol <module> <name>` - resolve a symbol inside a module
//!
//! The reply is a JSON object on the last non-empty stdout line, so anything
//! a module prints while it initializes is ignored.
//!
//! # Example
//!
//! ```no_run
//! use envcheck::environment::{Environment, InterpreterEnvironment};
//!
//! let python = InterpreterEnvironment::locate("python3")?;
//! println!("Python version: {}", python.runtime_version()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::{Environment, ModuleHandle, ProbeError};
use crate::error::{EnvcheckError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// Probe program run inside the interpreter.
const PROBE_PROGRAM: &str = include_str!("probe.py");

/// Version patterns tried in order against `--version` output.
static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a program's path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_program_path(program: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Extract a version number from free-form `--version` output.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_PATTERNS
        .iter()
        .find_map(|re| re.captures(output))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct RuntimeReply {
    version: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModuleReply {
    #[serde(default)]
    available: bool,
    version: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolReply {
    #[serde(default)]
    resolved: bool,
    error: Option<String>,
}

/// Parse the reply line out of the probe program's stdout.
fn parse_reply<T: DeserializeOwned>(stdout: &str) -> std::result::Result<T, String> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "probe produced no output".to_string())?;
    serde_json::from_str(line.trim()).map_err(|e| format!("unreadable probe reply: {}", e))
}

/// An [`Environment`] backed by an interpreter executable.
#[derive(Debug, Clone)]
pub struct InterpreterEnvironment {
    program: PathBuf,
}

impl InterpreterEnvironment {
    /// Use the interpreter at the given path as-is.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate an interpreter by name on PATH, or by explicit path.
    pub fn locate(program: &str) -> Result<Self> {
        Self::locate_in(program, &parse_system_path())
    }

    /// Locate an interpreter using the given PATH entries.
    pub fn locate_in(program: &str, path_entries: &[PathBuf]) -> Result<Self> {
        let as_path = Path::new(program);
        let resolved = if as_path.components().count() > 1 {
            Some(as_path.to_path_buf()).filter(|p| p.is_file())
        } else {
            resolve_program_path(program, path_entries)
        };

        match resolved {
            Some(path) => {
                tracing::debug!("Using interpreter at {}", path.display());
                Ok(Self::new(path))
            }
            None => Err(EnvcheckError::InterpreterNotFound {
                program: program.to_string(),
            }),
        }
    }

    /// Path of the interpreter executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn request<T: DeserializeOwned>(&self, args: &[&str]) -> std::result::Result<T, String> {
        tracing::debug!("Probing {} with {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .arg("-c")
            .arg(PROBE_PROGRAM)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to start {}: {}", self.program.display(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_reply(&stdout).map_err(|e| match output.status.code() {
            Some(0) => e,
            code => format!("{} (exit code {:?})", e, code),
        })
    }

    fn version_from_banner(&self) -> Option<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .ok()?;
        // Python 2 prints its banner to stderr.
        let text = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        extract_version(&text)
    }
}

struct InterpreterModule<'a> {
    env: &'a InterpreterEnvironment,
    name: String,
    version: Option<String>,
}

impl ModuleHandle for InterpreterModule<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn try_resolve_symbol(&self, symbol: &str) -> std::result::Result<(), ProbeError> {
        let not_found = || ProbeError::SymbolNotFound {
            module: self.name.clone(),
            symbol: symbol.to_string(),
        };
        let reply: SymbolReply = self
            .env
            .request(&["symbol", &self.name, symbol])
            .map_err(|e| {
                tracing::debug!("Symbol probe for {}.{} failed: {}", self.name, symbol, e);
                not_found()
            })?;
        if reply.resolved {
            Ok(())
        } else {
            if let Some(error) = reply.error {
                tracing::debug!("{}.{}: {}", self.name, symbol, error);
            }
            Err(not_found())
        }
    }
}

impl Environment for InterpreterEnvironment {
    fn runtime_version(&self) -> std::result::Result<String, ProbeError> {
        let reply = self
            .request::<RuntimeReply>(&["runtime"])
            .and_then(|r| match (r.version, r.error) {
                (Some(version), _) => Ok(version),
                (None, Some(error)) => Err(error),
                (None, None) => Err("probe reported no version".to_string()),
            });

        match reply {
            Ok(version) => Ok(version),
            Err(reason) => {
                tracing::debug!("Runtime probe failed ({}), trying --version", reason);
                self.version_from_banner()
                    .ok_or(ProbeError::RuntimeUnavailable { reason })
            }
        }
    }

    fn try_load(&self, name: &str) -> std::result::Result<Box<dyn ModuleHandle + '_>, ProbeError> {
        let reply: ModuleReply =
            self.request(&["module", name])
                .map_err(|reason| ProbeError::LoadFailed {
                    name: name.to_string(),
                    reason,
                })?;

        if !reply.available {
            let reason = reply.error.unwrap_or_default();
            return Err(if reason.contains("No module named") {
                ProbeError::ModuleNotFound {
                    name: name.to_string(),
                }
            } else {
                ProbeError::LoadFailed {
                    name: name.to_string(),
                    reason,
                }
            });
        }

        Ok(Box::new(InterpreterModule {
            env: self,
            name: name.to_string(),
            version: reply.version,
        }))
    }
}
