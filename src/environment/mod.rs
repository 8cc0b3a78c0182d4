//! Typed capability interface over the runtime being verified.
//!
//! An [`Environment`] answers three questions: which runtime version is
//! running, can a named module be loaded, and does a loaded module expose a
//! named symbol. Every answer is a `Result` tagged with a [`ProbeError`];
//! implementations never build code out of the names they are asked about.
//!
//! # Modules
//!
//! - [`interpreter`] - Inspect an external interpreter through a fixed probe program
//! - [`manifest`] - Environment snapshot loaded from YAML/JSON or built in code

pub mod interpreter;
pub mod manifest;

pub use interpreter::InterpreterEnvironment;
pub use manifest::{EnvironmentManifest, ManifestEnvironment, ModuleManifest};

use thiserror::Error;

/// Why a runtime, module or symbol could not be inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The module does not exist in the runtime's namespace.
    #[error("module '{name}' not found")]
    ModuleNotFound { name: String },

    /// The module exists but failed while loading.
    #[error("module '{name}' failed to load: {reason}")]
    LoadFailed { name: String, reason: String },

    /// The module loaded but does not expose the symbol.
    #[error("symbol '{symbol}' not found in module '{module}'")]
    SymbolNotFound { module: String, symbol: String },

    /// The runtime itself could not be inspected.
    #[error("runtime unavailable: {reason}")]
    RuntimeUnavailable { reason: String },
}

/// A module that loaded successfully.
pub trait ModuleHandle {
    /// The module's name as requested.
    fn name(&self) -> &str;

    /// The module's own version marker, if it exposes one.
    fn version(&self) -> Option<String>;

    /// Resolve a named symbol inside the module.
    fn try_resolve_symbol(&self, symbol: &str) -> Result<(), ProbeError>;
}

/// A runtime whose modules can be probed.
pub trait Environment {
    /// The dot-separated version of the running runtime.
    fn runtime_version(&self) -> Result<String, ProbeError>;

    /// Attempt to load a module by name.
    fn try_load(&self, name: &str) -> Result<Box<dyn ModuleHandle + '_>, ProbeError>;
}
