//! Failure-tolerant probing of a single module.
//!
//! A broken optional dependency must never abort the scan of all the others.
//! [`CapabilityProbe`] therefore contains every failure of exactly two
//! calls, [`Environment::try_load`] and [`ModuleHandle::try_resolve_symbol`],
//! including panics raised by the backend while it performs them. Contained
//! panics are logged at debug level instead of being printed by the panic
//! hook. Anything outside those calls is not contained.
//!
//! Symbols are only resolved once the module's version conforms.
//!
//! # Example
//!
//! ```
//! use envcheck::environment::{ManifestEnvironment, ModuleManifest};
//! use envcheck::requirements::{CapabilityProbe, VersionRange};
//!
//! let env = ManifestEnvironment::with_runtime("3.9.5")
//!     .module("pandas", ModuleManifest::with_version("0.19.0"));
//! let probe = CapabilityProbe::new(&env);
//!
//! let result = probe.probe("pandas", &VersionRange::at_least("0.20.0"), &[]);
//! assert!(result.available);
//! assert!(!result.version_conforms);
//! assert_eq!(result.version.as_deref(), Some("0.19.0"));
//! ```

use super::requirement::Requirement;
use super::status::ProbeResult;
use super::version::{Version, VersionRange};
use crate::environment::{Environment, ModuleHandle, ProbeError};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    /// Set while this thread runs a contained call.
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the process panic hook once so that panics inside contained calls
/// are not printed. Panics anywhere else still reach the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CONTAINING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run one load/resolve call, turning a panic into a [`ProbeError`].
fn contained<T, F, P>(call: F, on_panic: P) -> Result<T, ProbeError>
where
    F: FnOnce() -> Result<T, ProbeError>,
    P: FnOnce(String) -> ProbeError,
{
    install_quiet_hook();
    let outer = CONTAINING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(call));
    CONTAINING.with(|flag| flag.set(outer));

    result.unwrap_or_else(|payload| {
        let message = panic_message(payload);
        tracing::debug!("Contained backend panic: {}", message);
        Err(on_panic(message))
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Probes modules of one [`Environment`].
pub struct CapabilityProbe<'a> {
    env: &'a dyn Environment,
}

impl<'a> CapabilityProbe<'a> {
    /// Create a probe over an environment.
    pub fn new(env: &'a dyn Environment) -> Self {
        Self { env }
    }

    /// Probe a declared requirement.
    pub fn probe_requirement(&self, requirement: &Requirement) -> ProbeResult {
        self.probe(
            requirement.name(),
            requirement.range(),
            requirement.symbols(),
        )
    }

    /// Probe a module's presence, version conformance and symbols.
    pub fn probe(
        &self,
        module_name: &str,
        range: &VersionRange,
        symbols: &[String],
    ) -> ProbeResult {
        let module = match self.load(module_name) {
            Ok(module) => module,
            Err(e) => {
                tracing::debug!("{} is not available: {}", module_name, e);
                return ProbeResult::unavailable();
            }
        };

        let version = module.version();
        let version_conforms = if range.is_unbounded() {
            true
        } else {
            version
                .as_deref()
                .is_some_and(|v| range.contains(&Version::parse(v)))
        };

        // A non-conforming version is reported on its own.
        let missing_symbols = if version_conforms {
            symbols
                .iter()
                .filter(|symbol| !self.resolves(module.as_ref(), symbol))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "{} is available in version {:?} (conforms: {})",
            module_name,
            version,
            version_conforms
        );

        ProbeResult {
            available: true,
            version_conforms,
            version,
            missing_symbols,
        }
    }

    fn load(&self, name: &str) -> Result<Box<dyn ModuleHandle + 'a>, ProbeError> {
        contained(
            || self.env.try_load(name),
            |reason| ProbeError::LoadFailed {
                name: name.to_string(),
                reason,
            },
        )
    }

    fn resolves(&self, module: &dyn ModuleHandle, symbol: &str) -> bool {
        let result = contained(
            || module.try_resolve_symbol(symbol),
            |_| ProbeError::SymbolNotFound {
                module: module.name().to_string(),
                symbol: symbol.to_string(),
            },
        );
        if let Err(e) = &result {
            tracing::debug!("{}", e);
        }
        result.is_ok()
    }
}
