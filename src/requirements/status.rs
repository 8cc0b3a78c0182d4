//! Probe outcome types.
//!
//! Each probe of a [`Requirement`](super::Requirement) produces a
//! `ProbeResult` describing whether the module is available, whether its
//! version conforms, and which declared symbols could not be resolved.

/// The outcome of probing one requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// The module could be loaded.
    pub available: bool,

    /// Available, and either no bound was declared or the discovered
    /// version satisfies the range.
    pub version_conforms: bool,

    /// The module's version marker, `None` when it exposes none.
    pub version: Option<String>,

    /// Declared symbols that could not be resolved, in declaration order.
    /// Only resolved when the version conforms.
    pub missing_symbols: Vec<String>,
}

impl ProbeResult {
    /// The module could not be loaded.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Whether nothing is wrong with the requirement.
    pub fn is_satisfied(&self) -> bool {
        self.available && self.version_conforms && self.missing_symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_not_satisfied() {
        let result = ProbeResult::unavailable();
        assert!(!result.available);
        assert!(!result.version_conforms);
        assert!(result.version.is_none());
        assert!(!result.is_satisfied());
    }

    #[test]
    fn conforming_without_missing_symbols_is_satisfied() {
        let result = ProbeResult {
            available: true,
            version_conforms: true,
            version: Some("1.21.0".to_string()),
            missing_symbols: vec![],
        };
        assert!(result.is_satisfied());
    }

    #[test]
    fn missing_symbol_is_not_satisfied() {
        let result = ProbeResult {
            available: true,
            version_conforms: true,
            version: None,
            missing_symbols: vec!["DataFrame".to_string()],
        };
        assert!(!result.is_satisfied());
    }

    #[test]
    fn wrong_version_is_not_satisfied() {
        let result = ProbeResult {
            available: true,
            version_conforms: false,
            version: Some("0.19.0".to_string()),
            missing_symbols: vec![],
        };
        assert!(!result.is_satisfied());
    }
}
