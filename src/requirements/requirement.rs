//! Declared module requirements.

use super::version::{Version, VersionRange};

/// A module that must be present, optionally within a version range and
/// exposing certain symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: String,
    range: VersionRange,
    symbols: Vec<String>,
    runtime_major: Option<String>,
}

impl Requirement {
    /// A requirement on the module's presence only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: VersionRange::any(),
            symbols: Vec::new(),
            runtime_major: None,
        }
    }

    /// Constrain the module's version.
    pub fn with_range(mut self, range: VersionRange) -> Self {
        self.range = range;
        self
    }

    /// Require symbols inside the module. Duplicates are dropped, the first
    /// occurrence keeps its position.
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for symbol in symbols {
            let symbol = symbol.into();
            if !self.symbols.contains(&symbol) {
                self.symbols.push(symbol);
            }
        }
        self
    }

    /// Only check the requirement when the installed runtime has this major
    /// version.
    pub fn only_on_major(mut self, major: impl Into<String>) -> Self {
        self.runtime_major = Some(major.into());
        self
    }

    /// Whether the requirement is checked against a runtime whose major
    /// version is `installed_major`. Conditional requirements are skipped
    /// when the runtime could not be inspected.
    pub fn applies_to(&self, installed_major: Option<&Version>) -> bool {
        match &self.runtime_major {
            None => true,
            Some(major) => installed_major == Some(&Version::parse(major)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn runtime_major(&self) -> Option<&str> {
        self.runtime_major.as_deref()
    }
}
