//! Loose version values and version ranges.
//!
//! Version strings found in the wild are irregular (`1.21.0`, `0.19.0rc1`,
//! `2.0.0-dev`, `3.11.0+local`). [`Version`] never fails to parse: the string
//! is split into runs of digits, runs of lowercase letters and anything else,
//! with `.` acting purely as a separator. Digit runs of any length compare
//! numerically, everything else compares lexically.
//!
//! # Example
//!
//! ```
//! use envcheck::requirements::{Version, VersionRange};
//! use std::cmp::Ordering;
//!
//! let range = VersionRange::any()
//!     .with_min(Version::parse("3.6.0"), true)
//!     .with_max(Version::parse("3.10.0"), false);
//!
//! assert_eq!(range.compare(&Version::parse("3.9.5")), Ordering::Equal);
//! assert_eq!(range.compare(&Version::parse("3.10.0")), Ordering::Greater);
//! assert_eq!(
//!     range.describe(),
//!     "required minimum version is 3.6.0 (inclusive), required maximum version is 3.10.0 (exclusive)"
//! );
//! ```

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Tokens that split a version string. Text between matches is kept as-is.
static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+|[a-z]+|\.").unwrap());

/// One piece of a loose version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// A run of digits, without leading zeros. Any length.
    Number(String),
    /// Letters or punctuation. Never starts with a digit.
    Text(String),
}

impl Component {
    fn from_token(token: &str) -> Self {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            let digits = token.trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            return Component::Number(digits.to_string());
        }
        Component::Text(token.to_string())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(s) | Component::Text(s) => f.write_str(s),
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Without leading zeros a longer digit run is the larger number.
            (Component::Number(a), Component::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            // Text never starts with a digit, so comparing the string forms
            // places it below or above every number by its first character.
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A loosely parsed version.
///
/// Equality and ordering only look at the parsed components, so `3.9.05`
/// equals `3.9.5`. A version that is a strict prefix of another is smaller:
/// `1.0 < 1.0.0`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string. Never fails.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut components = Vec::new();
        let mut last = 0;

        for m in COMPONENT_PATTERN.find_iter(raw) {
            if m.start() > last {
                components.push(Component::Text(raw[last..m.start()].to_string()));
            }
            if m.as_str() != "." {
                components.push(Component::from_token(m.as_str()));
            }
            last = m.end();
        }
        if last < raw.len() {
            components.push(Component::Text(raw[last..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed components.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The leading component as a version of its own (`3.9.5` -> `3`).
    pub fn major(&self) -> Option<Version> {
        self.components.first().map(|c| Version {
            raw: c.to_string(),
            components: vec![c.clone()],
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}

/// One end of a [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl Bound {
    fn describe(&self, name: &str) -> String {
        let inclusion = if self.inclusive {
            "inclusive"
        } else {
            "exclusive"
        };
        format!(
            "required {} version is {} ({})",
            name, self.version, inclusion
        )
    }
}

/// An optional lower and an optional upper version bound.
///
/// A range whose minimum lies above its maximum matches nothing. That is
/// allowed and not treated as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<Bound>,
    max: Option<Bound>,
}

impl VersionRange {
    /// A range without bounds. Every version satisfies it.
    pub fn any() -> Self {
        Self::default()
    }

    /// A range with only an inclusive lower bound.
    pub fn at_least(min: impl Into<Version>) -> Self {
        Self::any().with_min(min.into(), true)
    }

    /// Set the lower bound.
    pub fn with_min(mut self, version: Version, inclusive: bool) -> Self {
        self.min = Some(Bound { version, inclusive });
        self
    }

    /// Set the upper bound.
    pub fn with_max(mut self, version: Version, inclusive: bool) -> Self {
        self.max = Some(Bound { version, inclusive });
        self
    }

    /// The lower bound, if declared.
    pub fn min(&self) -> Option<&Bound> {
        self.min.as_ref()
    }

    /// The upper bound, if declared.
    pub fn max(&self) -> Option<&Bound> {
        self.max.as_ref()
    }

    /// Whether neither bound is declared.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Three-way comparison of `candidate` against the range.
    ///
    /// `Less` if it falls below the lower bound, `Greater` if it falls above
    /// the upper bound, `Equal` if it satisfies the range.
    pub fn compare(&self, candidate: &Version) -> Ordering {
        if let Some(min) = &self.min {
            match candidate.cmp(&min.version) {
                Ordering::Less => return Ordering::Less,
                Ordering::Equal if !min.inclusive => return Ordering::Less,
                _ => {}
            }
        }
        if let Some(max) = &self.max {
            match candidate.cmp(&max.version) {
                Ordering::Greater => return Ordering::Greater,
                Ordering::Equal if !max.inclusive => return Ordering::Greater,
                _ => {}
            }
        }
        Ordering::Equal
    }

    /// Whether `candidate` satisfies the range.
    pub fn contains(&self, candidate: &Version) -> bool {
        self.compare(candidate) == Ordering::Equal
    }

    /// Human-readable clause for the declared bounds, empty if there are none.
    pub fn describe(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(min) = &self.min {
            clauses.push(min.describe("minimum"));
        }
        if let Some(max) = &self.max {
            clauses.push(max.describe("maximum"));
        }
        clauses.join(", ")
    }
}
