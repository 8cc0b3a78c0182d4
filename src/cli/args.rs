//! CLI argument definitions.
//!
//! The positional arguments mirror what embedding hosts already pass:
//! `MAJOR_VERSION [MIN_VERSION] [MAX_VERSION] [-m MODULE...]`.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// envcheck - Verify a runtime environment against a compatibility contract.
#[derive(Debug, Parser)]
#[command(name = "envcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Required major version of the runtime (e.g. 3)
    pub major_version: String,

    /// Minimum runtime version, inclusive unless --min-exclusive is given
    pub min_version: Option<String>,

    /// Maximum runtime version, exclusive unless --max-inclusive is given
    pub max_version: Option<String>,

    /// Additional modules that must be present (repeatable)
    #[arg(short = 'm', long = "modules", value_name = "MODULE", num_args = 0.., action = ArgAction::Append)]
    pub modules: Vec<String>,

    /// Treat the minimum runtime version as exclusive
    #[arg(long)]
    pub min_exclusive: bool,

    /// Treat the maximum runtime version as inclusive
    #[arg(long)]
    pub max_inclusive: bool,

    /// Policy file (YAML or JSON) replacing the built-in requirement list
    #[arg(short, long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Environment manifest (YAML or JSON) to check instead of an interpreter
    #[arg(short, long, value_name = "FILE")]
    pub environment: Option<PathBuf>,

    /// Interpreter to inspect, by name on PATH or by path
    #[arg(short, long, default_value = "python3", env = "ENVCHECK_INTERPRETER")]
    pub interpreter: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging (written to stderr)
    #[arg(long)]
    pub debug: bool,
}

/// How the verification result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Version line followed by the newline-joined report
    Text,
    /// A single JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_only() {
        let cli = Cli::parse_from(["envcheck", "3"]);
        assert_eq!(cli.major_version, "3");
        assert!(cli.min_version.is_none());
        assert!(cli.max_version.is_none());
        assert!(cli.modules.is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parses_version_bounds() {
        let cli = Cli::parse_from(["envcheck", "3", "3.6.0", "3.10.0"]);
        assert_eq!(cli.min_version.as_deref(), Some("3.6.0"));
        assert_eq!(cli.max_version.as_deref(), Some("3.10.0"));
        assert!(!cli.min_exclusive);
        assert!(!cli.max_inclusive);
    }

    #[test]
    fn module_flag_takes_several_values_and_repeats() {
        let cli = Cli::parse_from(["envcheck", "3", "-m", "scipy", "sklearn", "-m", "pyarrow"]);
        assert_eq!(cli.modules, vec!["scipy", "sklearn", "pyarrow"]);
    }

    #[test]
    fn module_flag_accepts_no_values() {
        let cli = Cli::parse_from(["envcheck", "3", "-m"]);
        assert!(cli.modules.is_empty());
    }

    #[test]
    fn missing_major_version_is_an_error() {
        assert!(Cli::try_parse_from(["envcheck"]).is_err());
    }

    #[test]
    fn parses_json_format() {
        let cli = Cli::parse_from(["envcheck", "3", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
