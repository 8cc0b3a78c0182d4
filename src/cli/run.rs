//! The verification command.
//!
//! Builds the policy and environment from the parsed [`Cli`], runs the
//! verification and writes the result. In text format the output is the
//! contract embedding hosts parse:
//!
//! ```text
//! Python version: 3.9.5
//! Library numpy is missing.
//! Library pandas is installed in version 0.19.0, required minimum version is 0.20.0 (inclusive).
//! ```
//!
//! The report part is an empty line when the environment is compatible.

use super::args::{Cli, OutputFormat};
use crate::environment::{Environment, InterpreterEnvironment, ManifestEnvironment};
use crate::error::Result;
use crate::policy::{
    default_policy, load_policy_file, verify, Policy, RuntimeRequirement, Verification,
    DEFAULT_RUNTIME_NAME,
};
use crate::requirements::{Version, VersionRange};
use anyhow::Context;
use std::io::Write;

/// The runtime contract given on the command line.
pub fn runtime_requirement(cli: &Cli) -> RuntimeRequirement {
    let mut range = VersionRange::any();
    if let Some(min) = &cli.min_version {
        range = range.with_min(Version::parse(min), !cli.min_exclusive);
    }
    if let Some(max) = &cli.max_version {
        range = range.with_max(Version::parse(max), cli.max_inclusive);
    }
    RuntimeRequirement::new(DEFAULT_RUNTIME_NAME, cli.major_version.as_str(), range)
}

/// The policy to run: a policy file or the built-in one, plus `-m` modules.
pub fn build_policy(cli: &Cli) -> Result<Policy> {
    let mut runtime = runtime_requirement(cli);

    let policy = match &cli.policy {
        Some(path) => {
            let file = load_policy_file(path)?;
            if let Some(name) = &file.runtime {
                runtime.name = name.clone();
            }
            Policy {
                runtime,
                requirements: file.to_requirements()?,
            }
        }
        None => default_policy(runtime),
    };

    Ok(policy.with_additional_modules(cli.modules.iter().cloned()))
}

/// The environment to inspect: a manifest if given, otherwise the interpreter.
pub fn open_environment(cli: &Cli) -> Result<Box<dyn Environment>> {
    match &cli.environment {
        Some(path) => Ok(Box::new(ManifestEnvironment::load(path)?)),
        None => Ok(Box::new(InterpreterEnvironment::locate(&cli.interpreter)?)),
    }
}

/// Render a verification in the requested format.
pub fn render(verification: &Verification, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "{} version: {}\n{}",
            verification.runtime,
            verification.runtime_version.as_deref().unwrap_or("unknown"),
            verification.render_report()
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(verification)
            .context("Failed to serialize verification result")?),
    }
}

/// Run the verification described by `cli`, writing the result to `out`.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<Verification> {
    let policy = build_policy(cli)?;
    let env = open_environment(cli)?;
    let verification = verify(env.as_ref(), &policy);

    writeln!(out, "{}", render(&verification, cli.format)?)?;
    out.flush()?;
    Ok(verification)
}
