//! The sutra-assert Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info};

use crate::assertions::Assertions;
use crate::cli::args::{AssertArgs, Command, DiffArgs};
use crate::config::AssertConfig;
use crate::context::TestContext;
use crate::diagnostics::AssertionFailed;
use crate::diff::{self, Diff};
use crate::exception::Unwind;

pub mod args;
pub mod output;

/// Exit status when the compared inputs differ.
const EXIT_DIFFERENT: u8 = 1;
/// Exit status for bad input or configuration.
const EXIT_ERROR: u8 = 2;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = AssertArgs::parse();
    setup_logging(&args.log_level);

    // Dispatch to the appropriate subcommand handler.
    let result = match &args.command {
        Command::Diff(diff) => handle_diff(diff),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_DIFFERENT),
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// JSON form of a `diff` run.
#[derive(Debug, Serialize)]
struct DiffReport<'a> {
    equal: bool,
    failure: Option<&'a AssertionFailed>,
    diff: Option<Diff>,
}

/// Handles the `diff` subcommand. Returns whether the inputs were equal.
fn handle_diff(args: &DiffArgs) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => AssertConfig::load(path)?,
        None => AssertConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let (expected, actual) = if args.literal {
        (args.expected.clone(), args.actual.clone())
    } else {
        (read_input(&args.expected)?, read_input(&args.actual)?)
    };
    debug!(
        expected_len = expected.len(),
        actual_len = actual.len(),
        "comparing inputs"
    );

    let mut ctx = TestContext::with_config(config);
    let failure = match ctx.assert_equal(expected.as_str(), actual.as_str()) {
        Ok(()) => None,
        Err(Unwind::Failure(failure)) => Some(failure),
        Err(other) => return Err(miette::miette!("comparison did not complete: {other}")),
    };
    info!(equal = failure.is_none(), "diff finished");

    if args.json {
        let diff = failure
            .as_ref()
            .and_then(|_| informative_diff(&expected, &actual, ctx.config()));
        let report = DiffReport {
            equal: failure.is_none(),
            failure: failure.as_ref(),
            diff,
        };
        output::print_json(&report).into_diagnostic()?;
    } else if let Some(failure) = &failure {
        output::print_message(failure.message(), output::color_choice(args.color))
            .into_diagnostic()?;
    }
    Ok(failure.is_none())
}

/// The readable diff, when the failure message would carry one.
fn informative_diff(expected: &str, actual: &str, config: &AssertConfig) -> Option<Diff> {
    let diff = diff::readable(expected, actual, &config.diff);
    diff.is_informative(&config.diff).then_some(diff)
}

fn read_input(path: &str) -> Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read input file {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(expected: &str, actual: &str) -> DiffArgs {
        DiffArgs {
            expected: expected.to_string(),
            actual: actual.to_string(),
            literal: true,
            config: None,
            color: args::ColorMode::Never,
            json: true,
            fold_width: None,
            fold_threshold: None,
        }
    }

    #[test]
    fn test_equal_inputs() {
        assert!(handle_diff(&literal("same", "same")).unwrap());
        assert!(!handle_diff(&literal("string1", "string2")).unwrap());
    }

    #[test]
    fn test_json_diff_only_when_the_message_has_one() {
        let config = AssertConfig::default();
        assert!(informative_diff("1", "2", &config).is_none());
        assert!(informative_diff("string1", "string2", &config).is_some());
        assert!(informative_diff("a\nb", "x", &config).is_some());
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        let mut args = literal("/nonexistent/expected.txt", "/nonexistent/actual.txt");
        args.literal = false;
        let report = handle_diff(&args).unwrap_err();
        assert!(format!("{report:?}").contains("failed to read input file"));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut args = literal("a", "b");
        args.fold_width = Some(0);
        assert!(handle_diff(&args).is_err());
    }
}
