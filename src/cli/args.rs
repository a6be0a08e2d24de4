//! Defines the command-line arguments and subcommands for the sutra-assert CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::AssertConfig;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sutra-assert",
    version,
    about = "Renders assertion failure messages and diffs."
)]
pub struct AssertArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare two inputs the way `assert_equal` does and print the failure
    /// message. Exits with status 1 when they differ.
    Diff(DiffArgs),
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Path to the expected text (or the text itself with --literal).
    #[arg(required = true)]
    pub expected: String,

    /// Path to the actual text (or the text itself with --literal).
    #[arg(required = true)]
    pub actual: String,

    /// Treat EXPECTED and ACTUAL as the strings to compare, not file paths.
    #[arg(long)]
    pub literal: bool,

    /// YAML file with rendering settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Overrides `diff.fold_width`.
    #[arg(long)]
    pub fold_width: Option<usize>,

    /// Overrides `diff.fold_threshold`.
    #[arg(long)]
    pub fold_threshold: Option<usize>,
}

impl DiffArgs {
    /// Applies flag overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut AssertConfig) {
        if let Some(width) = self.fold_width {
            config.diff.fold_width = width;
        }
        if let Some(threshold) = self.fold_threshold {
            config.diff.fold_threshold = threshold;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}
