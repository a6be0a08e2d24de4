//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing failure messages and generating
//! JSON, so every command renders results the same way.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::ColorMode;
use crate::diff::SegmentTag;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Resolves `auto` against whether stdout is a terminal.
pub fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Auto if !atty::is(atty::Stream::Stdout) => ColorChoice::Never,
        other => other.into(),
    }
}

/// Prints a failure message to stdout, colouring its diff sections.
pub fn print_message(message: &str, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_message(&mut stdout, message)
}

/// Writes `message`; lines after a `diff:` or `folded diff:` header are
/// coloured by their prefix.
pub fn write_message<W: WriteColor>(out: &mut W, message: &str) -> io::Result<()> {
    let mut in_diff = false;
    for line in message.lines() {
        if line == "diff:" || line == "folded diff:" {
            in_diff = true;
            out.set_color(ColorSpec::new().set_bold(true))?;
        } else if line.is_empty() {
            in_diff = false;
        } else if in_diff {
            if let Some(spec) = line_tag(line).and_then(segment_color) {
                out.set_color(&spec)?;
            }
        }
        writeln!(out, "{line}")?;
        out.reset()?;
    }
    Ok(())
}

/// Pretty-prints `value` as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn line_tag(line: &str) -> Option<SegmentTag> {
    [
        SegmentTag::Unchanged,
        SegmentTag::Added,
        SegmentTag::Removed,
        SegmentTag::Changed,
    ]
    .into_iter()
    .find(|tag| line.starts_with(tag.prefix()))
}

fn segment_color(tag: SegmentTag) -> Option<ColorSpec> {
    let color = match tag {
        SegmentTag::Unchanged => return None,
        SegmentTag::Added => Color::Green,
        SegmentTag::Removed => Color::Red,
        SegmentTag::Changed => Color::Cyan,
    };
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    Some(spec)
}
