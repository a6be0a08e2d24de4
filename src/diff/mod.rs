//! Equality differ: the `diff:` and `folded diff:` sections of an equality
//! failure.
//!
//! The readable diff aligns lines, pairs similar lines of a replaced block
//! and marks the differing columns of each pair on a `?` line. Long
//! single-line values additionally get a folded rendering: both sides are
//! wrapped at a fixed width and diffed again so the markers land inside a
//! screen-wide segment.

use std::fmt;

use serde::Serialize;

use crate::config::DiffConfig;
use crate::value::{Inspect, Value};

mod matcher;
mod readable;

pub use matcher::{Match, Opcode, SequenceMatcher, Tag};

use readable::ReadableDiffer;

// ============================================================================
// SEGMENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentTag {
    /// Present on both sides.
    Unchanged,
    /// Only in the actual value.
    Added,
    /// Only in the expected value.
    Removed,
    /// Marker line placing `^`, `-` and `+` under the changed columns of the
    /// line above it.
    Changed,
}

impl SegmentTag {
    pub fn prefix(&self) -> &'static str {
        match self {
            SegmentTag::Unchanged => "  ",
            SegmentTag::Added => "+ ",
            SegmentTag::Removed => "- ",
            SegmentTag::Changed => "? ",
        }
    }
}

/// One rendered line of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub tag: SegmentTag,
    pub text: String,
}

impl Segment {
    pub fn new(tag: SegmentTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    fn is_change(&self) -> bool {
        matches!(self.tag, SegmentTag::Added | SegmentTag::Removed)
    }

    /// Rendered width in characters, prefix included.
    fn width(&self) -> usize {
        self.tag.prefix().len() + self.text.chars().count()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag.prefix(), self.text)
    }
}

/// A complete readable diff. Renders as its segments joined by newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diff {
    segments: Vec<Segment>,
}

impl Diff {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A diff is worth showing if something was added or removed, and it
    /// either carries context (unchanged or marker lines) or spans at least
    /// `min_lines` lines. A lone `-`/`+` pair says nothing the summary line
    /// doesn't.
    pub fn is_informative(&self, config: &DiffConfig) -> bool {
        let has_change = self.segments.iter().any(Segment::is_change);
        let has_context = self
            .segments
            .iter()
            .any(|s| matches!(s.tag, SegmentTag::Unchanged | SegmentTag::Changed));
        has_change && (has_context || self.segments.len() >= config.min_lines)
    }

    /// True if an added or removed line is too wide to scan.
    pub fn needs_fold(&self, config: &DiffConfig) -> bool {
        self.segments
            .iter()
            .any(|s| s.is_change() && s.width() >= config.fold_threshold)
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Readable line diff of `from` against `to`.
pub fn readable(from: &str, to: &str, config: &DiffConfig) -> Diff {
    let from_lines = split_lines(from);
    let to_lines = split_lines(to);
    Diff {
        segments: ReadableDiffer::new(&from_lines, &to_lines, config.match_cutoff).diff(),
    }
}

/// Readable diff of both sides wrapped at `config.fold_width` characters.
pub fn folded_readable(from: &str, to: &str, config: &DiffConfig) -> Diff {
    let from = fold(from, config.fold_width);
    let to = fold(to, config.fold_width);
    readable(&from, &to, config)
}

/// The text diffed for an equality failure: the raw strings when both
/// values are strings, otherwise both inspected forms.
pub fn diff_inputs(expected: &Value, actual: &Value) -> (String, String) {
    match (expected, actual) {
        (Value::String(e), Value::String(a)) => (e.to_string(), a.to_string()),
        _ => (expected.inspect(), actual.inspect()),
    }
}

/// The suffix appended to an equality failure message: empty, or
/// `\n\ndiff:\n...` optionally followed by `\n\nfolded diff:\n...`.
pub fn equality_section(expected: &Value, actual: &Value, config: &DiffConfig) -> String {
    let (from, to) = diff_inputs(expected, actual);
    let diff = readable(&from, &to, config);
    if !diff.is_informative(config) {
        return String::new();
    }
    let mut section = format!("\n\ndiff:\n{diff}");
    if diff.needs_fold(config) {
        let folded = folded_readable(&from, &to, config);
        section.push_str(&format!("\n\nfolded diff:\n{folded}"));
    }
    section
}

/// Splits on `\n` or `\r\n`, dropping trailing empty lines.
fn split_lines(text: &str) -> Vec<&str> {
    let pieces: Vec<&str> = text.split('\n').collect();
    let last = pieces.len() - 1;
    let mut lines: Vec<&str> = pieces
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i < last {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Breaks every line after each full run of `width` characters.
fn fold(text: &str, width: usize) -> String {
    let lines: Vec<String> = split_lines(text)
        .into_iter()
        .map(|line| {
            let mut out = String::with_capacity(line.len() + line.len() / width.max(1));
            for (i, c) in line.chars().enumerate() {
                out.push(c);
                if width > 0 && (i + 1) % width == 0 {
                    out.push('\n');
                }
            }
            out
        })
        .collect();
    lines.join("\n")
}
