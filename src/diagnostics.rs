//! The Failure Signal and its `miette` diagnostic.
//!
//! # Overview
//!
//! Every failing assertion produces exactly one [`AssertionFailed`]. It is the
//! only error a runner tallies as a failure rather than an error, and it is
//! carried through the [`Unwind::Failure`](crate::exception::Unwind) variant.
//!
//! Two classes of failure exist:
//!
//! - **Mismatch**: the check was well formed and the values did not satisfy it.
//! - **Usage**: an argument to the assertion was malformed (an operator that
//!   is not a comparison, a method name that is not a name). The underlying
//!   operation was never attempted.
//!
//! Both render through `miette` with a stable code, so reports can be
//! filtered by `sutra::assert::mismatch` / `sutra::assert::usage`.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Type-safe failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The checked values did not satisfy the assertion.
    Mismatch,
    /// An argument to the assertion was malformed.
    Usage,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Mismatch => "mismatch",
            FailureKind::Usage => "usage",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The Failure Signal. Carries the final, fully composed message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct AssertionFailed {
    message: String,
    kind: FailureKind,
    assertion: &'static str,
}

impl AssertionFailed {
    pub fn mismatch(assertion: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FailureKind::Mismatch,
            assertion,
        }
    }

    pub fn usage(assertion: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FailureKind::Usage,
            assertion,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Name of the assertion that failed, e.g. `assert_equal`.
    pub fn assertion(&self) -> &'static str {
        self.assertion
    }

    pub fn is_usage(&self) -> bool {
        self.kind == FailureKind::Usage
    }
}

impl Diagnostic for AssertionFailed {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.kind {
            FailureKind::Mismatch => "sutra::assert::mismatch",
            FailureKind::Usage => "sutra::assert::usage",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self.kind {
            FailureKind::Mismatch => None,
            FailureKind::Usage => Some(Box::new(format!(
                "the arguments given to `{}` are malformed; the check itself was not run",
                self.assertion
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn render(failure: AssertionFailed) -> String {
        let report = Report::new(failure);
        format!("{report:?}")
    }

    #[test]
    fn test_mismatch_renders_message_and_code() {
        let failure = AssertionFailed::mismatch("assert_nil", "<\"\"> expected to be nil.");
        assert!(failure.help().is_none());
        let output = render(failure);
        assert!(output.contains("sutra::assert::mismatch"));
        assert!(output.contains("expected to be nil."));
    }

    #[test]
    fn test_usage_carries_help() {
        let failure = AssertionFailed::usage("assert_compare", "bad operator");
        assert!(failure.is_usage());
        let output = render(failure);
        assert!(output.contains("sutra::assert::usage"));
        assert!(output.contains("assert_compare"));
    }

    #[test]
    fn test_display_is_the_bare_message() {
        let failure = AssertionFailed::mismatch("flunk", "Flunked.");
        assert_eq!(failure.to_string(), "Flunked.");
    }
}
