//! Exceptions raised by code under test, and the [`Unwind`] channel every
//! block and assertion returns through.

use std::fmt;
use std::panic::Location;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::diagnostics::AssertionFailed;
use crate::kind::{self, Category, Kind};
use crate::tag::Label;
use crate::value::{Inspect, Value};

/// Result of a block under test or of an assertion.
pub type AssertResult<T = ()> = Result<T, Unwind>;

/// An exception raised by code under test.
#[derive(Debug, Clone)]
pub struct Exception {
    kind: Kind,
    message: String,
    backtrace: Vec<String>,
    categories: Vec<Category>,
}

impl Exception {
    /// Creates an exception whose backtrace starts at the caller.
    #[track_caller]
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        let caller = Location::caller();
        Self {
            kind,
            message: message.into(),
            backtrace: vec![format!(
                "{}:{}:{}",
                caller.file(),
                caller.line(),
                caller.column()
            )],
            categories: Vec::new(),
        }
    }

    /// Shorthand for a `RuntimeError`.
    #[track_caller]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(kind::runtime_error(), message)
    }

    /// Replaces the captured backtrace.
    pub fn with_backtrace(mut self, frames: Vec<String>) -> Self {
        self.backtrace = frames;
        self
    }

    /// Marks this one exception as belonging to `category`, independent of
    /// its kind.
    pub fn extend(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> &[String] {
        &self.backtrace
    }

    /// Exact kind match.
    pub fn instance_of(&self, kind: &Kind) -> bool {
        &self.kind == kind
    }

    /// Kind match anywhere up the hierarchy.
    pub fn is_a(&self, kind: &Kind) -> bool {
        self.kind.is_a(kind)
    }

    /// Category membership through the kind or through [`Exception::extend`].
    pub fn belongs_to(&self, category: &Category) -> bool {
        self.categories.contains(category) || self.kind.includes(category)
    }

    /// The `Class:/Message:/---Backtrace---` block used in failure messages.
    pub(crate) fn describe(&self) -> String {
        format!(
            "Class: <{}>\nMessage: <{}>\n---Backtrace---\n{}\n---------------",
            self.kind.inspect(),
            self.message.inspect(),
            self.backtrace.join("\n")
        )
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for Exception {}

impl Serialize for Exception {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Exception", 3)?;
        state.serialize_field("kind", self.kind.name())?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("backtrace", &self.backtrace)?;
        state.end()
    }
}

/// A label-tagged early exit carrying a payload.
#[derive(Debug, Clone)]
pub struct Thrown {
    pub label: Label,
    pub value: Value,
}

impl Thrown {
    /// The exception a runner reports for a throw that escaped every
    /// catcher.
    #[track_caller]
    pub fn into_exception(self) -> Exception {
        Exception::new(
            kind::uncaught_throw_error(),
            format!("uncaught throw {}", self.label.inspect()),
        )
    }
}

/// Everything that can cut a block short.
///
/// `Failure` is the distinguished failure signal: runners tally it as a
/// failed assertion. `Raise` is an ordinary error from code under test and is
/// reported as an error. `Throw` is a bounded non-local exit that unwinds to
/// the nearest catcher for its label.
#[derive(Debug, Clone, Error)]
pub enum Unwind {
    #[error(transparent)]
    Failure(#[from] AssertionFailed),
    #[error(transparent)]
    Raise(#[from] Exception),
    #[error("uncaught throw {}", .0.label.inspect())]
    Throw(Thrown),
}

impl Unwind {
    /// Raises a new exception of `kind` from the caller's location.
    #[track_caller]
    pub fn raise(kind: Kind, message: impl Into<String>) -> Self {
        Unwind::Raise(Exception::new(kind, message))
    }

    /// Throws `label` carrying `value`.
    pub fn throw(label: impl Into<Label>, value: impl Into<Value>) -> Self {
        Unwind::Throw(Thrown {
            label: label.into(),
            value: value.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Unwind::Failure(_))
    }

    pub fn as_failure(&self) -> Option<&AssertionFailed> {
        match self {
            Unwind::Failure(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<&Exception> {
        match self {
            Unwind::Raise(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtrace_points_at_caller() {
        let e = Exception::runtime("Error");
        assert_eq!(e.backtrace().len(), 1);
        assert!(e.backtrace()[0].contains("exception.rs"));
    }

    #[test]
    fn test_extend_adds_category_membership() {
        let math = Category::new("Math");
        let e = Exception::new(kind::exception(), "Error").extend(math.clone());
        assert!(e.belongs_to(&math));
        assert!(!e.belongs_to(&kind::comparable()));
    }

    #[test]
    fn test_describe_block() {
        let e = Exception::runtime("Error").with_backtrace(vec!["a.rs:1:1".into()]);
        assert_eq!(
            e.describe(),
            "Class: <RuntimeError>\nMessage: <\"Error\">\n---Backtrace---\na.rs:1:1\n---------------"
        );
    }

    #[test]
    fn test_uncaught_throw_becomes_exception() {
        let thrown = Thrown {
            label: Value::sym("done").into(),
            value: Value::Nil,
        };
        let e = thrown.into_exception();
        assert_eq!(e.kind().name(), "UncaughtThrowError");
        assert_eq!(e.message(), "uncaught throw :done");
    }
}
