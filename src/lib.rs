//! Assertion evaluation and diagnostic messages for the Sutra test tooling.
//!
//! A test body receives a [`TestContext`] and calls assertions on it through
//! the [`Assertions`] trait. Each call is counted once; a failing call
//! returns [`Unwind::Failure`] carrying the composed message.

pub use crate::assertions::{Assertions, WithMessage};
pub use crate::config::{AssertConfig, ConfigError, DiffConfig};
pub use crate::context::{Intercepted, TestContext, TestOutcome, TestReport};
pub use crate::diagnostics::{AssertionFailed, FailureKind};
pub use crate::exception::{AssertResult, Exception, Thrown, Unwind};
pub use crate::value::{Inspect, Value};

pub mod assertions;
pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod diff;
pub mod exception;
pub mod kind;
pub mod message;
pub mod rescue;
pub mod tag;
pub mod value;

/// Everything a test body usually needs.
pub mod prelude {
    pub use crate::assertions::Assertions;
    pub use crate::context::TestContext;
    pub use crate::descriptors;
    pub use crate::exception::{AssertResult, Exception, Unwind};
    pub use crate::kind::{self, Category, Kind};
    pub use crate::rescue::{Descriptor, Descriptors};
    pub use crate::tag::Label;
    pub use crate::value::{Inspect, Object, Pattern, Symbol, Value};
}
