//! The assertion surface.
//!
//! Every assertion is a provided method of [`Assertions`], implemented for
//! [`TestContext`] and for [`WithMessage`], which prefixes failures with a
//! user message:
//!
//! ```rust
//! use sutra_assert::prelude::*;
//!
//! let mut ctx = TestContext::new();
//! ctx.assert_equal(2, 1 + 1).unwrap();
//! let failure = ctx
//!     .with_message("message")
//!     .assert_in_delta(0.5, 0.4, -0.1)
//!     .unwrap_err();
//! assert_eq!(
//!     failure.as_failure().unwrap().message(),
//!     "message.\nThe delta should not be negative.\n<-0.1> expected to be\n>=\n<0.0>."
//! );
//! assert_eq!(ctx.assertion_count(), 2);
//! ```
//!
//! Each invocation counts once, before it evaluates anything. On failure it
//! returns [`Unwind::Failure`]; exceptions raised by code under test that the
//! assertion does not expect come back unchanged as [`Unwind::Raise`].

use crate::context::TestContext;
use crate::diagnostics::AssertionFailed;
use crate::exception::{AssertResult, Exception, Unwind};
use crate::kind::{Classifies, Kind};
use crate::rescue::Descriptors;
use crate::tag::Label;
use crate::value::Value;

mod basic;
mod dispatch;
mod equality;
mod exceptions;
mod numeric;
mod throws;

// ============================================================================
// FAILURE HELPERS
// ============================================================================

fn mismatch(assertion: &'static str, message: String) -> Unwind {
    Unwind::Failure(AssertionFailed::mismatch(assertion, message))
}

fn usage(assertion: &'static str, message: String) -> Unwind {
    Unwind::Failure(AssertionFailed::usage(assertion, message))
}

/// Passes if `passed`, otherwise fails with the lazily built message.
fn ensure(passed: bool, assertion: &'static str, message: impl FnOnce() -> String) -> AssertResult {
    if passed {
        Ok(())
    } else {
        Err(mismatch(assertion, message()))
    }
}

fn head<A: Assertions + ?Sized>(a: &A) -> Option<String> {
    a.user_message().map(str::to_owned)
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub trait Assertions {
    fn context(&mut self) -> &mut TestContext;

    /// Prefix for failure messages, if any.
    fn user_message(&self) -> Option<&str> {
        None
    }

    /// Passes if `block` returns true. Fails with the user message verbatim,
    /// or `assert_block failed.`
    fn assert_block<F>(&mut self, block: F) -> AssertResult
    where
        F: FnOnce(&mut TestContext) -> AssertResult<bool>,
    {
        let head = head(self);
        basic::assert_block(self.context(), head.as_deref(), block)
    }

    /// Always fails.
    fn flunk(&mut self) -> AssertResult {
        let head = head(self);
        basic::flunk(self.context(), head.as_deref())
    }

    /// Truthiness: anything but `nil` and `false`.
    fn assert(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert(self.context(), head.as_deref(), value.into())
    }

    fn assert_nil(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_nil(self.context(), head.as_deref(), value.into())
    }

    fn assert_not_nil(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_not_nil(self.context(), head.as_deref(), value.into())
    }

    fn assert_boolean(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_boolean(self.context(), head.as_deref(), value.into())
    }

    fn assert_true(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_literal(self.context(), head.as_deref(), true, value.into())
    }

    fn assert_false(&mut self, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_literal(self.context(), head.as_deref(), false, value.into())
    }

    /// Exact kind membership.
    fn assert_instance_of(&mut self, kind: &Kind, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_instance_of(self.context(), head.as_deref(), kind, value.into())
    }

    /// Membership in a kind's family or in a category.
    fn assert_kind_of<K: Classifies>(&mut self, kind: &K, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_kind_of(self.context(), head.as_deref(), kind, value.into())
    }

    /// Identity (`equal?`).
    fn assert_same(&mut self, expected: impl Into<Value>, actual: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_same(self.context(), head.as_deref(), expected.into(), actual.into())
    }

    fn assert_not_same(
        &mut self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        basic::assert_not_same(self.context(), head.as_deref(), expected.into(), actual.into())
    }

    /// Equality (`==`), with a diff of the two sides on failure.
    fn assert_equal(&mut self, expected: impl Into<Value>, actual: impl Into<Value>) -> AssertResult {
        let head = head(self);
        equality::assert_equal(self.context(), head.as_deref(), expected.into(), actual.into())
    }

    fn assert_not_equal(
        &mut self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        equality::assert_not_equal(self.context(), head.as_deref(), expected.into(), actual.into())
    }

    /// `value =~ pattern`. A string pattern matches literally.
    fn assert_match(&mut self, pattern: impl Into<Value>, value: impl Into<Value>) -> AssertResult {
        let head = head(self);
        basic::assert_match(self.context(), head.as_deref(), pattern.into(), value.into())
    }

    /// `value !~ pattern`. The pattern must be a regex.
    fn assert_no_match(
        &mut self,
        pattern: impl Into<Value>,
        value: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        basic::assert_no_match(self.context(), head.as_deref(), pattern.into(), value.into())
    }

    /// Passes only if `block` fails an assertion.
    fn assert_fail_assertion<T, F>(&mut self, block: F) -> AssertResult
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        basic::assert_fail_assertion(self.context(), head.as_deref(), block)
    }

    /// `|expected - actual| <= delta` over `to_f` of each argument.
    fn assert_in_delta(
        &mut self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
        delta: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        numeric::assert_in_delta(
            self.context(),
            head.as_deref(),
            expected.into(),
            actual.into(),
            delta.into(),
        )
    }

    fn assert_respond_to(&mut self, object: impl Into<Value>, method: impl Into<Value>) -> AssertResult {
        let head = head(self);
        dispatch::assert_respond_to(self.context(), head.as_deref(), object.into(), method.into())
    }

    /// Sends `operator` to `left` with `right` and checks the result.
    fn assert_operator(
        &mut self,
        left: impl Into<Value>,
        operator: impl Into<Value>,
        right: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        dispatch::assert_operator(
            self.context(),
            head.as_deref(),
            left.into(),
            operator.into(),
            right.into(),
        )
    }

    /// Like [`Assertions::assert_operator`] restricted to `<`, `<=`, `>`
    /// and `>=`, with a worded message.
    fn assert_compare(
        &mut self,
        left: impl Into<Value>,
        operator: impl Into<Value>,
        right: impl Into<Value>,
    ) -> AssertResult {
        let head = head(self);
        dispatch::assert_compare(
            self.context(),
            head.as_deref(),
            left.into(),
            operator.into(),
            right.into(),
        )
    }

    /// Sends `name` with `args` to `receiver`; passes on a truthy result and
    /// returns it.
    fn assert_send(
        &mut self,
        receiver: impl Into<Value>,
        name: impl Into<Value>,
        args: Vec<Value>,
    ) -> AssertResult<Value> {
        let head = head(self);
        dispatch::assert_send(self.context(), head.as_deref(), receiver.into(), name.into(), args)
    }

    /// Passes if `block` raises an exception of one of the listed kinds or
    /// their subclasses (or categories, or expected instances), and returns
    /// it.
    fn assert_raise<T, F>(&mut self, expected: impl Into<Descriptors>, block: F) -> AssertResult<Exception>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        exceptions::assert_raise(self.context(), head.as_deref(), expected.into(), block)
    }

    /// Same matching as [`Assertions::assert_raise`]; the failure message
    /// names the expected kinds as a family.
    fn assert_raise_kind_of<T, F>(
        &mut self,
        expected: impl Into<Descriptors>,
        block: F,
    ) -> AssertResult<Exception>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        exceptions::assert_raise_kind_of(self.context(), head.as_deref(), expected.into(), block)
    }

    /// Passes if `block` raises any exception whose message equals the
    /// expected string or matches the expected regex.
    fn assert_raise_message<T, F>(&mut self, expected: impl Into<Value>, block: F) -> AssertResult<Exception>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        exceptions::assert_raise_message(self.context(), head.as_deref(), expected.into(), block)
    }

    /// Fails if `block` raises any exception.
    fn assert_nothing_raised<T, F>(&mut self, block: F) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        exceptions::assert_nothing_raised(
            self.context(),
            head.as_deref(),
            Descriptors::default(),
            block,
        )
    }

    /// Fails if `block` raises an exception matching `unexpected`; other
    /// exceptions propagate unchanged.
    fn assert_nothing_raised_matching<T, F>(
        &mut self,
        unexpected: impl Into<Descriptors>,
        block: F,
    ) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        exceptions::assert_nothing_raised(self.context(), head.as_deref(), unexpected.into(), block)
    }

    /// Passes if `block` throws `label`, returning the thrown value.
    fn assert_throws<F>(&mut self, label: impl Into<Label>, block: F) -> AssertResult<Value>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<Value>,
    {
        let head = head(self);
        throws::assert_throws(self.context(), head.as_deref(), label.into(), block)
    }

    /// Fails if `block` throws a label nothing outside it catches.
    fn assert_nothing_thrown<T, F>(&mut self, block: F) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        throws::assert_nothing_thrown(self.context(), head.as_deref(), block)
    }

    /// Fails if `block` throws `label`; other throws pass through.
    fn assert_not_thrown<T, F>(&mut self, label: impl Into<Label>, block: F) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let head = head(self);
        throws::assert_not_thrown(self.context(), head.as_deref(), label.into(), block)
    }
}

impl Assertions for TestContext {
    fn context(&mut self) -> &mut TestContext {
        self
    }
}

/// A context borrowed together with a user message.
pub struct WithMessage<'a> {
    ctx: &'a mut TestContext,
    message: String,
}

impl Assertions for WithMessage<'_> {
    fn context(&mut self) -> &mut TestContext {
        self.ctx
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

impl TestContext {
    /// Prefixes the failure message of the next assertion with `message`.
    pub fn with_message(&mut self, message: impl Into<String>) -> WithMessage<'_> {
        WithMessage {
            ctx: self,
            message: message.into(),
        }
    }
}
