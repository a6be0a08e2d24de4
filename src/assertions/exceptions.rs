//! Assertions about exceptions raised by a block.
//!
//! The block runs inside a boundary that only looks at [`Unwind::Raise`].
//! Failures of nested assertions and throws always pass through, and so does
//! any raised exception the assertion does not claim.

use super::{ensure, mismatch, usage};
use crate::context::TestContext;
use crate::diff;
use crate::exception::{AssertResult, Exception, Unwind};
use crate::message::{self, Literal};
use crate::rescue::{Descriptors, Rescues};
use crate::value::Value;

/// Rejects descriptor lists that cannot describe an exception.
fn check_descriptors(assertion: &'static str, expected: &Descriptors, allow_empty: bool) -> AssertResult {
    if expected.is_empty() && !allow_empty {
        return Err(usage(
            assertion,
            message::compose(
                Some("Should expect at least one class of exception"),
                &message::fill("<?> is not true.", &[&Value::Bool(false)]),
            ),
        ));
    }
    match expected.usage_error() {
        Some(text) => Err(usage(assertion, text)),
        None => Ok(()),
    }
}

/// Runs `block`, returning the exception it raised, if any.
fn raised_by<T, F>(ctx: &mut TestContext, block: F) -> AssertResult<Option<Exception>>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    match block(ctx) {
        Ok(_) => Ok(None),
        Err(Unwind::Raise(exception)) => Ok(Some(exception)),
        Err(other) => Err(other),
    }
}

fn expect_raise<T, F>(
    ctx: &mut TestContext,
    assertion: &'static str,
    head: Option<&str>,
    expected: Descriptors,
    mismatch_template: &str,
    block: F,
) -> AssertResult<Exception>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap(assertion, |ctx| {
        check_descriptors(assertion, &expected, false)?;
        let Some(exception) = raised_by(ctx, block)? else {
            return Err(mismatch(
                assertion,
                message::build(head, "<?> exception expected but none was thrown.", &[&expected]),
            ));
        };
        if expected.rescues(&exception) {
            return Ok(exception);
        }
        Err(mismatch(
            assertion,
            message::build(head, mismatch_template, &[
                &expected,
                &Literal(exception.describe()),
            ]),
        ))
    })
}

pub(super) fn assert_raise<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Descriptors,
    block: F,
) -> AssertResult<Exception>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    expect_raise(
        ctx,
        "assert_raise",
        head,
        expected,
        "<?> exception expected but was\n?",
        block,
    )
}

pub(super) fn assert_raise_kind_of<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Descriptors,
    block: F,
) -> AssertResult<Exception>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    expect_raise(
        ctx,
        "assert_raise_kind_of",
        head,
        expected,
        "<?> family exception expected but was\n?",
        block,
    )
}

pub(super) fn assert_raise_message<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    block: F,
) -> AssertResult<Exception>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap("assert_raise_message", |ctx| {
        if !matches!(expected, Value::String(_) | Value::Regex(_)) {
            return Err(usage(
                "assert_raise_message",
                message::fill(
                    "<?>\ngiven as the expected message for #assert_raise_message must be a String or a Regexp.",
                    &[&expected],
                ),
            ));
        }
        let Some(exception) = raised_by(ctx, block)? else {
            return Err(mismatch(
                "assert_raise_message",
                message::build(
                    head,
                    "<?> exception message expected but none was thrown.",
                    &[&expected],
                ),
            ));
        };
        let actual = Value::from(exception.message());
        let passed = match &expected {
            Value::Regex(pattern) => pattern.regex().is_match(exception.message()),
            other => other == &actual,
        };
        ensure(passed, "assert_raise_message", || {
            let section = diff::equality_section(&expected, &actual, &ctx.config().diff);
            message::build(head, "<?> exception message expected but was\n<?>.?", &[
                &expected,
                &actual,
                &Literal(section),
            ])
        })?;
        Ok(exception)
    })
}

/// With no descriptors every raised exception fails the assertion;
/// otherwise only matching ones do and the rest propagate.
pub(super) fn assert_nothing_raised<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    unexpected: Descriptors,
    block: F,
) -> AssertResult<T>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap("assert_nothing_raised", |ctx| {
        check_descriptors("assert_nothing_raised", &unexpected, true)?;
        match block(ctx) {
            Err(Unwind::Raise(exception))
                if unexpected.is_empty() || unexpected.rescues(&exception) =>
            {
                Err(mismatch(
                    "assert_nothing_raised",
                    message::build(head, "Exception raised:\n?", &[&Literal(exception.describe())]),
                ))
            }
            other => other,
        }
    })
}
