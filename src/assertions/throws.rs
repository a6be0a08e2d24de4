//! Throw/catch assertions.
//!
//! A throw is uncaught when no enclosing boundary registered its label. Throws
//! that do have a catcher further out are never claimed here.

use super::mismatch;
use crate::context::TestContext;
use crate::exception::{AssertResult, Thrown, Unwind};
use crate::message;
use crate::tag::Label;
use crate::value::Value;

fn thrown_unexpectedly(assertion: &'static str, head: Option<&str>, thrown: &Thrown) -> Unwind {
    mismatch(
        assertion,
        message::build(head, "<?> was thrown when nothing was expected.", &[&thrown.label]),
    )
}

pub(super) fn assert_throws<F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    label: Label,
    block: F,
) -> AssertResult<Value>
where
    F: FnOnce(&mut TestContext) -> AssertResult<Value>,
{
    ctx.wrap("assert_throws", |ctx| match ctx.with_catcher(&label, block) {
        Ok(_) => Err(mismatch(
            "assert_throws",
            message::build(head, "<?> should have been thrown.", &[&label]),
        )),
        Err(Unwind::Throw(thrown)) if thrown.label == label => Ok(thrown.value),
        Err(Unwind::Throw(thrown)) if !ctx.has_catcher(&thrown.label) => Err(mismatch(
            "assert_throws",
            message::build(head, "<?> expected to be thrown but\n<?> was thrown.", &[
                &label,
                &thrown.label,
            ]),
        )),
        Err(other) => Err(other),
    })
}

pub(super) fn assert_nothing_thrown<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    block: F,
) -> AssertResult<T>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap("assert_nothing_thrown", |ctx| match block(ctx) {
        Err(Unwind::Throw(thrown)) if !ctx.has_catcher(&thrown.label) => {
            Err(thrown_unexpectedly("assert_nothing_thrown", head, &thrown))
        }
        other => other,
    })
}

pub(super) fn assert_not_thrown<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    label: Label,
    block: F,
) -> AssertResult<T>
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap("assert_not_thrown", |ctx| match ctx.with_catcher(&label, block) {
        Err(Unwind::Throw(thrown)) if thrown.label == label => {
            Err(thrown_unexpectedly("assert_not_thrown", head, &thrown))
        }
        other => other,
    })
}
