//! Truthiness, nil, boolean, membership, identity and pattern assertions.

use super::{ensure, mismatch, usage};
use crate::context::TestContext;
use crate::exception::{AssertResult, Unwind};
use crate::kind::{self, Classifies, Kind};
use crate::message::{self, Literal};
use crate::value::{Pattern, Value};

pub(super) fn assert_block<F>(ctx: &mut TestContext, head: Option<&str>, block: F) -> AssertResult
where
    F: FnOnce(&mut TestContext) -> AssertResult<bool>,
{
    ctx.wrap("assert_block", |ctx| {
        let passed = block(ctx)?;
        ensure(passed, "assert_block", || {
            head.unwrap_or("assert_block failed.").to_string()
        })
    })
}

pub(super) fn flunk(ctx: &mut TestContext, head: Option<&str>) -> AssertResult {
    ctx.wrap("flunk", |_| {
        Err(mismatch(
            "flunk",
            message::compose(Some(head.unwrap_or("Flunked")), ""),
        ))
    })
}

pub(super) fn assert(ctx: &mut TestContext, head: Option<&str>, value: Value) -> AssertResult {
    ctx.wrap("assert", |_| {
        ensure(value.is_truthy(), "assert", || {
            message::build(head, "<?> is not true.", &[&value])
        })
    })
}

pub(super) fn assert_nil(ctx: &mut TestContext, head: Option<&str>, value: Value) -> AssertResult {
    ctx.wrap("assert_nil", |_| {
        ensure(value.is_nil(), "assert_nil", || {
            message::build(head, "<?> expected to be nil.", &[&value])
        })
    })
}

pub(super) fn assert_not_nil(ctx: &mut TestContext, head: Option<&str>, value: Value) -> AssertResult {
    ctx.wrap("assert_not_nil", |_| {
        ensure(!value.is_nil(), "assert_not_nil", || {
            message::build(head, "<?> expected to not be nil.", &[&value])
        })
    })
}

pub(super) fn assert_boolean(ctx: &mut TestContext, head: Option<&str>, value: Value) -> AssertResult {
    ctx.wrap("assert_boolean", |_| {
        ensure(matches!(value, Value::Bool(_)), "assert_boolean", || {
            message::build(head, "<true> or <false> expected but was\n<?>", &[&value])
        })
    })
}

/// `assert_true` and `assert_false`.
pub(super) fn assert_literal(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: bool,
    value: Value,
) -> AssertResult {
    let name = if expected { "assert_true" } else { "assert_false" };
    ctx.wrap(name, |_| {
        let passed = matches!(value, Value::Bool(b) if b == expected);
        ensure(passed, name, || {
            let template = if expected {
                "<true> expected but was\n<?>"
            } else {
                "<false> expected but was\n<?>"
            };
            message::build(head, template, &[&value])
        })
    })
}

fn instance_of_text(kind: &Kind, value: &Value) -> String {
    message::fill(
        "<?> expected to be an instance of\n<?> but was\n<?>.",
        &[value, kind, &value.kind()],
    )
}

pub(super) fn assert_instance_of(
    ctx: &mut TestContext,
    head: Option<&str>,
    kind: &Kind,
    value: Value,
) -> AssertResult {
    ctx.wrap("assert_instance_of", |_| {
        ensure(&value.kind() == kind, "assert_instance_of", || {
            message::compose(head, &instance_of_text(kind, &value))
        })
    })
}

pub(super) fn assert_kind_of<K: Classifies>(
    ctx: &mut TestContext,
    head: Option<&str>,
    kind: &K,
    value: Value,
) -> AssertResult {
    ctx.wrap("assert_kind_of", |_| {
        ensure(kind.classifies(&value), "assert_kind_of", || {
            message::build(
                head,
                "<?>\nexpected to be kind_of\\?\n<?> but was\n<?>.",
                &[&value, kind, &value.kind()],
            )
        })
    })
}

fn identity_text(template: &str, expected: &Value, actual: &Value) -> String {
    message::fill(template, &[
        expected,
        &Literal::new(expected.object_id().to_string()),
        actual,
        &Literal::new(actual.object_id().to_string()),
    ])
}

pub(super) fn assert_same(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    actual: Value,
) -> AssertResult {
    ctx.wrap("assert_same", |_| {
        ensure(actual.is_same(&expected), "assert_same", || {
            message::compose(
                head,
                &identity_text(
                    "<?>\nwith id <?> expected to be equal\\? to\n<?>\nwith id <?>.",
                    &expected,
                    &actual,
                ),
            )
        })
    })
}

pub(super) fn assert_not_same(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    actual: Value,
) -> AssertResult {
    ctx.wrap("assert_not_same", |_| {
        ensure(!actual.is_same(&expected), "assert_not_same", || {
            message::compose(
                head,
                &identity_text(
                    "<?>\nwith id <?> expected to not be equal\\? to\n<?>\nwith id <?>.",
                    &expected,
                    &actual,
                ),
            )
        })
    })
}

/// `value =~ pattern`; values other than strings never match.
fn matches(pattern: &Pattern, value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| pattern.match_index(s).is_some())
}

pub(super) fn assert_match(
    ctx: &mut TestContext,
    head: Option<&str>,
    pattern: Value,
    value: Value,
) -> AssertResult {
    ctx.wrap("assert_match", |_| {
        let pattern = match pattern {
            Value::String(literal) => Value::Regex(
                Pattern::escaped(&literal)
                    .map_err(|e| Unwind::raise(kind::argument_error(), e.to_string()))?,
            ),
            other => other,
        };
        let passed = match &pattern {
            Value::Regex(p) => matches(p, &value),
            _ => false,
        };
        ensure(passed, "assert_match", || {
            message::build(head, "<?> expected to be =~\n<?>.", &[&value, &pattern])
        })
    })
}

pub(super) fn assert_no_match(
    ctx: &mut TestContext,
    head: Option<&str>,
    pattern: Value,
    value: Value,
) -> AssertResult {
    ctx.wrap("assert_no_match", |_| {
        let Value::Regex(p) = &pattern else {
            return Err(usage(
                "assert_no_match",
                message::compose(
                    Some("The first argument to assert_no_match should be a Regexp."),
                    &instance_of_text(&kind::regexp(), &pattern),
                ),
            ));
        };
        ensure(!matches(p, &value), "assert_no_match", || {
            message::build(head, "<?> expected to not match\n<?>.", &[&pattern, &value])
        })
    })
}

pub(super) fn assert_fail_assertion<T, F>(
    ctx: &mut TestContext,
    head: Option<&str>,
    block: F,
) -> AssertResult
where
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    ctx.wrap("assert_fail_assertion", |ctx| {
        let failed = match block(ctx) {
            Ok(_) => false,
            Err(Unwind::Failure(_)) => true,
            Err(other) => return Err(other),
        };
        ensure(failed, "assert_fail_assertion", || {
            message::build(head, "Failed assertion was expected.", &[])
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::assertions::Assertions;
    use crate::context::TestContext;
    use crate::kind;
    use crate::value::{Pattern, Value};

    fn failure_message(result: crate::exception::AssertResult) -> String {
        result.unwrap_err().as_failure().unwrap().message().to_string()
    }

    #[test]
    fn test_flunk_default_and_custom() {
        let mut ctx = TestContext::new();
        assert_eq!(failure_message(ctx.flunk()), "Flunked.");
        assert_eq!(failure_message(ctx.with_message("flunked").flunk()), "flunked.");
    }

    #[test]
    fn test_assert_block_uses_message_verbatim() {
        let mut ctx = TestContext::new();
        assert_eq!(
            failure_message(ctx.assert_block(|_| Ok(false))),
            "assert_block failed."
        );
        assert_eq!(
            failure_message(ctx.with_message("failed").assert_block(|_| Ok(false))),
            "failed"
        );
        assert!(ctx.assert_block(|_| Ok(true)).is_ok());
    }

    #[test]
    fn test_truthiness() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert(0).is_ok());
        assert_eq!(failure_message(ctx.assert(false)), "<false> is not true.");
        assert_eq!(failure_message(ctx.assert(())), "<nil> is not true.");
    }

    #[test]
    fn test_instance_of_message() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert_instance_of(&kind::string(), "string").is_ok());
        assert_eq!(
            failure_message(ctx.assert_instance_of(&kind::hash(), "string")),
            "<\"string\"> expected to be an instance of\n<Hash> but was\n<String>."
        );
    }

    #[test]
    fn test_kind_of_accepts_categories() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert_kind_of(&kind::object(), "string").is_ok());
        assert!(ctx.assert_kind_of(&kind::comparable(), 1).is_ok());
        assert_eq!(
            failure_message(ctx.assert_kind_of(&kind::regexp(), "string")),
            "<\"string\">\nexpected to be kind_of?\n<Regexp> but was\n<String>."
        );
    }

    #[test]
    fn test_match_escapes_string_patterns() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert_match("a.b", "xa.by").is_ok());
        assert_eq!(
            failure_message(ctx.assert_match("a.b", "axb")),
            "<\"axb\"> expected to be =~\n</a\\.b/>."
        );
    }

    #[test]
    fn test_no_match_requires_regexp() {
        let mut ctx = TestContext::new();
        let err = ctx.with_message("message").assert_no_match("asdf", "asdf").unwrap_err();
        let failure = err.as_failure().unwrap();
        assert!(failure.is_usage());
        assert_eq!(
            failure.message(),
            "The first argument to assert_no_match should be a Regexp.\n\
             <\"asdf\"> expected to be an instance of\n<Regexp> but was\n<String>."
        );
        let p = Pattern::new("string").unwrap();
        assert_eq!(
            failure_message(ctx.assert_no_match(p, "string")),
            "</string/> expected to not match\n<\"string\">."
        );
    }

    #[test]
    fn test_same_reports_ids() {
        let mut ctx = TestContext::new();
        let thing = Value::from("thing");
        assert!(ctx.assert_same(&thing, &thing).is_ok());
        let other = Value::from("thing");
        let msg = failure_message(ctx.assert_same(&thing, &other));
        assert_eq!(
            msg,
            format!(
                "<\"thing\">\nwith id <{}> expected to be equal? to\n<\"thing\">\nwith id <{}>.",
                thing.object_id(),
                other.object_id()
            )
        );
    }

    #[test]
    fn test_fail_assertion_lets_errors_through() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert_fail_assertion(|ctx| ctx.flunk()).is_ok());
        assert_eq!(
            failure_message(ctx.assert_fail_assertion(|_| Ok(()))),
            "Failed assertion was expected."
        );
        let err = ctx
            .assert_fail_assertion(|_| -> crate::exception::AssertResult {
                Err(crate::exception::Exception::runtime("boom").into())
            })
            .unwrap_err();
        assert!(err.as_exception().is_some());
    }
}
