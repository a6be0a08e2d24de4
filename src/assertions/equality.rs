use super::ensure;
use crate::context::TestContext;
use crate::diff;
use crate::exception::AssertResult;
use crate::message::{self, Literal};
use crate::value::Value;

/// `expected == actual`. The diff is computed only once the comparison has
/// failed.
pub(super) fn assert_equal(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    actual: Value,
) -> AssertResult {
    ctx.wrap("assert_equal", |ctx| {
        let passed = expected.equals(&actual)?;
        ensure(passed, "assert_equal", || {
            let section = diff::equality_section(&expected, &actual, &ctx.config().diff);
            message::build(head, "<?> expected but was\n<?>.?", &[
                &expected,
                &actual,
                &Literal(section),
            ])
        })
    })
}

pub(super) fn assert_not_equal(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    actual: Value,
) -> AssertResult {
    ctx.wrap("assert_not_equal", |_| {
        let equal = expected.equals(&actual)?;
        ensure(!equal, "assert_not_equal", || {
            message::build(head, "<?> expected to be != to\n<?>.", &[&expected, &actual])
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::assertions::Assertions;
    use crate::config::{AssertConfig, DiffConfig};
    use crate::context::TestContext;
    use crate::exception::{Exception, Unwind};
    use crate::kind;
    use crate::value::{Object, Value};

    fn failure_message(result: crate::exception::AssertResult) -> String {
        result.unwrap_err().as_failure().unwrap().message().to_string()
    }

    #[test]
    fn test_string_diff_marks_last_character() {
        let mut ctx = TestContext::new();
        assert_eq!(
            failure_message(ctx.assert_equal("string1", "string2")),
            "<\"string1\"> expected but was\n<\"string2\">.\n\n\
             diff:\n- string1\n?       ^\n+ string2\n?       ^"
        );
    }

    #[test]
    fn test_uninformative_diff_is_omitted() {
        let mut ctx = TestContext::new();
        assert_eq!(
            failure_message(ctx.assert_equal(1, 2)),
            "<1> expected but was\n<2>."
        );
        assert_eq!(
            failure_message(ctx.with_message("failed assert_equal").assert_equal("string1", "string2")),
            "failed assert_equal.\n<\"string1\"> expected but was\n<\"string2\">.\n\n\
             diff:\n- string1\n?       ^\n+ string2\n?       ^"
        );
    }

    #[test]
    fn test_numeric_cross_kind_equality_passes() {
        let mut ctx = TestContext::new();
        assert!(ctx.assert_equal(1, 1.0).is_ok());
        assert!(ctx.assert_equal(Value::list([1, 2]), Value::list([1, 2])).is_ok());
        assert!(ctx.assert_not_equal("string1", "string2").is_ok());
        assert_eq!(
            failure_message(ctx.assert_not_equal("string", "string")),
            "<\"string\"> expected to be != to\n<\"string\">."
        );
    }

    #[test]
    fn test_raising_equality_propagates() {
        let raising = Object::build(kind::object())
            .method("==", |_, _| Err(Unwind::Raise(Exception::runtime("no compare"))))
            .finish();
        let mut ctx = TestContext::new();
        let err = ctx.assert_equal(raising, 1).unwrap_err();
        assert_eq!(err.as_exception().unwrap().message(), "no compare");
        assert_eq!(ctx.assertion_count(), 1);
    }

    #[test]
    fn test_config_controls_diff_threshold() {
        let config = AssertConfig {
            diff: DiffConfig {
                min_lines: 2,
                ..DiffConfig::default()
            },
        };
        let mut ctx = TestContext::with_config(config);
        assert_eq!(
            failure_message(ctx.assert_equal(1, 2)),
            "<1> expected but was\n<2>.\n\ndiff:\n- 1\n+ 2"
        );
    }
}
