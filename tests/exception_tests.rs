//! Raise and throw assertions run through the interception harness, so each
//! case also checks that exactly one assertion was counted.

mod common;

use common::{check_fails, check_fails_matching, check_nothing_fails};
use sutra_assert::prelude::*;

const BACKTRACE: &str = "---Backtrace---\ntest.rs:1:1\n---------------";

fn raise(kind: Kind, message: &str) -> AssertResult {
    Err(Exception::new(kind, message)
        .with_backtrace(vec!["test.rs:1:1".into()])
        .into())
}

fn throw(label: &str) -> AssertResult<Value> {
    Err(Unwind::throw(Value::sym(label), ()))
}

#[test]
fn test_assert_raise_success() {
    let mut ctx = TestContext::new();
    let e = check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise(kind::runtime_error(), |_| raise(kind::runtime_error(), "Error"))
    });
    assert_eq!(e.message(), "Error");
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.with_message("successful assert_raise").assert_raise(
            descriptors![kind::argument_error(), kind::runtime_error()],
            |_| raise(kind::runtime_error(), "Error"),
        )
    });
}

#[test]
fn test_assert_raise_failures() {
    let mut ctx = TestContext::new();
    check_fails(
        &mut ctx,
        "<RuntimeError> exception expected but none was thrown.",
        |ctx| ctx.assert_raise(kind::runtime_error(), |_| Ok(1)),
    );
    check_fails(
        &mut ctx,
        "failed assert_raise.\n<ArgumentError> exception expected but none was thrown.",
        |ctx| {
            ctx.with_message("failed assert_raise")
                .assert_raise(kind::argument_error(), |_| Ok(()))
        },
    );
    check_fails(
        &mut ctx,
        &format!(
            "<ArgumentError> exception expected but was\nClass: <RuntimeError>\nMessage: <\"Error\">\n{BACKTRACE}"
        ),
        |ctx| ctx.assert_raise(kind::argument_error(), |_| raise(kind::runtime_error(), "Error")),
    );
}

#[test]
fn test_assert_raise_accepts_a_subclass_of_the_expected_kind() {
    let mut ctx = TestContext::new();
    let e = check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise(kind::standard_error(), |_| raise(kind::runtime_error(), "Error"))
    });
    assert_eq!(e.kind().name(), "RuntimeError");
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise(
            descriptors![kind::type_error(), kind::name_error()],
            |_| raise(kind::no_method_error(), "undefined method"),
        )
    });
    check_fails(
        &mut ctx,
        &format!(
            "<NoMethodError> exception expected but was\nClass: <NameError>\nMessage: <\"x\">\n{BACKTRACE}"
        ),
        |ctx| ctx.assert_raise(kind::no_method_error(), |_| raise(kind::name_error(), "x")),
    );
}

#[test]
fn test_catch_all_descriptor_is_a_usage_error() {
    let expected = "Should expect a narrower class of exception than Exception.\n<false> is not true.";
    let mut ctx = TestContext::new();
    let failures = [
        check_fails(&mut ctx, expected, |ctx| {
            ctx.assert_raise(kind::exception(), |_| raise(kind::zero_division_error(), "x"))
        }),
        check_fails(&mut ctx, expected, |ctx| {
            ctx.assert_raise_kind_of(kind::exception(), |_| raise(kind::zero_division_error(), "x"))
        }),
        check_fails(&mut ctx, expected, |ctx| {
            ctx.assert_nothing_raised_matching(
                descriptors![kind::argument_error(), kind::exception()],
                |_| raise(kind::type_error(), "x"),
            )
        }),
    ];
    assert!(failures.iter().all(|f| f.is_usage()));
}

#[test]
fn test_assert_raise_with_an_exception_instance() {
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise(Exception::runtime("XXX"), |_| raise(kind::runtime_error(), "XXX"))
    });
    check_fails_matching(
        &mut ctx,
        r#"\A<#<RuntimeError: XXX>> exception expected but was\nClass: <RuntimeError>\nMessage: <"Not XXX">"#,
        |ctx| ctx.assert_raise(Exception::runtime("XXX"), |_| raise(kind::runtime_error(), "Not XXX")),
    );
}

#[test]
fn test_assert_raise_module() {
    let math = Category::new("Math");
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise(math.clone(), |_| -> AssertResult {
            Err(Exception::runtime("Error").extend(math.clone()).into())
        })
    });
    check_fails_matching(&mut ctx, r"\A<Math> exception expected but was\n", |ctx| {
        ctx.assert_raise(math.clone(), |_| raise(kind::runtime_error(), "Error"))
    });
}

#[test]
fn test_assert_raise_usage_errors() {
    let mut ctx = TestContext::new();
    let failure = check_fails(
        &mut ctx,
        "Should expect at least one class of exception.\n<false> is not true.",
        |ctx| ctx.assert_raise(descriptors![], |_| raise(kind::runtime_error(), "Error")),
    );
    assert!(failure.is_usage());
    let failure = check_fails(
        &mut ctx,
        "Should expect a class of exception, String.\n<false> is not true.",
        |ctx| ctx.assert_raise(kind::string(), |_| raise(kind::runtime_error(), "Error")),
    );
    assert!(failure.is_usage());
}

#[test]
fn test_assert_raise_kind_of() {
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise_kind_of(kind::standard_error(), |_| {
            raise(kind::zero_division_error(), "divided by 0")
        })
    });
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise_kind_of(
            descriptors![kind::system_call_error(), kind::standard_error()],
            |_| raise(kind::runtime_error(), "XXX"),
        )
    });
    check_fails(
        &mut ctx,
        &format!(
            "<SystemCallError> family exception expected but was\nClass: <RuntimeError>\nMessage: <\"XXX\">\n{BACKTRACE}"
        ),
        |ctx| ctx.assert_raise_kind_of(kind::system_call_error(), |_| raise(kind::runtime_error(), "XXX")),
    );
}

#[test]
fn test_assert_raise_message() {
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_raise_message("Raise!", |_| raise(kind::runtime_error(), "Raise!"))
    });
    check_fails(
        &mut ctx,
        "<\"Expected message\"> exception message expected but was\n<\"Actual message\">.",
        |ctx| {
            ctx.assert_raise_message("Expected message", |_| {
                raise(kind::runtime_error(), "Actual message")
            })
        },
    );
    check_fails(
        &mut ctx,
        "<\"Expected message\"> exception message expected but none was thrown.",
        |ctx| ctx.assert_raise_message("Expected message", |_| Ok(())),
    );
    let failure = check_fails(
        &mut ctx,
        "<1>\ngiven as the expected message for #assert_raise_message must be a String or a Regexp.",
        |ctx| ctx.assert_raise_message(1, |_| raise(kind::runtime_error(), "1")),
    );
    assert!(failure.is_usage());
}

#[test]
fn test_assert_nothing_raised() {
    let mut ctx = TestContext::new();
    let value = check_nothing_fails(&mut ctx, |ctx| ctx.assert_nothing_raised(|_| Ok(1)));
    assert_eq!(value, 1);
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.with_message("successful assert_nothing_raised")
            .assert_nothing_raised_matching(kind::standard_error(), |_| Ok(()))
    });
    check_fails(
        &mut ctx,
        &format!("Exception raised:\nClass: <RuntimeError>\nMessage: <\"Error\">\n{BACKTRACE}"),
        |ctx| ctx.assert_nothing_raised(|_| raise(kind::runtime_error(), "Error")),
    );
    check_fails(&mut ctx, "Failure.", |ctx| {
        ctx.assert_nothing_raised(|ctx| ctx.with_message("Failure").flunk())
    });
}

#[test]
fn test_assert_nothing_raised_only_claims_listed_exceptions() {
    let mut ctx = TestContext::new();
    let intercepted = ctx.intercept(|ctx| {
        ctx.assert_nothing_raised_matching(
            descriptors![kind::runtime_error(), kind::type_error()],
            |_| raise(kind::zero_division_error(), "ArgumentError"),
        )
    });
    assert_eq!(intercepted.assertions, 1);
    assert!(intercepted.failures.is_empty());
    let err = intercepted.outcome.unwrap_err();
    assert_eq!(err.as_exception().unwrap().kind().name(), "ZeroDivisionError");
}

#[test]
fn test_assert_throws() {
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.with_message("message").assert_throws(Value::sym("thing"), |_| throw("thing"))
    });
    check_fails(
        &mut ctx,
        "message.\n<:thing> expected to be thrown but\n<:thing2> was thrown.",
        |ctx| ctx.with_message("message").assert_throws(Value::sym("thing"), |_| throw("thing2")),
    );
    check_fails(&mut ctx, "message.\n<:thing> should have been thrown.", |ctx| {
        ctx.with_message("message")
            .assert_throws(Value::sym("thing"), |_| Ok(Value::Integer(1)))
    });
}

#[test]
fn test_assert_throws_matches_labels_by_identity() {
    let label = Value::from("stop");
    let mut ctx = TestContext::new();
    check_nothing_fails(&mut ctx, |ctx| {
        ctx.assert_throws(&label, |_| Err(Unwind::throw(&label, 1)))
    });
    check_fails(
        &mut ctx,
        "<\"stop\"> expected to be thrown but\n<\"stop\"> was thrown.",
        |ctx| ctx.assert_throws(&label, |_| Err(Unwind::throw(Value::from("stop"), 1))),
    );
}

#[test]
fn test_assert_nothing_thrown() {
    let mut ctx = TestContext::new();
    let value = check_nothing_fails(&mut ctx, |ctx| {
        ctx.with_message("message").assert_nothing_thrown(|_| Ok(1))
    });
    assert_eq!(value, 1);
    check_fails(&mut ctx, "message.\n<:thing> was thrown when nothing was expected.", |ctx| {
        ctx.with_message("message").assert_nothing_thrown(|_| throw("thing"))
    });
}

#[test]
fn test_throw_to_an_outer_catcher_is_not_a_failure() {
    let mut ctx = TestContext::new();
    let caught = ctx
        .catch(Value::sym("outer"), |ctx| {
            ctx.assert_nothing_thrown(|_| throw("outer"))
        })
        .unwrap();
    assert_eq!(caught, Value::Nil);
    assert_eq!(ctx.assertion_count(), 1);
}
