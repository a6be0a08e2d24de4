//! # Self-test harness
//!
//! Runs an assertion under interception and checks what it did: exactly one
//! counted assertion, and either no failure or a failure with the expected
//! message.

#![allow(dead_code)]

use regex::Regex;
use sutra_assert::{AssertResult, AssertionFailed, TestContext, Unwind};

/// Runs `body` intercepted and insists it made exactly one assertion.
fn check_one<T, F>(ctx: &mut TestContext, body: F) -> AssertResult<T>
where
    T: std::fmt::Debug,
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    let before = ctx.assertion_count();
    let intercepted = ctx.intercept(body);
    assert_eq!(
        intercepted.assertions, 1,
        "Should have made one assertion but made\n<{}>",
        intercepted.assertions
    );
    assert_eq!(ctx.assertion_count(), before, "interception leaked into the counter");
    intercepted.outcome
}

/// Asserts that `body` passes, returning its value.
pub fn check_nothing_fails<T, F>(ctx: &mut TestContext, body: F) -> T
where
    T: std::fmt::Debug,
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    match check_one(ctx, body) {
        Ok(value) => value,
        Err(Unwind::Failure(failure)) => panic!(
            "Should not have failed, but did with message\n<{}>",
            failure.message()
        ),
        Err(other) => panic!("Should not have failed, but raised {other:?}"),
    }
}

fn expect_failure<T, F>(ctx: &mut TestContext, body: F) -> AssertionFailed
where
    T: std::fmt::Debug,
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    match check_one(ctx, body) {
        Err(Unwind::Failure(failure)) => failure,
        Ok(value) => panic!("Should have failed, but didn't (returned {value:?})"),
        Err(other) => panic!("Should have failed, but raised {other:?}"),
    }
}

/// Asserts that `body` fails with exactly `expected`.
pub fn check_fails<T, F>(ctx: &mut TestContext, expected: &str, body: F) -> AssertionFailed
where
    T: std::fmt::Debug,
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    let failure = expect_failure(ctx, body);
    assert_eq!(failure.message(), expected, "Should have the correct message.");
    failure
}

/// Asserts that `body` fails with a message matching `pattern`.
pub fn check_fails_matching<T, F>(ctx: &mut TestContext, pattern: &str, body: F) -> AssertionFailed
where
    T: std::fmt::Debug,
    F: FnOnce(&mut TestContext) -> AssertResult<T>,
{
    let failure = expect_failure(ctx, body);
    let re = Regex::new(pattern).expect("valid test pattern");
    assert!(
        re.is_match(failure.message()),
        "The message should match correctly.\n</{pattern}/> expected to match\n<{:?}>",
        failure.message()
    );
    failure
}
