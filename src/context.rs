//! Per-test assertion context.
//!
//! A [`TestContext`] belongs to exactly one running test. It owns the
//! assertion counter, the stack of active catch labels and, for self-tests,
//! an interception log. Nothing here is global: tests on different threads
//! each hold their own context.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::AssertConfig;
use crate::diagnostics::AssertionFailed;
use crate::exception::{AssertResult, Exception, Unwind};
use crate::tag::Label;

#[derive(Debug, Default)]
pub struct TestContext {
    name: Option<String>,
    assertions: usize,
    depth: usize,
    pub(crate) catchers: Vec<Label>,
    interception: Option<Interception>,
    config: AssertConfig,
}

#[derive(Debug, Default)]
struct Interception {
    assertions: usize,
    failures: Vec<AssertionFailed>,
}

/// What a block run under [`TestContext::intercept`] did.
#[derive(Debug)]
pub struct Intercepted<T> {
    /// Assertions counted while intercepting.
    pub assertions: usize,
    pub outcome: AssertResult<T>,
    /// Every failure raised by an outermost assertion, in order.
    pub failures: Vec<AssertionFailed>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AssertConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Number of assertions evaluated so far. Assertions made while
    /// intercepting are not included.
    pub fn assertion_count(&self) -> usize {
        self.assertions
    }

    pub fn is_intercepting(&self) -> bool {
        self.interception.is_some()
    }

    fn add_assertion(&mut self) {
        match &mut self.interception {
            Some(interception) => interception.assertions += 1,
            None => self.assertions += 1,
        }
    }

    /// Runs one assertion. The outermost call counts once, before `body`
    /// runs; assertions nested inside it (including those made by a block
    /// under test) do not count.
    pub(crate) fn wrap<T, F>(&mut self, assertion: &'static str, body: F) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        if self.depth > 0 {
            return body(self);
        }
        self.add_assertion();
        trace!(assertion, test = ?self.name, "evaluating");
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        if let Err(Unwind::Failure(failure)) = &result {
            debug!(
                assertion,
                test = ?self.name,
                kind = %failure.kind(),
                "assertion failed"
            );
            if let Some(interception) = &mut self.interception {
                interception.failures.push(failure.clone());
            }
        }
        result
    }

    /// Runs `body` in test-double mode: assertions are counted and failures
    /// logged locally, and the regular counter is left alone.
    pub fn intercept<T, F>(&mut self, body: F) -> Intercepted<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        let saved_depth = std::mem::take(&mut self.depth);
        let saved = self.interception.replace(Interception::default());
        debug!(test = ?self.name, "interception started");

        let outcome = body(self);

        let interception = std::mem::replace(&mut self.interception, saved).unwrap_or_default();
        self.depth = saved_depth;
        debug!(
            test = ?self.name,
            assertions = interception.assertions,
            failures = interception.failures.len(),
            "interception finished"
        );
        Intercepted {
            assertions: interception.assertions,
            outcome,
            failures: interception.failures,
        }
    }

    /// Runs a test body to completion and classifies the result.
    pub fn execute<F>(mut self, body: F) -> TestReport
    where
        F: FnOnce(&mut TestContext) -> AssertResult,
    {
        let outcome = match body(&mut self) {
            Ok(()) => TestOutcome::Passed,
            Err(Unwind::Failure(failure)) => TestOutcome::Failed(failure),
            Err(Unwind::Raise(exception)) => TestOutcome::Errored(exception),
            Err(Unwind::Throw(thrown)) => TestOutcome::Errored(thrown.into_exception()),
        };
        debug!(
            test = ?self.name,
            assertions = self.assertions,
            status = outcome.status(),
            "test finished"
        );
        TestReport {
            name: self.name.unwrap_or_default(),
            assertions: self.assertions,
            outcome,
        }
    }

    /// Runs `body` as the test `name` in a fresh context.
    pub fn run<F>(name: impl Into<String>, body: F) -> TestReport
    where
        F: FnOnce(&mut TestContext) -> AssertResult,
    {
        Self::named(name).execute(body)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed(AssertionFailed),
    Errored(Exception),
}

impl TestOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed(_) => "failed",
            TestOutcome::Errored(_) => "errored",
        }
    }
}

/// Result of one test, handed to the external runner.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub name: String,
    pub assertions: usize,
    pub outcome: TestOutcome,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, TestOutcome::Passed)
    }
}
