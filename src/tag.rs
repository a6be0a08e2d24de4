//! Labels for non-local throw/catch and the catch boundary that stops them.

use tracing::trace;

use crate::context::TestContext;
use crate::exception::{AssertResult, Unwind};
use crate::value::{Inspect, Symbol, Value};

/// Identity token matched by throw/catch. Two labels match only when their
/// values are the same value (`equal?`), never by structure: two separately
/// built strings `"done"` are different labels.
#[derive(Debug, Clone)]
pub struct Label(Value);

impl Label {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.0.is_same(&other.0)
    }
}

impl Inspect for Label {
    fn inspect(&self) -> String {
        self.0.inspect()
    }
}

impl From<Value> for Label {
    fn from(v: Value) -> Self {
        Self(v)
    }
}

impl From<&Value> for Label {
    fn from(v: &Value) -> Self {
        Self(v.clone())
    }
}

impl From<Symbol> for Label {
    fn from(s: Symbol) -> Self {
        Self(Value::Symbol(s))
    }
}

impl From<&Label> for Label {
    fn from(l: &Label) -> Self {
        l.clone()
    }
}

impl TestContext {
    /// Runs `body` inside a catch boundary for `label`. A throw of that label
    /// ends the block with the thrown value; anything else passes through.
    pub fn catch<F>(&mut self, label: impl Into<Label>, body: F) -> AssertResult<Value>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<Value>,
    {
        let label = label.into();
        match self.with_catcher(&label, body) {
            Err(Unwind::Throw(thrown)) if thrown.label == label => {
                trace!(label = %label.inspect(), "caught throw");
                Ok(thrown.value)
            }
            other => other,
        }
    }

    /// Runs `body` with `label` registered as catchable, so that
    /// assertions further down can tell whether a throw has a home.
    pub(crate) fn with_catcher<T, F>(&mut self, label: &Label, body: F) -> AssertResult<T>
    where
        F: FnOnce(&mut TestContext) -> AssertResult<T>,
    {
        self.catchers.push(label.clone());
        let result = body(self);
        self.catchers.pop();
        result
    }

    /// True if some enclosing boundary catches `label`.
    pub fn has_catcher(&self, label: &Label) -> bool {
        self.catchers.iter().any(|l| l == label)
    }
}
