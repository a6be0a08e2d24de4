//! Assertions that send messages to the value under test.

use super::{ensure, usage};
use crate::context::TestContext;
use crate::exception::{AssertResult, Unwind};
use crate::kind;
use crate::message::{self, Literal};
use crate::value::Value;

/// A method name: a symbol, a string, or anything whose `to_str` returns a
/// string. `None` if `value` cannot name a method.
fn method_name(value: &Value) -> AssertResult<Option<String>> {
    if let Some(name) = value.as_method_name() {
        return Ok(Some(name.to_string()));
    }
    if !value.responds_to("to_str") {
        return Ok(None);
    }
    match value.send("to_str", &[])? {
        Value::String(s) => Ok(Some(s.to_string())),
        other => Err(Unwind::raise(
            kind::type_error(),
            format!(
                "can't convert {} to String ({}#to_str gives {})",
                value.type_name(),
                value.type_name(),
                other.type_name()
            ),
        )),
    }
}

/// The text of a failed `respond_to?` check, shared with `assert_in_delta`.
pub(super) fn respond_to_text(object: &Value, method: &Value) -> String {
    message::fill(
        "<?>\nof type <?>\nexpected to respond_to\\?<?>.",
        &[object, &object.kind(), method],
    )
}

pub(super) fn assert_respond_to(
    ctx: &mut TestContext,
    head: Option<&str>,
    object: Value,
    method: Value,
) -> AssertResult {
    ctx.wrap("assert_respond_to", |_| {
        let Some(name) = method_name(&method)? else {
            return Err(usage(
                "assert_respond_to",
                message::fill(
                    "<?>\ngiven as the method name argument to #assert_respond_to must be a Symbol or #respond_to\\?(:to_str).",
                    &[&method],
                ),
            ));
        };
        ensure(object.responds_to(&name), "assert_respond_to", || {
            message::compose(head, &respond_to_text(&object, &method))
        })
    })
}

pub(super) fn assert_operator(
    ctx: &mut TestContext,
    head: Option<&str>,
    left: Value,
    operator: Value,
    right: Value,
) -> AssertResult {
    ctx.wrap("assert_operator", |_| {
        let Some(name) = method_name(&operator)? else {
            return Err(usage(
                "assert_operator",
                message::fill(
                    "<?>\ngiven as the operator for #assert_operator must be a Symbol or #respond_to\\?(:to_str).",
                    &[&operator],
                ),
            ));
        };
        let result = left.send(&name, std::slice::from_ref(&right))?;
        ensure(result.is_truthy(), "assert_operator", || {
            message::build(head, "<?> expected to be\n?\n<?>.", &[
                &left,
                &Literal::new(name.as_str()),
                &right,
            ])
        })
    })
}

const COMPARISONS: &[(&str, &str)] = &[
    ("<", "less than"),
    ("<=", "less than or equal to"),
    (">", "greater than"),
    (">=", "greater than or equal to"),
];

pub(super) fn assert_compare(
    ctx: &mut TestContext,
    head: Option<&str>,
    left: Value,
    operator: Value,
    right: Value,
) -> AssertResult {
    ctx.wrap("assert_compare", |_| {
        let op = operator.to_display_string();
        let Some(&(op, description)) = COMPARISONS.iter().find(|(o, _)| *o == op) else {
            return Err(usage(
                "assert_compare",
                message::fill(
                    "<?>\ngiven as the operator for #assert_compare must be one of <\"<\">, <\"<=\">, <\">\">, <\">=\">.",
                    &[&Value::from(op)],
                ),
            ));
        };
        let result = left.send(op, std::slice::from_ref(&right))?;
        ensure(result.is_truthy(), "assert_compare", || {
            let template = format!("<?> {op} <?> should be true\n<?> expected {description}\n<?>.");
            message::build(head, &template, &[&left, &right, &left, &right])
        })
    })
}

pub(super) fn assert_send(
    ctx: &mut TestContext,
    head: Option<&str>,
    receiver: Value,
    name: Value,
    args: Vec<Value>,
) -> AssertResult<Value> {
    ctx.wrap("assert_send", |_| {
        let method = name.to_display_string();
        let result = receiver.send(&method, &args)?;
        if result.is_truthy() {
            return Ok(result);
        }
        let args = Value::list(args);
        Err(super::mismatch(
            "assert_send",
            message::build(head, "<?> expected to respond to\n<?(?)> with a true value.", &[
                &receiver,
                &Literal(method),
                &args,
            ]),
        ))
    })
}
