use super::dispatch::respond_to_text;
use super::{ensure, usage};
use crate::context::TestContext;
use crate::exception::{AssertResult, Unwind};
use crate::kind;
use crate::message::{self, Literal};
use crate::value::Value;

/// `to_f` of an argument already known to respond to it.
fn to_f(value: &Value) -> AssertResult<f64> {
    match value.send("to_f", &[])? {
        Value::Float(f) => Ok(f),
        Value::Integer(n) => Ok(n as f64),
        other => Err(Unwind::raise(
            kind::type_error(),
            format!("{}#to_f gives {}", value.type_name(), other.type_name()),
        )),
    }
}

/// Checks, in order: every argument responds to `to_f`; the delta is not
/// negative; the two floats lie within the delta. A negative delta fails
/// whatever the compared values are.
pub(super) fn assert_in_delta(
    ctx: &mut TestContext,
    head: Option<&str>,
    expected: Value,
    actual: Value,
    delta: Value,
) -> AssertResult {
    ctx.wrap("assert_in_delta", |_| {
        let to_f_symbol = Value::sym("to_f");
        for (value, name) in [
            (&expected, "first float"),
            (&actual, "second float"),
            (&delta, "delta"),
        ] {
            if !value.responds_to("to_f") {
                return Err(usage(
                    "assert_in_delta",
                    message::compose(
                        Some(&format!("The arguments must respond to to_f; the {name} did not")),
                        &respond_to_text(value, &to_f_symbol),
                    ),
                ));
            }
        }

        let tolerance = to_f(&delta)?;
        if tolerance < 0.0 {
            let body = message::compose(
                Some("The delta should not be negative"),
                &message::fill("<?> expected to be\n?\n<?>.", &[
                    &delta,
                    &Literal::new(">="),
                    &Value::Float(0.0),
                ]),
            );
            return Err(usage("assert_in_delta", message::compose(head, &body)));
        }

        let difference = (to_f(&expected)? - to_f(&actual)?).abs();
        ensure(difference <= tolerance, "assert_in_delta", || {
            message::build(
                head,
                "<?> and\n<?> expected to be within\n<?> of each other.",
                &[&expected, &actual, &delta],
            )
        })
    })
}
