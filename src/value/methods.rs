//! Capability dispatch: which messages a value responds to, and sending them.
//!
//! Built-in kinds carry fixed method tables. Objects consult their own table
//! first and fall back to the methods every value shares.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{inspect_float, Inspect, Value};
use crate::exception::{AssertResult, Unwind};
use crate::kind;

const SHARED: &[&str] = &["==", "!=", "equal?", "inspect", "to_s", "nil?"];
const COMPARISON: &[&str] = &["<", "<=", ">", ">="];
const NUMERIC: &[&str] = &["to_f"];
const STRING: &[&str] = &["=~", "to_str"];
const REGEXP: &[&str] = &["=~"];
const EXCEPTION: &[&str] = &["message"];

impl Value {
    fn builtin_tables(&self) -> &'static [&'static [&'static str]] {
        match self {
            Value::Nil => &[SHARED, NUMERIC],
            Value::Bool(_) | Value::Object(_) | Value::List(_) | Value::Map(_) => &[SHARED],
            Value::Integer(_) | Value::Float(_) => &[SHARED, COMPARISON, NUMERIC],
            Value::String(_) => &[SHARED, COMPARISON, STRING],
            Value::Symbol(_) => &[SHARED, COMPARISON],
            Value::Regex(_) => &[SHARED, REGEXP],
            Value::Exception(_) => &[SHARED, EXCEPTION],
        }
    }

    /// True if sending `name` would reach a method rather than raise
    /// `NoMethodError`.
    pub fn responds_to(&self, name: &str) -> bool {
        if let Value::Object(obj) = self {
            if obj.method(name).is_some() {
                return true;
            }
        }
        self.builtin_tables()
            .iter()
            .any(|table| table.contains(&name))
    }

    /// Sends `name` with `args`. Objects' own methods take precedence over
    /// the shared built-ins.
    pub fn send(&self, name: &str, args: &[Value]) -> AssertResult<Value> {
        if let Value::Object(obj) = self {
            if let Some(method) = obj.method(name) {
                return method.call(self, args);
            }
        }
        if !self.responds_to(name) {
            return Err(Unwind::raise(
                kind::no_method_error(),
                format!(
                    "undefined method `{name}' for {}:{}",
                    self.inspect(),
                    self.kind().name()
                ),
            ));
        }
        self.send_builtin(name, args)
    }

    fn send_builtin(&self, name: &str, args: &[Value]) -> AssertResult<Value> {
        match name {
            "==" => Ok(Value::Bool(self.equals(one_arg(name, args)?)?)),
            "!=" => Ok(Value::Bool(!self.equals(one_arg(name, args)?)?)),
            "equal?" => Ok(Value::Bool(self.is_same(one_arg(name, args)?))),
            "inspect" => no_args(name, args).map(|_| Value::from(self.inspect())),
            "to_s" => no_args(name, args).map(|_| Value::from(self.to_display_string())),
            "nil?" => no_args(name, args).map(|_| Value::Bool(self.is_nil())),
            "<" | "<=" | ">" | ">=" => {
                let ordering = self.compare(one_arg(name, args)?)?;
                Ok(Value::Bool(match name {
                    "<" => ordering == Ordering::Less,
                    "<=" => ordering != Ordering::Greater,
                    ">" => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            _ => self.send_typed(name, args),
        }
    }

    fn send_typed(&self, name: &str, args: &[Value]) -> AssertResult<Value> {
        match (self, name) {
            (Value::Nil, "to_f") => no_args(name, args).map(|_| Value::Float(0.0)),
            (Value::Integer(n), "to_f") => no_args(name, args).map(|_| Value::Float(*n as f64)),
            (Value::Float(f), "to_f") => no_args(name, args).map(|_| Value::Float(*f)),
            (Value::String(s), "to_str") => {
                no_args(name, args).map(|_| Value::String(Arc::clone(s)))
            }
            (Value::String(s), "=~") => match one_arg(name, args)? {
                Value::Regex(p) => Ok(p.match_index(s).map_or(Value::Nil, Value::from)),
                other => Err(Unwind::raise(
                    kind::type_error(),
                    format!("wrong argument type {} (expected Regexp)", other.kind().name()),
                )),
            },
            (Value::Regex(p), "=~") => Ok(match one_arg(name, args)? {
                Value::String(s) => p.match_index(s).map_or(Value::Nil, Value::from),
                _ => Value::Nil,
            }),
            (Value::Exception(e), "message") => {
                no_args(name, args).map(|_| Value::from(e.message()))
            }
            _ => Err(Unwind::raise(
                kind::no_method_error(),
                format!("undefined method `{name}' for {}", self.inspect()),
            )),
        }
    }

    /// `<=>` for the comparable built-ins.
    fn compare(&self, other: &Value) -> AssertResult<Ordering> {
        let ordering = match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Symbol(a), Value::Symbol(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        };
        ordering.ok_or_else(|| {
            Unwind::raise(
                kind::argument_error(),
                format!(
                    "comparison of {} with {} failed",
                    self.kind().name(),
                    other.inspect()
                ),
            )
        })
    }

    /// The `to_s` form: strings and symbols bare, nil empty, everything else
    /// inspected.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::String(s) => s.to_string(),
            Value::Symbol(s) => s.name().to_string(),
            Value::Float(f) => inspect_float(*f),
            Value::Exception(e) => e.message().to_string(),
            other => other.inspect(),
        }
    }
}

#[track_caller]
fn arity_error(name: &str, given: usize, expected: usize) -> Unwind {
    Unwind::raise(
        kind::argument_error(),
        format!("wrong number of arguments (given {given}, expected {expected}) for `{name}'"),
    )
}

fn one_arg<'a>(name: &str, args: &'a [Value]) -> AssertResult<&'a Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(arity_error(name, args.len(), 1)),
    }
}

fn no_args(name: &str, args: &[Value]) -> AssertResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(arity_error(name, args.len(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    fn raised_kind(result: AssertResult<Value>) -> String {
        match result {
            Err(Unwind::Raise(e)) => e.kind().name().to_string(),
            other => panic!("expected a raised exception, got {other:?}"),
        }
    }

    #[test]
    fn test_responds_to_builtins() {
        assert!(Value::from("thing").responds_to("to_s"));
        assert!(Value::from("thing").responds_to("to_str"));
        assert!(!Value::sym("symbol").responds_to("non_existent"));
        assert!(Value::Nil.responds_to("to_f"));
        assert!(!Object::plain().responds_to("to_f"));
        assert!(!Value::from("thing").responds_to("upcase"));
        assert!(!Value::list([1, 2]).responds_to("length"));
    }

    #[test]
    fn test_object_methods_take_precedence() {
        let float_thing = Object::build(kind::object())
            .method("to_f", |_, _| Ok(Value::Float(0.2)))
            .finish();
        assert!(float_thing.responds_to("to_f"));
        assert_eq!(float_thing.send("to_f", &[]).unwrap(), Value::Float(0.2));
    }

    #[test]
    fn test_comparisons() {
        let lt = Value::Float(1.4).send("<", &[Value::Float(10.0)]).unwrap();
        assert_eq!(lt, Value::Bool(true));
        let ge = Value::Integer(14).send(">=", &[Value::Float(10.0)]).unwrap();
        assert_eq!(ge, Value::Bool(true));
        let eq = Value::from("thing").send("==", &[Value::from("thing")]).unwrap();
        assert_eq!(eq, Value::Bool(true));
    }

    #[test]
    fn test_dispatch_errors_are_raised() {
        assert_eq!(
            raised_kind(Value::Integer(1).send("<", &[Value::from("a")])),
            "ArgumentError"
        );
        assert_eq!(
            raised_kind(Value::Integer(1).send("frobnicate", &[])),
            "NoMethodError"
        );
        assert_eq!(
            raised_kind(Value::Integer(1).send("==", &[])),
            "ArgumentError"
        );
        assert_eq!(
            raised_kind(Value::Integer(1).send("to_f", &[Value::Integer(2)])),
            "ArgumentError"
        );
    }

    #[test]
    fn test_regex_match_operator() {
        let p = crate::value::Pattern::new("strin.").unwrap();
        let idx = Value::from("string").send("=~", &[Value::from(p)]).unwrap();
        assert_eq!(idx, Value::Integer(0));
    }
}
