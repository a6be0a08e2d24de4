//! User-defined objects: a kind, a set of fields and a method table.
//!
//! Objects are how test code models "anything that responds to a message":
//! a float-like object with a `to_f` method, an object whose `==` is
//! custom, an object with a bespoke `inspect`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use im::OrdMap;

use super::{Inspect, Value};
use crate::exception::AssertResult;
use crate::kind::{self, Kind};

type MethodFn = dyn Fn(&Value, &[Value]) -> AssertResult<Value> + Send + Sync;

/// A callable entry in an object's method table. Receives the receiver and
/// the call arguments.
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> AssertResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> AssertResult<Value> {
        (self.0)(receiver, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

#[derive(Debug)]
pub struct Object {
    kind: Kind,
    fields: OrdMap<String, Value>,
    methods: BTreeMap<String, Method>,
}

impl Object {
    /// Starts building an object of `kind`.
    pub fn build(kind: Kind) -> ObjectBuilder {
        ObjectBuilder {
            kind,
            fields: OrdMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// A bare instance of `Object` with no fields or methods.
    pub fn plain() -> Value {
        Self::build(kind::object()).finish()
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// `#<Kind @a=1, @b="x">`, or `#<Kind>` without fields.
    pub(crate) fn default_inspect(&self) -> String {
        if self.fields.is_empty() {
            return format!("#<{}>", self.kind.name());
        }
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| format!("@{k}={}", v.inspect()))
            .collect();
        format!("#<{} {}>", self.kind.name(), fields.join(", "))
    }
}

pub struct ObjectBuilder {
    kind: Kind,
    fields: OrdMap<String, Value>,
    methods: BTreeMap<String, Method>,
}

impl ObjectBuilder {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> AssertResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Method::new(f));
        self
    }

    pub fn finish(self) -> Value {
        Value::Object(Arc::new(Object {
            kind: self.kind,
            fields: self.fields,
            methods: self.methods,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inspect_lists_fields_in_order() {
        let obj = Object::build(kind::object())
            .field("b", "x")
            .field("a", 1)
            .finish();
        assert_eq!(obj.inspect(), "#<Object @a=1, @b=\"x\">");
        assert_eq!(Object::plain().inspect(), "#<Object>");
    }

    #[test]
    fn test_custom_inspect_is_used() {
        let obj = Object::build(kind::object())
            .method("inspect", |_, _| Ok(Value::from("custom")))
            .finish();
        assert_eq!(obj.inspect(), "custom");
    }

    #[test]
    fn test_failing_inspect_falls_back() {
        let obj = Object::build(kind::object())
            .method("inspect", |_, _| {
                Err(crate::exception::Unwind::raise(kind::runtime_error(), "boom"))
            })
            .finish();
        assert_eq!(obj.inspect(), "#<Object>");
    }
}
