//! Dynamic values under test.
//!
//! Every assertion operates on [`Value`]s. Heap variants are reference
//! counted so that identity (`equal?`) stays distinguishable from equality
//! (`==`): cloning a value shares it, building a new one does not.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use im::OrdMap;
use regex::Regex;

use crate::exception::{AssertResult, Exception};
use crate::kind::{self, Kind};

mod inspect;
mod methods;
mod object;

pub use inspect::{inspect_float, inspect_str, inspect_symbol, Inspect};
pub use object::{Method, Object, ObjectBuilder};

/// Represents a value in the assertion engine.
///
/// # Examples
///
/// ```rust
/// use sutra_assert::value::{Inspect, Value};
/// let s = Value::from("hello");
/// assert_eq!(s.type_name(), "String");
/// assert_eq!(s.inspect(), "\"hello\"");
/// assert!(Value::Nil.is_nil());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(Arc<str>),
    Symbol(Symbol),
    List(Arc<Vec<Value>>),
    Map(Arc<OrdMap<String, Value>>),
    Regex(Pattern),
    Object(Arc<Object>),
    Exception(Arc<Exception>),
}

impl Value {
    /// Shorthand for a symbol value.
    pub fn sym(name: impl AsRef<str>) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// The kind this value is an instance of.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => kind::nil_class(),
            Value::Bool(true) => kind::true_class(),
            Value::Bool(false) => kind::false_class(),
            Value::Integer(_) => kind::integer(),
            Value::Float(_) => kind::float(),
            Value::String(_) => kind::string(),
            Value::Symbol(_) => kind::symbol(),
            Value::List(_) => kind::array(),
            Value::Map(_) => kind::hash(),
            Value::Regex(_) => kind::regexp(),
            Value::Object(obj) => obj.kind().clone(),
            Value::Exception(exc) => exc.kind().clone(),
        }
    }

    /// Returns the name of the value's kind.
    pub fn type_name(&self) -> String {
        self.kind().name().to_string()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<&Exception> {
        match self {
            Value::Exception(e) => Some(e),
            _ => None,
        }
    }

    /// Converts a method-name argument into a name: symbols and strings are
    /// accepted, anything else is not a name.
    pub fn as_method_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s.name()),
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Identity of the value. Immediates (nil, booleans, numbers, symbols)
    /// are identified by value, heap values by allocation.
    pub fn object_id(&self) -> u64 {
        match self {
            Value::Nil => 8,
            Value::Bool(false) => 0,
            Value::Bool(true) => 20,
            Value::Integer(n) => (*n as u64).wrapping_mul(2).wrapping_add(1),
            Value::Float(f) => (f.to_bits().rotate_left(3) & !0b11) | 0b10,
            Value::Symbol(s) => {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                s.name().hash(&mut hasher);
                (hasher.finish() << 8) | 0x0c
            }
            Value::String(s) => Arc::as_ptr(s) as *const u8 as usize as u64,
            Value::List(l) => Arc::as_ptr(l) as usize as u64,
            Value::Map(m) => Arc::as_ptr(m) as usize as u64,
            Value::Regex(p) => Arc::as_ptr(&p.0) as usize as u64,
            Value::Object(o) => Arc::as_ptr(o) as usize as u64,
            Value::Exception(e) => Arc::as_ptr(e) as usize as u64,
        }
    }

    /// `equal?`: true only for the very same value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Float(_), _) | (_, Value::Float(_)) => false,
            _ => self.object_id() == other.object_id(),
        }
    }

    /// `==`: dispatches to an object's own `==` method when it defines one,
    /// which may raise.
    pub fn equals(&self, other: &Value) -> AssertResult<bool> {
        if let Value::Object(obj) = self {
            if let Some(method) = obj.method("==") {
                return Ok(method.call(self, std::slice::from_ref(other))?.is_truthy());
            }
        }
        Ok(self == other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Exception(a), Value::Exception(b)) => {
                Arc::ptr_eq(a, b) || (a.kind() == b.kind() && a.message() == b.message())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

// ============================================================================
// SYMBOL & PATTERN
// ============================================================================

/// An interned-style name. Symbols with the same name are the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A compiled regular expression. Two patterns are equal when their
/// sources are.
#[derive(Debug, Clone)]
pub struct Pattern(Arc<Regex>);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self(Arc::new(Regex::new(source)?)))
    }

    /// A pattern matching `literal` verbatim.
    pub fn escaped(literal: &str) -> Result<Self, regex::Error> {
        Self::new(&regex::escape(literal))
    }

    pub fn source(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }

    /// Character offset of the first match, as `=~` reports it.
    pub fn match_index(&self, haystack: &str) -> Option<usize> {
        self.0
            .find(haystack)
            .map(|m| haystack[..m.start()].chars().count())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Regex(p)
    }
}

impl From<Exception> for Value {
    fn from(e: Exception) -> Self {
        Value::Exception(Arc::new(e))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}
