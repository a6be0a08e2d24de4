//! Kinds and categories: the class-like descriptors the assertion engine
//! uses for type membership and exception matching.
//!
//! A [`Kind`] is compared by identity and forms a single-parent hierarchy.
//! A [`Category`] is a named marker (a capability shared by unrelated kinds,
//! like `Comparable`) compared by name. Built-in kinds live behind the
//! accessor functions at the bottom of this module.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::value::{Inspect, Value};

// ============================================================================
// CATEGORY
// ============================================================================

/// A named capability marker that kinds (and individual exceptions) can
/// belong to without sharing an ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(Arc<str>);

impl Category {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Inspect for Category {
    fn inspect(&self) -> String {
        self.0.to_string()
    }
}

// ============================================================================
// KIND
// ============================================================================

#[derive(Debug)]
struct KindDef {
    name: String,
    parent: Option<Kind>,
    categories: Vec<Category>,
}

/// A class-like descriptor. Two kinds are equal only if they are the same
/// definition, even when their names collide.
#[derive(Debug, Clone)]
pub struct Kind(Arc<KindDef>);

impl Kind {
    /// Defines a new kind under `parent`. Root kinds (no parent) are only
    /// created for the built-in `Object`.
    pub fn new(name: impl Into<String>, parent: Option<&Kind>, categories: Vec<Category>) -> Self {
        Self(Arc::new(KindDef {
            name: name.into(),
            parent: parent.cloned(),
            categories,
        }))
    }

    /// Defines a child of `self` with no extra categories.
    pub fn subclass(&self, name: impl Into<String>) -> Self {
        Self::new(name, Some(self), Vec::new())
    }

    /// Defines a child of `self` that includes `categories`.
    pub fn subclass_including(&self, name: impl Into<String>, categories: Vec<Category>) -> Self {
        Self::new(name, Some(self), categories)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Kind> {
        self.0.parent.as_ref()
    }

    /// Iterates `self` followed by every ancestor, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Kind> {
        std::iter::successors(Some(self), |k| k.parent())
    }

    /// True if `self` is `other` or descends from it.
    pub fn is_a(&self, other: &Kind) -> bool {
        self.ancestors().any(|k| k == other)
    }

    /// True if `self` or an ancestor includes `category`.
    pub fn includes(&self, category: &Category) -> bool {
        self.ancestors()
            .any(|k| k.0.categories.iter().any(|c| c == category))
    }

    /// True for `Exception` and everything below it.
    pub fn is_exception_kind(&self) -> bool {
        self.is_a(&exception())
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Kind {}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl Inspect for Kind {
    fn inspect(&self) -> String {
        self.0.name.clone()
    }
}

/// Anything a value can be checked for membership in: a kind (with its
/// descendants) or a category.
pub trait Classifies: Inspect {
    fn classifies(&self, value: &Value) -> bool;
}

impl Classifies for Kind {
    fn classifies(&self, value: &Value) -> bool {
        value.kind().is_a(self)
    }
}

impl Classifies for Category {
    fn classifies(&self, value: &Value) -> bool {
        match value {
            Value::Exception(e) => e.belongs_to(self),
            other => other.kind().includes(self),
        }
    }
}

// ============================================================================
// BUILT-IN HIERARCHY
// ============================================================================

struct Builtins {
    object: Kind,
    nil: Kind,
    true_kind: Kind,
    false_kind: Kind,
    numeric: Kind,
    integer: Kind,
    float: Kind,
    string: Kind,
    symbol: Kind,
    array: Kind,
    hash: Kind,
    regexp: Kind,
    exception: Kind,
    standard_error: Kind,
    runtime_error: Kind,
    argument_error: Kind,
    uncaught_throw_error: Kind,
    type_error: Kind,
    zero_division_error: Kind,
    index_error: Kind,
    system_call_error: Kind,
    name_error: Kind,
    no_method_error: Kind,
    comparable: Category,
    enumerable: Category,
}

static BUILTINS: Lazy<Builtins> = Lazy::new(|| {
    let comparable = Category::new("Comparable");
    let enumerable = Category::new("Enumerable");

    let object = Kind::new("Object", None, Vec::new());
    let numeric = object.subclass_including("Numeric", vec![comparable.clone()]);
    let exception = object.subclass("Exception");
    let standard_error = exception.subclass("StandardError");
    let argument_error = standard_error.subclass("ArgumentError");
    let name_error = standard_error.subclass("NameError");

    Builtins {
        nil: object.subclass("NilClass"),
        true_kind: object.subclass("TrueClass"),
        false_kind: object.subclass("FalseClass"),
        integer: numeric.subclass("Integer"),
        float: numeric.subclass("Float"),
        string: object.subclass_including("String", vec![comparable.clone()]),
        symbol: object.subclass_including("Symbol", vec![comparable.clone()]),
        array: object.subclass_including("Array", vec![enumerable.clone()]),
        hash: object.subclass_including("Hash", vec![enumerable.clone()]),
        regexp: object.subclass("Regexp"),
        runtime_error: standard_error.subclass("RuntimeError"),
        uncaught_throw_error: argument_error.subclass("UncaughtThrowError"),
        type_error: standard_error.subclass("TypeError"),
        zero_division_error: standard_error.subclass("ZeroDivisionError"),
        index_error: standard_error.subclass("IndexError"),
        system_call_error: standard_error.subclass("SystemCallError"),
        no_method_error: name_error.subclass("NoMethodError"),
        object,
        numeric,
        exception,
        standard_error,
        argument_error,
        name_error,
        comparable,
        enumerable,
    }
});

macro_rules! builtin_kinds {
    ($($(#[$doc:meta])* $fn_name:ident => $field:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $fn_name() -> Kind {
                BUILTINS.$field.clone()
            }
        )*
    };
}

builtin_kinds! {
    /// The root of the hierarchy. Not an exception kind, so passing it as an
    /// exception descriptor is a usage violation.
    object => object,
    nil_class => nil,
    true_class => true_kind,
    false_class => false_kind,
    numeric => numeric,
    integer => integer,
    float => float,
    string => string,
    symbol => symbol,
    array => array,
    hash => hash,
    regexp => regexp,
    /// Matches every exception, so it is rejected as an exception descriptor.
    exception => exception,
    standard_error => standard_error,
    runtime_error => runtime_error,
    argument_error => argument_error,
    /// Raised when a label is thrown with no enclosing catcher.
    uncaught_throw_error => uncaught_throw_error,
    type_error => type_error,
    zero_division_error => zero_division_error,
    index_error => index_error,
    system_call_error => system_call_error,
    name_error => name_error,
    no_method_error => no_method_error,
}

pub fn comparable() -> Category {
    BUILTINS.comparable.clone()
}

pub fn enumerable() -> Category {
    BUILTINS.enumerable.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_walks_ancestors() {
        assert!(no_method_error().is_a(&name_error()));
        assert!(no_method_error().is_a(&standard_error()));
        assert!(no_method_error().is_a(&object()));
        assert!(!runtime_error().is_a(&argument_error()));
        assert!(uncaught_throw_error().is_a(&argument_error()));
    }

    #[test]
    fn test_categories_are_inherited() {
        assert!(integer().includes(&comparable()));
        assert!(float().includes(&comparable()));
        assert!(!regexp().includes(&comparable()));
        assert!(array().includes(&enumerable()));
    }

    #[test]
    fn test_kinds_compare_by_identity() {
        let a = standard_error().subclass("CustomError");
        let b = standard_error().subclass("CustomError");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(runtime_error(), runtime_error());
    }

    #[test]
    fn test_classifies_values() {
        assert!(object().classifies(&Value::from("string")));
        assert!(numeric().classifies(&Value::Integer(1)));
        assert!(comparable().classifies(&Value::Float(1.5)));
        assert!(!comparable().classifies(&Value::Nil));
        assert!(!hash().classifies(&Value::from("string")));
    }

    #[test]
    fn test_exception_kinds() {
        assert!(zero_division_error().is_exception_kind());
        assert!(!string().is_exception_kind());
        assert!(!object().is_exception_kind());
    }
}
