//! Exception matching against descriptor lists.
//!
//! A descriptor names an acceptable exception shape. Matching is an OR over
//! the list; the list renders as a single name when it has one entry and as
//! `[A, B]` otherwise.

use std::sync::Arc;

use crate::exception::Exception;
use crate::kind::{self, Category, Kind};
use crate::message;
use crate::value::{Inspect, Value};

/// Decides whether an exception is acceptable.
pub trait Rescues {
    fn rescues(&self, exception: &Exception) -> bool;
}

/// The kind or any kind below it in the hierarchy.
impl Rescues for Kind {
    fn rescues(&self, exception: &Exception) -> bool {
        exception.is_a(self)
    }
}

impl Rescues for Category {
    fn rescues(&self, exception: &Exception) -> bool {
        exception.belongs_to(self)
    }
}

/// An expected exception object: same kind and same message.
impl Rescues for Exception {
    fn rescues(&self, exception: &Exception) -> bool {
        exception.instance_of(self.kind()) && exception.message() == self.message()
    }
}

#[derive(Debug, Clone)]
pub enum Descriptor {
    Kind(Kind),
    Category(Category),
    Instance(Arc<Exception>),
}

impl Descriptor {
    /// A usage message if this descriptor cannot describe an exception, or
    /// would match every exception.
    fn usage_error(&self) -> Option<String> {
        let Descriptor::Kind(kind) = self else {
            return None;
        };
        let head = if !kind.is_exception_kind() {
            format!("Should expect a class of exception, {}", kind.name())
        } else if *kind == kind::exception() {
            format!("Should expect a narrower class of exception than {}", kind.name())
        } else {
            return None;
        };
        Some(message::compose(
            Some(&head),
            &message::fill("<?> is not true.", &[&Value::Bool(false)]),
        ))
    }
}

impl Rescues for Descriptor {
    fn rescues(&self, exception: &Exception) -> bool {
        match self {
            Descriptor::Kind(kind) => kind.rescues(exception),
            Descriptor::Category(category) => category.rescues(exception),
            Descriptor::Instance(expected) => expected.rescues(exception),
        }
    }
}

impl Inspect for Descriptor {
    fn inspect(&self) -> String {
        match self {
            Descriptor::Kind(kind) => kind.inspect(),
            Descriptor::Category(category) => category.inspect(),
            Descriptor::Instance(exception) => Value::Exception(Arc::clone(exception)).inspect(),
        }
    }
}

impl From<Kind> for Descriptor {
    fn from(kind: Kind) -> Self {
        Descriptor::Kind(kind)
    }
}

impl From<Category> for Descriptor {
    fn from(category: Category) -> Self {
        Descriptor::Category(category)
    }
}

impl From<Exception> for Descriptor {
    fn from(exception: Exception) -> Self {
        Descriptor::Instance(Arc::new(exception))
    }
}

/// An ordered descriptor list.
#[derive(Debug, Clone, Default)]
pub struct Descriptors(Vec<Descriptor>);

impl Descriptors {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self(descriptors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.0.iter()
    }

    /// First descriptor that accepts `exception`.
    pub fn matching(&self, exception: &Exception) -> Option<&Descriptor> {
        self.0.iter().find(|d| d.rescues(exception))
    }

    /// The usage message for the first descriptor that is not an exception
    /// kind or is the catch-all root kind.
    pub(crate) fn usage_error(&self) -> Option<String> {
        self.0.iter().find_map(Descriptor::usage_error)
    }
}

impl Rescues for Descriptors {
    fn rescues(&self, exception: &Exception) -> bool {
        self.matching(exception).is_some()
    }
}

impl Inspect for Descriptors {
    fn inspect(&self) -> String {
        match self.0.as_slice() {
            [single] => single.inspect(),
            many => {
                let parts: Vec<String> = many.iter().map(Inspect::inspect).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

macro_rules! single_descriptor {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Descriptors {
                fn from(d: $ty) -> Self {
                    Self(vec![d.into()])
                }
            }
        )*
    };
}

single_descriptor!(Descriptor, Kind, Category, Exception);

impl From<Vec<Descriptor>> for Descriptors {
    fn from(descriptors: Vec<Descriptor>) -> Self {
        Self(descriptors)
    }
}

impl<D: Into<Descriptor>> FromIterator<D> for Descriptors {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`Descriptors`] list from kinds, categories and exceptions.
///
/// ```rust
/// use sutra_assert::descriptors;
/// use sutra_assert::kind;
/// use sutra_assert::value::Inspect;
/// let list = descriptors![kind::argument_error(), kind::comparable()];
/// assert_eq!(list.inspect(), "[ArgumentError, Comparable]");
/// ```
#[macro_export]
macro_rules! descriptors {
    ($($d:expr),* $(,)?) => {
        $crate::rescue::Descriptors::new(vec![$($crate::rescue::Descriptor::from($d)),*])
    };
}
