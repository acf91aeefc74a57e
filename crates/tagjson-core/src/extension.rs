//! Type-erased application values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Capability required of a type stored in [`Extension`].
///
/// Implemented automatically for every `'static` type that is
/// `Debug + PartialEq + Send + Sync`.
pub trait ExtensionValue: Any + fmt::Debug + Send + Sync {
    fn dyn_eq(&self, other: &dyn ExtensionValue) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T> ExtensionValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn dyn_eq(&self, other: &dyn ExtensionValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared handle to an application value.
///
/// Cloning is cheap. Two extensions are equal when they wrap the same
/// concrete type and the wrapped values compare equal.
#[derive(Clone)]
pub struct Extension(Arc<dyn ExtensionValue>);

impl Extension {
    pub fn new<T: ExtensionValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: ExtensionValue>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn is<T: ExtensionValue>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Rust type name of the wrapped value (diagnostics only).
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(&*other.0)
    }
}
