use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::{
    any::{RcAny, TypeInfo},
    lifecycle::Lifecycle,
};

/// Type-erased resolved value.
///
/// Holds an `Arc<T>` where `T` may be unsized (`dyn Trait`), so a value resolved by capability
/// and by concrete type are both representable. The value is only reachable through
/// [`Instance::downcast`], which fails instead of panicking on a type mismatch.
#[derive(Clone)]
pub struct Instance {
    value: RcAny,
    type_info: TypeInfo,
    lifecycle: Option<Arc<dyn Lifecycle>>,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            type_info: TypeInfo::of::<T>(),
            lifecycle: None,
        }
    }

    /// Creates an instance whose [`Lifecycle::init`] runs on resolution and
    /// [`Lifecycle::cleanup`] on container teardown.
    #[inline]
    #[must_use]
    pub fn managed<T>(value: Arc<T>) -> Self
    where
        T: Lifecycle + 'static,
    {
        let lifecycle: Arc<dyn Lifecycle> = value.clone();
        Self {
            lifecycle: Some(lifecycle),
            ..Self::new(value)
        }
    }

    /// Swaps the held value, dropping the lifecycle handle of the original.
    ///
    /// Used by middlewares that decorate an instance. The decorated value is initialized and cleaned up
    /// only if a handle is attached with [`Instance::with_lifecycle`].
    #[inline]
    #[must_use]
    pub fn replace<T>(self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self::new(value)
    }

    /// Attaches the lifecycle run for this instance, replacing the previous one
    #[inline]
    #[must_use]
    pub fn with_lifecycle(self, lifecycle: Arc<dyn Lifecycle>) -> Self {
        Self {
            lifecycle: Some(lifecycle),
            ..self
        }
    }

    /// Views the same object as another type, e.g. a capability, keeping its lifecycle handle
    #[inline]
    #[must_use]
    pub(crate) fn cast<T>(self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            lifecycle: self.lifecycle,
            ..Self::new(value)
        }
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> Option<&Arc<dyn Lifecycle>> {
        self.lifecycle.as_ref()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_info", &self.type_info)
            .field("managed", &self.lifecycle.is_some())
            .finish_non_exhaustive()
    }
}
