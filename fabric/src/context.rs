use core::{
    any::TypeId,
    sync::atomic::{AtomicBool, Ordering},
};
use std::sync::Arc;

use crate::any;

/// Per-call context passed to factories, tag processors, middlewares and lifecycle hooks.
///
/// Carries typed values and an advisory cancellation flag.
/// Clones share the cancellation flag but own their values.
#[derive(Clone)]
pub struct Context {
    pub(crate) map: Option<Box<any::Map>>,
    cancelled: Arc<AtomicBool>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<Arc<T>> {
        self.insert_rc(Arc::new(value))
    }

    #[inline]
    pub fn insert_rc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) -> Option<Arc<T>> {
        self.map
            .get_or_insert_with(Box::default)
            .insert(TypeId::of::<T>(), value)
            .and_then(|boxed| boxed.downcast().ok())
    }

    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .as_ref()
            .and_then(|map| map.get(&TypeId::of::<T>()))
            .and_then(|boxed| boxed.clone().downcast().ok())
    }

    /// Marks the context as cancelled.
    /// Nothing in the container aborts on it, it's up to factories and hooks to check.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::Context;

    use std::sync::Arc;

    struct RequestId(u32);

    #[test]
    fn test_insert_and_get() {
        let mut context = Context::new();
        assert!(context.get::<RequestId>().is_none());

        assert!(context.insert(RequestId(1)).is_none());
        let previous = context.insert_rc(Arc::new(RequestId(2))).unwrap();

        assert_eq!(previous.0, 1);
        assert_eq!(context.get::<RequestId>().unwrap().0, 2);
    }

    #[test]
    fn test_cancel_shared_between_clones() {
        let mut context = Context::new();
        context.insert(RequestId(1));

        let child = context.clone();
        assert!(!child.is_cancelled());

        context.cancel();

        assert!(child.is_cancelled());
        assert_eq!(child.get::<RequestId>().unwrap().0, 1);
    }
}
