use std::{mem, sync::Arc};
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    context::Context,
    errors::{CleanupError, CleanupErrorKind, Errors},
};

/// Init/cleanup contract for resolved instances.
///
/// `init` is called right after middlewares and before the instance is cached or returned.
/// `cleanup` is called once on container teardown, in reverse order of successful `init` calls.
///
/// # Warning
/// [`Drop`] isn't an equivalent of `cleanup`: cleanup runs in reverse creation order and can fail,
/// while drop order follows the last owner of the instance.
pub trait Lifecycle: Send + Sync {
    /// # Errors
    /// A failure aborts the resolution, and the instance isn't tracked for cleanup
    fn init(&self, ctx: &Context) -> anyhow::Result<()>;

    /// # Errors
    /// A failure is collected, and cleanup continues with the remaining instances
    fn cleanup(&self, ctx: &Context) -> anyhow::Result<()>;
}

pub(crate) struct Tracked {
    pub(crate) type_info: TypeInfo,
    pub(crate) name: String,
    pub(crate) lifecycle: Arc<dyn Lifecycle>,
}

#[derive(Default)]
pub(crate) struct LifecycleTracker {
    tracked: Vec<Tracked>,
}

impl LifecycleTracker {
    #[inline]
    pub(crate) fn push(&mut self, tracked: Tracked) {
        self.tracked.push(tracked);
    }

    #[inline]
    #[must_use]
    pub(crate) fn take(&mut self) -> Vec<Tracked> {
        mem::take(&mut self.tracked)
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.tracked.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}

/// Calls cleanup for each tracked instance in LIFO order.
/// A failed cleanup doesn't stop the remaining ones.
pub(crate) fn cleanup_all(tracked: Vec<Tracked>, ctx: &Context) -> Result<(), CleanupError> {
    let errors = Errors::<CleanupErrorKind>::new();

    for Tracked {
        type_info,
        name,
        lifecycle,
    } in tracked.into_iter().rev()
    {
        match lifecycle.cleanup(ctx) {
            Ok(()) => debug!(dependency = type_info.name, name = name.as_str(), "Cleaned up"),
            Err(source) => {
                let err = CleanupErrorKind::Cleanup { type_info, name, source };
                error!("{}", err);
                errors.add(err);
            }
        }
    }

    errors.into_result()
}
