use std::sync::Arc;

use crate::{any::TypeInfo, instance::Instance, Context};

/// Post-creation hook applied to every created instance before it's initialized or cached.
///
/// Middlewares run in registration order, each one gets the output of the previous one.
/// A middleware may return the instance as is or a decorated one (see [`Instance::replace`]),
/// but the result must still have the type it's resolved by.
/// Lifecycle hooks run on the returned instance, so a decorated value is only managed
/// if a handle is attached with [`Instance::with_lifecycle`].
pub trait Middleware: Send + Sync {
    /// # Errors
    /// A failure aborts the resolution
    fn process(&self, ctx: &Context, type_info: TypeInfo, instance: Instance) -> anyhow::Result<Instance>;
}

impl<F> Middleware for F
where
    F: Fn(&Context, TypeInfo, Instance) -> anyhow::Result<Instance> + Send + Sync,
{
    #[inline]
    fn process(&self, ctx: &Context, type_info: TypeInfo, instance: Instance) -> anyhow::Result<Instance> {
        self(ctx, type_info, instance)
    }
}

pub(crate) fn apply(
    middlewares: &[Arc<dyn Middleware>],
    ctx: &Context,
    type_info: TypeInfo,
    instance: Instance,
) -> anyhow::Result<Instance> {
    middlewares
        .iter()
        .try_fold(instance, |instance, middleware| middleware.process(ctx, type_info, instance))
}
