use std::{collections::BTreeMap, sync::Arc};

use crate::{
    any::TypeInfo,
    errors::{Errors, InstantiateErrorKind, RegisterError, RegisterErrorKind},
    instance::Instance,
    lifecycle::Lifecycle,
    registry::{Binding, Projection},
    Container, Context,
};

pub(crate) type BoxedFactory = Arc<dyn Fn(&Context, &Container) -> Result<Instance, InstantiateErrorKind> + Send + Sync>;

pub(crate) type TypedFactory<T> = Arc<dyn Fn(&Context, &Container) -> Result<Arc<T>, InstantiateErrorKind> + Send + Sync>;

/// One registered implementation.
/// Shared by every registry key it is reachable from and never mutated after registration.
pub(crate) struct Registration {
    pub(crate) type_info: TypeInfo,
    pub(crate) name: String,
    pub(crate) is_singleton: bool,
    pub(crate) factory: BoxedFactory,
    pub(crate) capabilities: BTreeMap<TypeInfo, Vec<String>>,
}

struct CapabilityBinding {
    type_info: TypeInfo,
    name: String,
    projection: Projection,
}

/// Options of a registration, applied in call order.
///
/// A failing option doesn't stop the following ones: all failures are reported together
/// when the registration is built.
///
/// ## Options
/// - [`Self::named`]: name of the registration under its concrete type, empty by default
/// - [`Self::as_singleton`]: create the instance once per resolved type and name
/// - [`Self::as_factory`]: custom factory, overrides the synthesized one
/// - [`Self::with_instance`]: factory returning the passed value
/// - [`Self::with_capability`], [`Self::with_named_capability`]: make the registration resolvable by a trait object
/// - [`Self::managed`]: call [`Lifecycle`] hooks for created instances
pub struct RegistrationOptions<T> {
    name: String,
    is_singleton: bool,
    pub(crate) factory: Option<TypedFactory<T>>,
    wrap: fn(Arc<T>) -> Instance,
    capabilities: Vec<CapabilityBinding>,
    pub(crate) errors: Errors<RegisterErrorKind>,
}

impl<T> RegistrationOptions<T>
where
    T: Send + Sync + 'static,
{
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
            is_singleton: false,
            factory: None,
            wrap: Instance::new::<T>,
            capabilities: Vec::new(),
            errors: Errors::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The instance will be created once and cached for each type and name it's resolved by.
    /// Without it, every resolution creates a new instance.
    #[inline]
    #[must_use]
    pub fn as_singleton(mut self) -> Self {
        self.is_singleton = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn as_factory<F>(self, factory: F) -> Self
    where
        F: Fn(&Context, &Container) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        self.set_factory(Arc::new(move |ctx: &Context, container: &Container| {
            factory(ctx, container).map(Arc::new)
        }))
    }

    /// Every resolution returns the passed value.
    ///
    /// # Warning
    /// It isn't a singleton: lifecycle hooks and middlewares run on each resolution,
    /// unless [`Self::as_singleton`] is set too.
    #[inline]
    #[must_use]
    pub fn with_instance(self, instance: T) -> Self {
        let instance = Arc::new(instance);
        self.set_factory(Arc::new(move |_: &Context, _: &Container| Ok(instance.clone())))
    }

    /// Makes the registration resolvable by `I` with the empty name.
    /// `cast` converts the concrete instance, usually it's just `|value| value`.
    #[inline]
    #[must_use]
    pub fn with_capability<I>(self, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.with_named_capability(String::new(), cast)
    }

    /// Makes the registration resolvable by `I` with the passed name.
    #[must_use]
    pub fn with_named_capability<I>(mut self, name: impl Into<String>, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let capability = TypeInfo::of::<I>();
        let name = name.into();

        if self
            .capabilities
            .iter()
            .any(|binding| binding.type_info == capability && binding.name == name)
        {
            self.errors.add(RegisterErrorKind::DuplicateCapability {
                type_info: TypeInfo::of::<T>(),
                capability,
                name,
            });
            return self;
        }

        self.capabilities.push(CapabilityBinding {
            type_info: capability,
            name,
            projection: Arc::new(move |instance: Instance| match instance.downcast::<T>() {
                Some(value) => Ok(instance.cast(cast(value))),
                None => Err(instance),
            }),
        });
        self
    }

    fn set_factory(mut self, factory: TypedFactory<T>) -> Self {
        if self.factory.is_some() {
            self.errors.add(RegisterErrorKind::DuplicateFactory {
                type_info: TypeInfo::of::<T>(),
            });
        } else {
            self.factory = Some(factory);
        }
        self
    }

    /// Builds the registration and the bindings to insert: the concrete one first, then one per capability.
    pub(crate) fn build(self) -> Result<Vec<(TypeInfo, String, Binding)>, RegisterError> {
        let type_info = TypeInfo::of::<T>();
        let Self {
            name,
            is_singleton,
            factory,
            wrap,
            capabilities,
            errors,
        } = self;

        let Some(factory) = factory else {
            errors.add(RegisterErrorKind::NoFactory { type_info });
            return errors.into_result().map(|()| Vec::new());
        };
        errors.into_result()?;

        let mut capability_names: BTreeMap<TypeInfo, Vec<String>> = BTreeMap::new();
        for binding in &capabilities {
            capability_names.entry(binding.type_info).or_default().push(binding.name.clone());
        }

        let registration = Arc::new(Registration {
            type_info,
            name: name.clone(),
            is_singleton,
            factory: Arc::new(move |ctx: &Context, container: &Container| factory(ctx, container).map(wrap)),
            capabilities: capability_names,
        });

        let mut bindings = Vec::with_capacity(capabilities.len() + 1);
        bindings.push((
            type_info,
            name,
            Binding::new(
                registration.clone(),
                Arc::new(|instance: Instance| if instance.is::<T>() { Ok(instance) } else { Err(instance) }),
            ),
        ));
        for CapabilityBinding {
            type_info,
            name,
            projection,
        } in capabilities
        {
            bindings.push((type_info, name, Binding::new(registration.clone(), projection)));
        }

        Ok(bindings)
    }
}

impl<T> RegistrationOptions<T>
where
    T: Lifecycle + 'static,
{
    /// Created instances will be initialized before they're returned or cached,
    /// and cleaned up on container teardown.
    #[inline]
    #[must_use]
    pub fn managed(mut self) -> Self {
        self.wrap = Instance::managed::<T>;
        self
    }
}
