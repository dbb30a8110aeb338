use core::any::type_name;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    cache::{Cache, Slot},
    context::Context,
    errors::{CleanupError, Errors, InstantiateErrorKind, RegisterError, RegisterErrorKind, ResolveErrorKind},
    guard::ResolutionGuard,
    inject::{self, Field, Injectable},
    instance::Instance,
    lifecycle::{self, LifecycleTracker, Tracked},
    middleware::{self, Middleware},
    processor::{inject::InjectTagProcessor, TagProcessor, TagProcessors},
    registration::{RegistrationOptions, TypedFactory},
    registry::{Binding, Registry},
};

#[derive(Default)]
pub(crate) struct State {
    registry: Registry,
    cache: Cache,
    lifecycles: LifecycleTracker,
    middlewares: Vec<Arc<dyn Middleware>>,
    processors: TagProcessors,
}

pub(crate) struct ContainerInner {
    state: RwLock<State>,
}

/// Registry and resolver of dependencies.
///
/// Cloning is cheap and the clones share the registrations, singletons and tracked instances.
/// Separate containers created with [`Container::new`] share nothing.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with [`InjectTagProcessor`] registered
    #[must_use]
    pub fn new() -> Self {
        let mut state = State::default();
        state.processors.add(Arc::new(InjectTagProcessor));

        Self {
            inner: Arc::new(ContainerInner {
                state: RwLock::new(state),
            }),
        }
    }

    /// Registers `T`, created with [`Default`] unless another factory is specified.
    ///
    /// # Errors
    /// Returns all invalid options of the registration
    pub fn register<T>(
        &self,
        configure: impl FnOnce(RegistrationOptions<T>) -> RegistrationOptions<T>,
    ) -> Result<(), RegisterError>
    where
        T: Default + Send + Sync + 'static,
    {
        self.register_inner(configure, |_, _| {
            Some(Arc::new(|_: &Context, _: &Container| {
                Ok::<_, InstantiateErrorKind>(Arc::new(T::default()))
            }))
        })
    }

    /// Registers `T`, created by injecting its tagged fields unless another factory is specified.
    /// In the latter case tags aren't validated, since they're never processed.
    ///
    /// # Errors
    /// Returns all invalid options of the registration,
    /// including fields whose tags can't be handled by any registered processor
    pub fn register_injectable<T>(
        &self,
        configure: impl FnOnce(RegistrationOptions<T>) -> RegistrationOptions<T>,
    ) -> Result<(), RegisterError>
    where
        T: Injectable,
    {
        self.register_inner(configure, |state, errors| {
            let fields = T::fields();
            inject::validate_fields::<T>(&state.processors, &fields, errors);
            Some(inject::factory::<T>(fields))
        })
    }

    /// Registers `T` that can only be created by a factory specified in the options.
    ///
    /// # Errors
    /// Returns all invalid options of the registration, including the missing factory
    pub fn register_with<T>(
        &self,
        configure: impl FnOnce(RegistrationOptions<T>) -> RegistrationOptions<T>,
    ) -> Result<(), RegisterError>
    where
        T: Send + Sync + 'static,
    {
        self.register_inner(configure, |_, _| None)
    }

    fn register_inner<T>(
        &self,
        configure: impl FnOnce(RegistrationOptions<T>) -> RegistrationOptions<T>,
        fallback: impl FnOnce(&State, &Errors<RegisterErrorKind>) -> Option<TypedFactory<T>>,
    ) -> Result<(), RegisterError>
    where
        T: Send + Sync + 'static,
    {
        let span = info_span!("register", dependency = type_name::<T>());
        let _guard = span.enter();

        let mut options = configure(RegistrationOptions::new());

        let mut state = self.inner.state.write();
        if options.factory.is_none() {
            options.factory = fallback(&state, &options.errors);
        }

        let bindings = match options.build() {
            Ok(bindings) => bindings,
            Err(err) => {
                error!("{}", err);
                return Err(err);
            }
        };
        for (type_info, name, binding) in bindings {
            if state.registry.insert(type_info, name.clone(), binding).is_some() {
                state.cache.remove(&type_info, &name);
                debug!(key = type_info.name, name = name.as_str(), "Replaced previous registration");
            }
            debug!(key = type_info.name, name = name.as_str(), "Registered");
        }

        Ok(())
    }

    /// Resolves `T` registered with the empty name
    ///
    /// # Errors
    /// See [`Self::resolve_by_type`]
    #[inline]
    pub fn resolve<T>(&self, ctx: &Context) -> Result<Arc<T>, ResolveErrorKind>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_named(ctx, "")
    }

    /// Resolves `T` by concrete type or capability.
    ///
    /// # Errors
    /// See [`Self::resolve_by_type`]
    pub fn resolve_named<T>(&self, ctx: &Context, name: &str) -> Result<Arc<T>, ResolveErrorKind>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_by_type(ctx, TypeInfo::of::<T>(), name)?;
        instance.downcast().ok_or_else(|| {
            let err = ResolveErrorKind::IncorrectType {
                expected: TypeInfo::of::<T>(),
                actual: instance.type_info(),
                name: name.to_owned(),
            };
            error!("{}", err);
            err
        })
    }

    /// Resolves a type-erased instance.
    ///
    /// Singletons are returned from the cache, or created once per type and name,
    /// even if several threads resolve them at the same time.
    /// Other registrations are created on each call.
    ///
    /// Creation runs the factory, middlewares, and [`crate::Lifecycle::init`] of managed instances.
    /// Nothing is cached or tracked if any of them fails.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NoRegistration`] if nothing is registered by the type and name
    /// - [`ResolveErrorKind::CyclicDependency`] if the dependency is resolved while being created
    /// - Other errors if creation fails
    pub fn resolve_by_type(&self, ctx: &Context, type_info: TypeInfo, name: &str) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("resolve", dependency = type_info.name, name);
        let _guard = span.enter();

        let (binding, slot) = loop {
            let (binding, slot) = {
                let state = self.inner.state.read();
                let Some(binding) = state.registry.get(&type_info, name).cloned() else {
                    let err = ResolveErrorKind::NoRegistration {
                        type_info,
                        name: name.to_owned(),
                    };
                    error!("{}", err);
                    return Err(err);
                };
                let slot = if binding.registration.is_singleton {
                    state.cache.get(&type_info, name)
                } else {
                    None
                };
                (binding, slot)
            };

            if !binding.registration.is_singleton {
                let _resolving = self.enter(type_info, name)?;
                return self.create(ctx, type_info, name, &binding);
            }

            if let Some(slot) = slot.or_else(|| self.slot_for(type_info, name, &binding)) {
                break (binding, slot);
            }
            debug!("Registration replaced while resolving, retrying");
        };

        if let Some(instance) = slot.get() {
            debug!("Found in cache");
            return Ok(instance.clone());
        }
        debug!("Not found in cache");

        let _resolving = self.enter(type_info, name)?;
        let instance = slot.get_or_try_init(|| self.create(ctx, type_info, name, &binding))?;
        Ok(instance.clone())
    }

    /// Checks whether `T` is registered with the name, by concrete type or capability
    #[must_use]
    pub fn is_registered<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.inner.state.read().registry.contains(&TypeInfo::of::<T>(), name)
    }

    /// Adds a middleware applied after the already added ones.
    /// Instances created before aren't affected.
    pub fn add_middleware(&self, middleware: impl Middleware + 'static) {
        self.inner.state.write().middlewares.push(Arc::new(middleware));
        debug!("Middleware added");
    }

    /// Adds a tag processor to the chain used by subsequent registrations and resolutions
    pub fn add_tag_processor(&self, processor: impl TagProcessor + 'static) {
        let priority = processor.priority();
        self.inner.state.write().processors.add(Arc::new(processor));
        debug!(priority, "Tag processor added");
    }

    /// Cleans up managed instances in reverse order of their initialization and clears the singleton cache,
    /// so singletons resolved afterwards are created again.
    ///
    /// # Warning
    /// Instances initialized by resolutions racing with this call may be left untracked.
    ///
    /// # Errors
    /// Returns the failures of all instances that failed to clean up
    pub fn cleanup(&self, ctx: &Context) -> Result<(), CleanupError> {
        let tracked = {
            let mut state = self.inner.state.write();
            state.cache.clear();
            state.lifecycles.take()
        };
        debug!(count = tracked.len(), "Cleaning up");

        lifecycle::cleanup_all(tracked, ctx)
    }

    /// Produces the value of an injectable field with the first processor that accepts its tag
    pub(crate) fn process_field(&self, ctx: &Context, field: &Field) -> Result<Option<Instance>, ResolveErrorKind> {
        let processor = self.inner.state.read().processors.find(field.tag);
        let Some(processor) = processor else {
            let err = ResolveErrorKind::NoProcessor {
                field: field.name,
                tag: field.tag.to_owned(),
            };
            error!("{}", err);
            return Err(err);
        };

        processor.process(ctx, self, field, field.tag)
    }

    /// Returns the singleton slot of the key, or `None` if the binding is no longer registered by it.
    /// A slot filled from a replaced registration would shadow the new one.
    fn slot_for(&self, type_info: TypeInfo, name: &str, binding: &Binding) -> Option<Slot> {
        let mut state = self.inner.state.write();
        let current = state.registry.get(&type_info, name)?;
        if !Arc::ptr_eq(&current.registration, &binding.registration) {
            return None;
        }
        Some(state.cache.get_or_insert(type_info, name))
    }

    fn enter(&self, type_info: TypeInfo, name: &str) -> Result<ResolutionGuard, ResolveErrorKind> {
        ResolutionGuard::enter(Arc::as_ptr(&self.inner) as usize, type_info, name).map_err(|err| {
            error!("{}", err);
            err
        })
    }

    fn create(&self, ctx: &Context, type_info: TypeInfo, name: &str, binding: &Binding) -> Result<Instance, ResolveErrorKind> {
        let registration = &binding.registration;

        let instance = match (registration.factory)(ctx, self) {
            Ok(instance) => instance,
            Err(source) => {
                let err = ResolveErrorKind::Instantiate {
                    type_info,
                    name: name.to_owned(),
                    source,
                };
                error!("{}", err);
                return Err(err);
            }
        };
        debug!(
            concrete = registration.type_info.name,
            registered_name = registration.name.as_str(),
            capabilities = registration.capabilities.len(),
            "Instantiated"
        );

        let instance = match binding.project(instance) {
            Ok(instance) => instance,
            Err(instance) => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: type_info,
                    actual: instance.type_info(),
                    name: name.to_owned(),
                };
                error!("{}", err);
                return Err(err);
            }
        };

        let middlewares = self.inner.state.read().middlewares.clone();
        let instance = match middleware::apply(&middlewares, ctx, type_info, instance) {
            Ok(instance) => instance,
            Err(source) => {
                let err = ResolveErrorKind::Middleware {
                    type_info,
                    name: name.to_owned(),
                    source,
                };
                error!("{}", err);
                return Err(err);
            }
        };
        if !middlewares.is_empty() {
            debug!(count = middlewares.len(), "Middlewares applied");
        }
        if instance.type_info() != type_info {
            let err = ResolveErrorKind::IncorrectType {
                expected: type_info,
                actual: instance.type_info(),
                name: name.to_owned(),
            };
            error!("Middleware changed the type: {}", err);
            return Err(err);
        }

        if let Some(lifecycle) = instance.lifecycle() {
            if let Err(source) = lifecycle.init(ctx) {
                let err = ResolveErrorKind::Init {
                    type_info,
                    name: name.to_owned(),
                    source,
                };
                error!("{}", err);
                return Err(err);
            }
            let tracked = {
                let mut state = self.inner.state.write();
                state.lifecycles.push(Tracked {
                    type_info,
                    name: name.to_owned(),
                    lifecycle: lifecycle.clone(),
                });
                state.lifecycles.len()
            };
            debug!(tracked, "Initialized");
        }

        Ok(instance)
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        let lifecycles = &mut self.state.get_mut().lifecycles;
        if lifecycles.is_empty() {
            return;
        }

        if lifecycle::cleanup_all(lifecycles.take(), &Context::new()).is_err() {
            error!("Cleanup on drop finished with errors");
        }
        debug!("Container cleaned up on drop");
    }
}
