use std::{collections::BTreeMap, sync::Arc};

use crate::{
    any::TypeInfo,
    errors::{Errors, InstantiateErrorKind, RegisterErrorKind},
    instance::Instance,
    processor::TagProcessors,
    registration::TypedFactory,
    Container, Context,
};

/// Injectable field of a struct
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    /// Type resolved for the field, for `Arc<T>` and `Option<Arc<T>>` it's `T`
    pub type_info: TypeInfo,
    pub tag: &'static str,
}

impl Field {
    #[inline]
    #[must_use]
    pub fn new<F: InjectField>(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            type_info: F::type_info(),
            tag,
        }
    }
}

/// Type that can be created by injecting its tagged fields.
///
/// Usually derived with `#[derive(Injectable)]`:
/// ```
/// use fabric::{Container, Context, Injectable};
/// use std::sync::Arc;
///
/// #[derive(Injectable)]
/// struct Service {
///     #[fabric(tag = "inject:primary")]
///     dsn: Arc<String>,
///     requests: u64,
/// }
///
/// let container = Container::new();
/// container
///     .register_with::<String>(|options| options.named("primary").with_instance("postgres://localhost".to_owned()))
///     .unwrap();
/// container.register_injectable::<Service>(|options| options).unwrap();
///
/// let service = container.resolve::<Service>(&Context::new()).unwrap();
/// assert_eq!(*service.dsn, "postgres://localhost");
/// assert_eq!(service.requests, 0);
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Tagged fields, in the order they're processed
    fn fields() -> Vec<Field>;

    /// # Errors
    /// Returns an error if a field value is missing or has an unexpected type
    fn inject(injected: &mut Injected) -> Result<Self, InstantiateErrorKind>;
}

/// Values produced by tag processors for the fields of an injectable
#[derive(Default)]
pub struct Injected {
    values: BTreeMap<&'static str, Option<Instance>>,
}

impl Injected {
    #[inline]
    pub(crate) fn insert(&mut self, field: &'static str, value: Option<Instance>) {
        self.values.insert(field, value);
    }

    /// # Errors
    /// Returns an error if the field type doesn't accept the produced value
    #[inline]
    pub fn take<F: InjectField>(&mut self, field: &'static str) -> Result<F, InstantiateErrorKind> {
        F::from_instance(field, self.values.remove(field).flatten())
    }
}

/// Type of an injectable field
pub trait InjectField: Sized {
    fn type_info() -> TypeInfo;

    /// # Errors
    /// Returns an error if the value is required but missing, or has an unexpected type
    fn from_instance(field: &'static str, instance: Option<Instance>) -> Result<Self, InstantiateErrorKind>;
}

impl<T> InjectField for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn from_instance(field: &'static str, instance: Option<Instance>) -> Result<Self, InstantiateErrorKind> {
        let instance = instance.ok_or(InstantiateErrorKind::MissingField { field })?;
        instance.downcast().ok_or_else(|| InstantiateErrorKind::IncorrectFieldType {
            field,
            expected: TypeInfo::of::<T>(),
            actual: instance.type_info(),
        })
    }
}

impl<T> InjectField for Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    #[inline]
    fn type_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn from_instance(field: &'static str, instance: Option<Instance>) -> Result<Self, InstantiateErrorKind> {
        match instance {
            Some(instance) => Arc::<T>::from_instance(field, Some(instance)).map(Some),
            None => Ok(None),
        }
    }
}

/// Adds an error for each field that no processor can handle
pub(crate) fn validate_fields<T: Injectable>(
    processors: &TagProcessors,
    fields: &[Field],
    errors: &Errors<RegisterErrorKind>,
) {
    for field in fields {
        if !processors.has_processor_for(field.tag) {
            errors.add(RegisterErrorKind::NoProcessor {
                type_info: TypeInfo::of::<T>(),
                field: field.name,
                tag: field.tag,
            });
        }
    }
}

/// Factory creating `T` from the values the container's tag processors produce for its fields
pub(crate) fn factory<T: Injectable>(fields: Vec<Field>) -> TypedFactory<T> {
    Arc::new(move |ctx: &Context, container: &Container| {
        let mut injected = Injected::default();
        for field in &fields {
            let value = container
                .process_field(ctx, field)
                .map_err(|err| InstantiateErrorKind::Field {
                    field: field.name,
                    source: Box::new(err),
                })?;
            injected.insert(field.name, value);
        }
        T::inject(&mut injected).map(Arc::new)
    })
}
