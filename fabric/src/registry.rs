use std::{collections::BTreeMap, sync::Arc};

use crate::{any::TypeInfo, instance::Instance, registration::Registration};

/// Converts a created instance to the type of the key it's resolved by.
/// Returns the instance back if it has an unexpected type.
pub(crate) type Projection = Arc<dyn Fn(Instance) -> Result<Instance, Instance> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) registration: Arc<Registration>,
    projection: Projection,
}

impl Binding {
    #[inline]
    #[must_use]
    pub(crate) fn new(registration: Arc<Registration>, projection: Projection) -> Self {
        Self {
            registration,
            projection,
        }
    }

    #[inline]
    pub(crate) fn project(&self, instance: Instance) -> Result<Instance, Instance> {
        (self.projection)(instance)
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    bindings: BTreeMap<TypeInfo, BTreeMap<String, Binding>>,
}

impl Registry {
    /// Returns the binding replaced by the new one, if any
    #[inline]
    pub(crate) fn insert(&mut self, type_info: TypeInfo, name: String, binding: Binding) -> Option<Binding> {
        self.bindings.entry(type_info).or_default().insert(name, binding)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, type_info: &TypeInfo, name: &str) -> Option<&Binding> {
        self.bindings.get(type_info).and_then(|named| named.get(name))
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, type_info: &TypeInfo, name: &str) -> bool {
        self.get(type_info, name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, Registry};
    use crate::{
        any::TypeInfo,
        errors::InstantiateErrorKind,
        instance::Instance,
        registration::{BoxedFactory, Registration},
        Container, Context,
    };

    use std::{collections::BTreeMap, sync::Arc};

    fn binding(name: &str) -> Binding {
        let factory: BoxedFactory =
            Arc::new(|_: &Context, _: &Container| Ok::<_, InstantiateErrorKind>(Instance::new(Arc::new(()))));
        Binding::new(
            Arc::new(Registration {
                type_info: TypeInfo::of::<()>(),
                name: name.to_owned(),
                is_singleton: false,
                factory,
                capabilities: BTreeMap::new(),
            }),
            Arc::new(|instance: Instance| Ok::<_, Instance>(instance)),
        )
    }

    #[test]
    fn test_get_by_name() {
        let mut registry = Registry::default();
        registry.insert(TypeInfo::of::<()>(), String::new(), binding(""));
        registry.insert(TypeInfo::of::<()>(), "cache".to_owned(), binding("cache"));

        assert_eq!(registry.get(&TypeInfo::of::<()>(), "").unwrap().registration.name, "");
        assert_eq!(registry.get(&TypeInfo::of::<()>(), "cache").unwrap().registration.name, "cache");
        assert!(!registry.contains(&TypeInfo::of::<()>(), "db"));
        assert!(!registry.contains(&TypeInfo::of::<u8>(), ""));
    }

    #[test]
    fn test_insert_replaces() {
        let mut registry = Registry::default();

        assert!(registry.insert(TypeInfo::of::<()>(), String::new(), binding("first")).is_none());
        let replaced = registry.insert(TypeInfo::of::<()>(), String::new(), binding("second")).unwrap();

        assert_eq!(replaced.registration.name, "first");
        assert_eq!(registry.get(&TypeInfo::of::<()>(), "").unwrap().registration.name, "second");
    }
}
