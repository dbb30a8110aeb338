use once_cell::sync::OnceCell;
use std::{collections::BTreeMap, sync::Arc};

use crate::{any::TypeInfo, instance::Instance};

/// Slot of a singleton, filled at most once.
/// Concurrent resolvers of an empty slot wait for the first one instead of creating their own instance.
pub(crate) type Slot = Arc<OnceCell<Instance>>;

/// Singleton instances keyed by the type and name they were resolved by
#[derive(Default)]
pub(crate) struct Cache {
    slots: BTreeMap<TypeInfo, BTreeMap<String, Slot>>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn get(&self, type_info: &TypeInfo, name: &str) -> Option<Slot> {
        self.slots.get(type_info).and_then(|named| named.get(name)).cloned()
    }

    pub(crate) fn get_or_insert(&mut self, type_info: TypeInfo, name: &str) -> Slot {
        let named = self.slots.entry(type_info).or_default();
        if let Some(slot) = named.get(name) {
            return slot.clone();
        }

        let slot = Slot::default();
        named.insert(name.to_owned(), slot.clone());
        slot
    }

    #[inline]
    pub(crate) fn remove(&mut self, type_info: &TypeInfo, name: &str) -> Option<Slot> {
        self.slots.get_mut(type_info).and_then(|named| named.remove(name))
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
