use std::{cell::RefCell, collections::HashSet};

use crate::{any::TypeInfo, errors::ResolveErrorKind};

#[derive(Clone, PartialEq, Eq, Hash)]
struct Key {
    container: usize,
    type_info: TypeInfo,
    name: String,
}

thread_local! {
    static RESOLVING: RefCell<HashSet<Key>> = RefCell::new(HashSet::new());
}

/// Marks a dependency as being created on the current thread until dropped.
///
/// Entering the same dependency twice on one thread means the factory depends on itself,
/// which would otherwise recurse forever or block on its own singleton slot.
/// Cycles spanning several threads aren't detected.
pub(crate) struct ResolutionGuard {
    key: Key,
}

impl ResolutionGuard {
    pub(crate) fn enter(container: usize, type_info: TypeInfo, name: &str) -> Result<Self, ResolveErrorKind> {
        let key = Key {
            container,
            type_info,
            name: name.to_owned(),
        };

        let inserted = RESOLVING.with(|resolving| resolving.borrow_mut().insert(key.clone()));
        if inserted {
            Ok(Self { key })
        } else {
            Err(ResolveErrorKind::CyclicDependency {
                type_info,
                name: key.name,
            })
        }
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|resolving| {
            resolving.borrow_mut().remove(&self.key);
        });
    }
}
