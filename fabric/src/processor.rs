pub mod inject;

use core::cmp::Reverse;
use std::sync::Arc;

use crate::{errors::ResolveErrorKind, inject::Field, instance::Instance, Container, Context};

/// Produces values for injectable fields by their tag.
///
/// Processors are consulted in descending [`TagProcessor::priority`] order,
/// and the first one that [`TagProcessor::can_process`] the tag handles the field.
pub trait TagProcessor: Send + Sync {
    fn priority(&self) -> i32;

    fn can_process(&self, tag: &str) -> bool;

    /// Returns the value to inject, `None` leaves the field empty.
    ///
    /// # Errors
    /// A failure aborts the creation of the injectable
    fn process(
        &self,
        ctx: &Context,
        container: &Container,
        field: &Field,
        tag: &str,
    ) -> Result<Option<Instance>, ResolveErrorKind>;
}

/// Processors ordered by descending priority.
/// Processors with equal priority keep their registration order.
#[derive(Clone, Default)]
pub(crate) struct TagProcessors {
    processors: Vec<Arc<dyn TagProcessor>>,
}

impl TagProcessors {
    pub(crate) fn add(&mut self, processor: Arc<dyn TagProcessor>) {
        self.processors.push(processor);
        self.processors.sort_by_key(|processor| Reverse(processor.priority()));
    }

    #[must_use]
    pub(crate) fn find(&self, tag: &str) -> Option<Arc<dyn TagProcessor>> {
        self.processors
            .iter()
            .find(|processor| processor.can_process(tag))
            .cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn has_processor_for(&self, tag: &str) -> bool {
        self.processors.iter().any(|processor| processor.can_process(tag))
    }
}
