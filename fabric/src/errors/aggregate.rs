use core::fmt::{self, Debug, Display, Formatter};
use parking_lot::Mutex;
use std::{error::Error, slice, vec};

/// Thread-safe accumulator of errors.
///
/// Used where every failure must be reported instead of only the first one,
/// e.g. registration options and container cleanup.
pub struct Errors<E> {
    errors: Mutex<Vec<E>>,
}

impl<E> Default for Errors<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Errors<E> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            errors: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    pub fn add(&self, err: E) {
        self.errors.lock().push(err);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// # Errors
    /// Returns all accumulated errors joined if at least one was added
    pub fn into_result(self) -> Result<(), JoinedError<E>> {
        let errors = self.errors.into_inner();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(JoinedError { errors })
        }
    }
}

impl<E> Debug for Errors<E>
where
    E: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Errors").field("errors", &*self.errors.lock()).finish()
    }
}

/// Non-empty set of errors displayed one per line.
#[derive(Debug)]
pub struct JoinedError<E> {
    errors: Vec<E>,
}

impl<E> JoinedError<E> {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.errors.iter()
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<E> {
        self.errors
    }
}

impl<E> Display for JoinedError<E>
where
    E: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, err) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            Display::fmt(err, f)?;
        }
        Ok(())
    }
}

impl<E> Error for JoinedError<E> where E: Error {}

impl<E> IntoIterator for JoinedError<E> {
    type Item = E;
    type IntoIter = vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a JoinedError<E> {
    type Item = &'a E;
    type IntoIter = slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
