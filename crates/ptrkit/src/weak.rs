//! Weak observation of shared ownership

use std::fmt;

use crate::block::{release_weak, BlockRef};
use crate::shared::SharedPtr;

/// A non-owning observer of a [`SharedPtr`]'s control block.
///
/// A `WeakPtr` never keeps the payload alive. It can be promoted back to a
/// strong pointer with [`upgrade`](WeakPtr::upgrade) only while at least
/// one strong owner remains; afterwards promotion fails, immediately and
/// permanently.
///
/// # Example
///
/// ```
/// use ptrkit::SharedPtr;
///
/// let strong = SharedPtr::new(7);
/// let weak = strong.downgrade();
/// assert_eq!(*weak.upgrade().unwrap(), 7);
///
/// drop(strong);
/// assert!(weak.expired());
/// assert!(weak.upgrade().is_none());
/// ```
pub struct WeakPtr<T> {
    inner: Option<BlockRef<T>>,
}

impl<T> WeakPtr<T> {
    /// An empty observer referring to nothing.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Internal constructor for an already-incremented weak reference.
    pub(crate) fn from_block(inner: BlockRef<T>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Number of strong owners currently keeping the payload alive.
    pub fn use_count(&self) -> usize {
        match &self.inner {
            // SAFETY: a live weak reference keeps the block alive.
            Some(inner) => unsafe { inner.block.as_ref().strong() },
            None => 0,
        }
    }

    /// Whether the payload has already been destroyed (or was never owned).
    pub fn expired(&self) -> bool {
        self.use_count() == 0
    }

    /// Promote to a strong pointer, or `None` if the payload is gone.
    ///
    /// The check and the strong-count increment are one step from the
    /// caller's perspective; with a single thread no owner can disappear
    /// in between.
    pub fn upgrade(&self) -> Option<SharedPtr<T>> {
        let inner = self.inner?;
        // SAFETY: a live weak reference keeps the block alive.
        let block = unsafe { inner.block.as_ref() };
        if block.strong() == 0 {
            return None;
        }
        block.inc_strong();
        Some(SharedPtr::from_block(inner))
    }

    /// Give up this weak reference, leaving the observer empty.
    pub fn reset(&mut self) {
        if let Some(inner) = self.inner.take() {
            // SAFETY: this weak reference is released exactly once.
            unsafe { release_weak(inner.block) };
        }
    }

    /// Exchange contents with another observer.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.inner, &mut other.inner);
    }
}

impl<T> Clone for WeakPtr<T> {
    fn clone(&self) -> Self {
        if let Some(inner) = &self.inner {
            // SAFETY: a live weak reference keeps the block alive.
            unsafe { inner.block.as_ref().inc_weak() };
        }
        Self { inner: self.inner }
    }
}

impl<T> Drop for WeakPtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for WeakPtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<&SharedPtr<T>> for WeakPtr<T> {
    /// Demote a strong pointer to an observer.
    fn from(shared: &SharedPtr<T>) -> Self {
        shared.downgrade()
    }
}

impl<T> fmt::Debug for WeakPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expired() {
            f.write_str("WeakPtr(expired)")
        } else {
            write!(f, "WeakPtr(use_count = {})", self.use_count())
        }
    }
}
