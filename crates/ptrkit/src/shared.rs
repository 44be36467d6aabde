//! Shared ownership through a strong/weak control block

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::block::{release_strong, BlockRef, ControlBlock};
use crate::error::BadWeakPtr;
use crate::weak::WeakPtr;

/// A shared-ownership pointer.
///
/// Every clone shares one [control block](crate::SharedPtr::use_count)
/// holding the strong and weak counts. The payload is destroyed exactly
/// when the last strong owner releases it; the block survives until the
/// last [`WeakPtr`] is gone too.
///
/// # Example
///
/// ```
/// use ptrkit::SharedPtr;
///
/// let a = SharedPtr::new(String::from("shared"));
/// let b = a.clone();
/// assert_eq!(a.use_count(), 2);
/// drop(a);
/// assert_eq!(&*b, "shared");
/// ```
pub struct SharedPtr<T> {
    inner: Option<BlockRef<T>>,
}

impl<T> SharedPtr<T> {
    /// Construct the payload in place inside a fresh control block
    /// (a single allocation for value and counts).
    pub fn new(value: T) -> Self {
        let block = ControlBlock::new_inline(value);
        // SAFETY: the block was just created; its payload is live.
        let ptr = unsafe { block.as_ref().payload_ptr() };
        Self {
            inner: Some(BlockRef { ptr, block }),
        }
    }

    /// An empty pointer owning nothing.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Adopt a raw heap pointer, allocating a fresh control block with
    /// strong count 1. Null yields an empty pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from `Box::into_raw`, with no other owner
    /// remaining.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        match NonNull::new(ptr) {
            Some(ptr) => Self {
                inner: Some(BlockRef {
                    ptr,
                    block: ControlBlock::new_raw(ptr),
                }),
            },
            None => Self::empty(),
        }
    }

    /// Internal constructor for an already-incremented strong reference.
    pub(crate) fn from_block(inner: BlockRef<T>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Give up this strong reference, leaving the pointer empty.
    pub fn reset(&mut self) {
        if let Some(inner) = self.inner.take() {
            // SAFETY: this strong reference is released exactly once.
            unsafe { release_strong(inner.block) };
        }
    }

    /// The held raw pointer (null if empty). Ownership is not affected.
    pub fn get(&self) -> *mut T {
        match self.inner {
            Some(inner) => inner.ptr.as_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    /// Borrow the payload, or `None` if empty.
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: a live strong reference keeps the payload alive.
        self.inner.as_ref().map(|inner| unsafe { inner.ptr.as_ref() })
    }

    /// Whether the pointer currently owns nothing.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of strong owners of the payload (0 for an empty pointer).
    pub fn use_count(&self) -> usize {
        match &self.inner {
            // SAFETY: a live strong reference keeps the block alive.
            Some(inner) => unsafe { inner.block.as_ref().strong() },
            None => 0,
        }
    }

    /// Number of weak observers of the control block.
    pub fn weak_count(&self) -> usize {
        match &self.inner {
            // The strong owners collectively hold one bookkeeping weak
            // reference; it is not an observer.
            // SAFETY: as above.
            Some(inner) => unsafe { inner.block.as_ref().weak() - 1 },
            None => 0,
        }
    }

    /// A weak observer of the same control block. Does not extend the
    /// payload's lifetime.
    pub fn downgrade(&self) -> WeakPtr<T> {
        match self.inner {
            Some(inner) => {
                // SAFETY: a live strong reference keeps the block alive.
                unsafe { inner.block.as_ref().inc_weak() };
                WeakPtr::from_block(inner)
            }
            None => WeakPtr::empty(),
        }
    }

    /// Exchange contents with another pointer.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.inner, &mut other.inner);
    }
}

impl<T: SharedFromThis> SharedPtr<T> {
    /// Like [`SharedPtr::new`], additionally seeding the object's weak
    /// self-reference so `shared_from_this()` works afterwards.
    pub fn new_enabled(value: T) -> Self {
        let shared = Self::new(value);
        if let Some(payload) = shared.as_ref() {
            payload.self_ref().seed(shared.downgrade());
        }
        shared
    }
}

impl<T> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        if let Some(inner) = &self.inner {
            // SAFETY: a live strong reference keeps the block alive.
            unsafe { inner.block.as_ref().inc_strong() };
        }
        Self { inner: self.inner }
    }
}

impl<T> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for SharedPtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for SharedPtr<T> {
    type Target = T;

    /// Panics when the pointer is empty. See the crate-level note on the
    /// null-dereference boundary.
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(v) => v,
            None => panic!("dereferenced an empty SharedPtr"),
        }
    }
}

impl<T> PartialEq for SharedPtr<T> {
    /// Pointer identity, not payload equality.
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(v) => f.debug_tuple("SharedPtr").field(v).finish(),
            None => f.write_str("SharedPtr(empty)"),
        }
    }
}

/// The explicit-failure promotion path: expired weak references signal
/// [`BadWeakPtr`] instead of producing an empty pointer.
impl<T> TryFrom<&WeakPtr<T>> for SharedPtr<T> {
    type Error = BadWeakPtr;

    fn try_from(weak: &WeakPtr<T>) -> Result<Self, BadWeakPtr> {
        weak.upgrade().ok_or(BadWeakPtr)
    }
}

/// The weak self-reference slot embedded in a [`SharedFromThis`] object.
///
/// Starts empty; [`SharedPtr::new_enabled`] seeds it at first shared
/// ownership.
pub struct SelfRef<T> {
    weak: RefCell<WeakPtr<T>>,
}

impl<T> SelfRef<T> {
    /// An unseeded slot.
    pub fn new() -> Self {
        Self {
            weak: RefCell::new(WeakPtr::empty()),
        }
    }

    pub(crate) fn seed(&self, weak: WeakPtr<T>) {
        *self.weak.borrow_mut() = weak;
    }

    pub(crate) fn observer(&self) -> WeakPtr<T> {
        self.weak.borrow().clone()
    }
}

impl<T> Default for SelfRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SelfRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelfRef")
    }
}

/// Capability for handing out shared pointers to `self`.
///
/// Embed a [`SelfRef`] field, implement `self_ref`, and construct with
/// [`SharedPtr::new_enabled`]:
///
/// ```
/// use ptrkit::{SelfRef, SharedFromThis, SharedPtr};
///
/// struct Node {
///     this: SelfRef<Node>,
/// }
///
/// impl SharedFromThis for Node {
///     fn self_ref(&self) -> &SelfRef<Node> {
///         &self.this
///     }
/// }
///
/// let node = SharedPtr::new_enabled(Node { this: SelfRef::new() });
/// let again = node.shared_from_this().unwrap();
/// assert_eq!(node.use_count(), 2);
/// # drop(again);
/// ```
pub trait SharedFromThis: Sized {
    /// The embedded self-reference slot.
    fn self_ref(&self) -> &SelfRef<Self>;

    /// Promote the self-reference to a strong pointer.
    ///
    /// Fails with [`BadWeakPtr`] when called before any `SharedPtr` owns
    /// the object (the slot was never seeded) or after expiry.
    fn shared_from_this(&self) -> Result<SharedPtr<Self>, BadWeakPtr> {
        self.self_ref().observer().upgrade().ok_or(BadWeakPtr)
    }

    /// A weak observer of `self` (empty before seeding).
    fn weak_from_this(&self) -> WeakPtr<Self> {
        self.self_ref().observer()
    }
}
