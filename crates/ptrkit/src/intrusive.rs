//! Shared ownership with the count embedded in the pointee

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::deleter::{BoxDelete, Deleter};

/// The embedded reference counter mixin.
///
/// A type opts into intrusive counting by owning one of these and
/// implementing [`Refcount`]. Starts at zero; the first
/// [`IntrusivePtr`] pointing at the object brings it to one.
#[derive(Debug, Default)]
pub struct RefCounter {
    count: Cell<usize>,
}

impl RefCounter {
    /// A counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    fn inc(&self) {
        self.count.set(self.count.get() + 1);
    }

    /// Decrement, returning the new value.
    fn dec(&self) -> usize {
        let n = self.count.get() - 1;
        self.count.set(n);
        n
    }
}

/// Capability required of an [`IntrusivePtr`] pointee: expose the
/// embedded [`RefCounter`].
pub trait Refcount {
    /// The embedded counter.
    fn counter(&self) -> &RefCounter;
}

/// A shared-ownership pointer whose count lives inside the pointee.
///
/// Copying and dropping manipulate the embedded [`RefCounter`] directly;
/// when the count returns to zero the compile-time-selected deleter
/// destroys the object.
///
/// # Example
///
/// ```
/// use ptrkit::{make_intrusive, IntrusivePtr, RefCounter, Refcount};
///
/// struct Widget {
///     refs: RefCounter,
///     size: u32,
/// }
///
/// impl Refcount for Widget {
///     fn counter(&self) -> &RefCounter {
///         &self.refs
///     }
/// }
///
/// let a = make_intrusive(Widget { refs: RefCounter::new(), size: 3 });
/// let b = a.clone();
/// assert_eq!(a.use_count(), 2);
/// assert_eq!(b.size, 3);
/// ```
pub struct IntrusivePtr<T: Refcount, D: Deleter<T> = BoxDelete> {
    ptr: Option<NonNull<T>>,
    deleter: D,
    _owns: PhantomData<T>,
}

impl<T: Refcount> IntrusivePtr<T> {
    /// Allocate `value` on the heap and take the first reference.
    pub fn new(value: T) -> Self {
        // SAFETY: the pointer comes straight from Box::into_raw.
        unsafe { Self::from_raw(Box::into_raw(Box::new(value))) }
    }

    /// An empty pointer referring to nothing.
    pub fn empty() -> Self {
        Self {
            ptr: None,
            deleter: BoxDelete,
            _owns: PhantomData,
        }
    }

    /// Adopt a raw pointer, incrementing its embedded count. Null yields
    /// an empty pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live allocation compatible with the default
    /// deleter ([`BoxDelete`]).
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self::from_raw_with_deleter(ptr, BoxDelete)
    }
}

impl<T: Refcount, D: Deleter<T>> IntrusivePtr<T, D> {
    /// Adopt a raw pointer with an explicit destruction policy.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live allocation compatible with `deleter`.
    pub unsafe fn from_raw_with_deleter(ptr: *mut T, deleter: D) -> Self {
        let ptr = NonNull::new(ptr);
        if let Some(p) = ptr {
            p.as_ref().counter().inc();
        }
        Self {
            ptr,
            deleter,
            _owns: PhantomData,
        }
    }

    /// Give up this reference; the deleter runs if it was the last one.
    pub fn reset(&mut self) {
        if let Some(p) = self.ptr.take() {
            // SAFETY: this reference was counted in and releases once.
            unsafe {
                if p.as_ref().counter().dec() == 0 {
                    self.deleter.destroy(p.as_ptr());
                }
            }
        }
    }

    /// The held raw pointer (null if empty). Ownership is not affected.
    pub fn get(&self) -> *mut T {
        match self.ptr {
            Some(p) => p.as_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    /// Borrow the pointee, or `None` if empty.
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: a counted reference keeps the pointee alive.
        self.ptr.map(|p| unsafe { &*p.as_ptr() })
    }

    /// Whether the pointer currently refers to nothing.
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// The embedded count (0 for an empty pointer).
    pub fn use_count(&self) -> usize {
        match self.as_ref() {
            Some(v) => v.counter().count(),
            None => 0,
        }
    }

    /// Exchange pointees with another pointer sharing the deleter type.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.ptr, &mut other.ptr);
        std::mem::swap(&mut self.deleter, &mut other.deleter);
    }
}

impl<T: Refcount, D: Deleter<T> + Clone> Clone for IntrusivePtr<T, D> {
    fn clone(&self) -> Self {
        if let Some(p) = self.ptr {
            // SAFETY: a counted reference keeps the pointee alive.
            unsafe { p.as_ref().counter().inc() };
        }
        Self {
            ptr: self.ptr,
            deleter: self.deleter.clone(),
            _owns: PhantomData,
        }
    }
}

impl<T: Refcount, D: Deleter<T>> Drop for IntrusivePtr<T, D> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: Refcount> Default for IntrusivePtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Refcount, D: Deleter<T>> Deref for IntrusivePtr<T, D> {
    type Target = T;

    /// Panics when the pointer is empty. See the crate-level note on the
    /// null-dereference boundary.
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(v) => v,
            None => panic!("dereferenced an empty IntrusivePtr"),
        }
    }
}

impl<T: Refcount + fmt::Debug, D: Deleter<T>> fmt::Debug for IntrusivePtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(v) => f.debug_tuple("IntrusivePtr").field(v).finish(),
            None => f.write_str("IntrusivePtr(empty)"),
        }
    }
}

/// Allocate `value` and wrap it in an [`IntrusivePtr`] in one step.
pub fn make_intrusive<T: Refcount>(value: T) -> IntrusivePtr<T> {
    IntrusivePtr::new(value)
}
