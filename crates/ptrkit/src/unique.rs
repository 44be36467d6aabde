//! Exclusive ownership with a pluggable destruction policy

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr::NonNull;

use crate::deleter::{BoxDelete, Deleter};

/// An exclusively owning pointer.
///
/// At most one `UniquePtr` ever holds a given raw pointer: the type has no
/// `Clone`, and Rust moves transfer ownership, leaving nothing behind.
/// Destruction invokes the deleter exactly once, and only when the held
/// pointer is non-null.
///
/// # Example
///
/// ```
/// use ptrkit::UniquePtr;
///
/// let mut p = UniquePtr::new(41);
/// *p += 1;
/// assert_eq!(*p, 42);
///
/// let raw = p.release();
/// assert!(p.is_empty());
/// // The caller now owns the allocation.
/// drop(unsafe { Box::from_raw(raw) });
/// ```
pub struct UniquePtr<T, D: Deleter<T> = BoxDelete> {
    ptr: Option<NonNull<T>>,
    deleter: D,
}

impl<T> UniquePtr<T> {
    /// Allocate `value` on the heap and own it.
    pub fn new(value: T) -> Self {
        // SAFETY: the pointer comes straight from Box::into_raw.
        unsafe { Self::from_raw(Box::into_raw(Box::new(value))) }
    }

    /// An empty pointer owning nothing.
    pub fn empty() -> Self {
        Self {
            ptr: None,
            deleter: BoxDelete,
        }
    }

    /// Adopt a raw pointer (null is allowed and yields an empty pointer).
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from `Box::into_raw`, and no other owner
    /// may remain.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            ptr: NonNull::new(ptr),
            deleter: BoxDelete,
        }
    }
}

impl<T, D: Deleter<T>> UniquePtr<T, D> {
    /// Adopt a raw pointer together with the deleter that will destroy it.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for `deleter`, with no other owner.
    pub unsafe fn with_deleter(ptr: *mut T, deleter: D) -> Self {
        Self {
            ptr: NonNull::new(ptr),
            deleter,
        }
    }

    /// Relinquish ownership without destruction.
    ///
    /// Returns the raw pointer (null if the pointer was empty) and leaves
    /// `self` empty. The caller becomes responsible for the allocation.
    pub fn release(&mut self) -> *mut T {
        match self.ptr.take() {
            Some(p) => p.as_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    /// Destroy the currently owned object, if any, and adopt `ptr`.
    ///
    /// # Safety
    ///
    /// Same contract as [`UniquePtr::with_deleter`] for `ptr`.
    pub unsafe fn reset(&mut self, ptr: *mut T) {
        let old = self.release();
        self.ptr = NonNull::new(ptr);
        if !old.is_null() {
            self.deleter.destroy(old);
        }
    }

    /// Destroy the currently owned object, if any, leaving the pointer empty.
    pub fn clear(&mut self) {
        let old = self.release();
        if !old.is_null() {
            // SAFETY: `old` was owned by this pointer and is destroyed once.
            unsafe { self.deleter.destroy(old) };
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
        // SAFETY: a non-null held pointer is valid by the ownership invariant.
        self.ptr.map(|p| unsafe { &*p.as_ptr() })
    }

    /// Mutably borrow the pointee, or `None` if empty.
    pub fn as_mut(&mut self) -> Option<&mut T> {
        // SAFETY: exclusive ownership makes the unique borrow sound.
        self.ptr.map(|p| unsafe { &mut *p.as_ptr() })
    }

    /// Whether the pointer currently owns nothing.
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Borrow the destruction policy.
    pub fn deleter(&self) -> &D {
        &self.deleter
    }

    /// Mutably borrow the destruction policy.
    pub fn deleter_mut(&mut self) -> &mut D {
        &mut self.deleter
    }

    /// Exchange contents (pointer and deleter) with another pointer.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.ptr, &mut other.ptr);
        std::mem::swap(&mut self.deleter, &mut other.deleter);
    }
}

impl<T, D: Deleter<T>> Drop for UniquePtr<T, D> {
    fn drop(&mut self) {
        if let Some(p) = self.ptr.take() {
            // SAFETY: this owner is unique and drops at most once.
            unsafe { self.deleter.destroy(p.as_ptr()) };
        }
    }
}

impl<T, D: Deleter<T>> Deref for UniquePtr<T, D> {
    type Target = T;

    /// Panics when the pointer is empty. See the crate-level note on the
    /// null-dereference boundary.
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(v) => v,
            None => panic!("dereferenced an empty UniquePtr"),
        }
    }
}

impl<T, D: Deleter<T>> DerefMut for UniquePtr<T, D> {
    fn deref_mut(&mut self) -> &mut T {
        match self.ptr {
            // SAFETY: exclusive ownership makes the unique borrow sound.
            Some(p) => unsafe { &mut *p.as_ptr() },
            None => panic!("dereferenced an empty UniquePtr"),
        }
    }
}

impl<T> Default for UniquePtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, D: Deleter<T>> fmt::Debug for UniquePtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(v) => f.debug_tuple("UniquePtr").field(v).finish(),
            None => f.write_str("UniquePtr(empty)"),
        }
    }
}

/// An exclusively owning heap array with indexed access.
///
/// The array-flavoured counterpart of [`UniquePtr`]: destruction releases
/// the whole allocation (boxed-slice semantics), and elements are reached
/// through `Index`/`IndexMut` rather than `Deref`.
pub struct UniqueArray<T> {
    ptr: NonNull<T>,
    len: usize,
    _owns: PhantomData<T>,
}

impl<T> UniqueArray<T> {
    /// Take ownership of the elements of `vec` as a heap array.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let len = vec.len();
        let slice = Box::into_raw(vec.into_boxed_slice());
        // SAFETY: Box::into_raw never returns null.
        let ptr = unsafe { NonNull::new_unchecked(slice as *mut T) };
        Self {
            ptr,
            len,
            _owns: PhantomData,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow element `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// The whole array as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr/len describe the owned allocation.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The whole array as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: exclusive ownership makes the unique borrow sound.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for UniqueArray<T> {
    fn drop(&mut self) {
        let slice = std::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len);
        // SAFETY: reconstructs the boxed slice produced in from_vec.
        drop(unsafe { Box::from_raw(slice) });
    }
}

impl<T> Index<usize> for UniqueArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for UniqueArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for UniqueArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
