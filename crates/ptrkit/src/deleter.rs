//! Destruction policies shared by the pointer families

/// A destruction policy for raw-pointer owners.
///
/// [`UniquePtr`](crate::UniquePtr) and [`IntrusivePtr`](crate::IntrusivePtr)
/// are generic over a `Deleter`, selected at compile time. The default,
/// [`BoxDelete`], assumes the pointer came from `Box::into_raw`.
pub trait Deleter<T> {
    /// Destroy the pointee and release its storage.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, valid for the allocation scheme this deleter
    /// expects, and must not be destroyed again afterwards.
    unsafe fn destroy(&mut self, ptr: *mut T);
}

/// Default policy: reconstruct and drop the `Box` the pointer came from.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxDelete;

impl<T> Deleter<T> for BoxDelete {
    unsafe fn destroy(&mut self, ptr: *mut T) {
        drop(Box::from_raw(ptr));
    }
}

/// Adapter turning a closure into a deleter.
///
/// Useful for pointers that need teardown beyond a plain drop (pool
/// returns, foreign allocators, instrumentation in tests).
#[derive(Debug, Clone)]
pub struct FnDelete<F>(pub F);

impl<T, F: FnMut(*mut T)> Deleter<T> for FnDelete<F> {
    unsafe fn destroy(&mut self, ptr: *mut T) {
        (self.0)(ptr)
    }
}
