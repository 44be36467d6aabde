//! Error types for pointer promotion

use thiserror::Error;

/// Promotion of an expired weak reference.
///
/// Returned by [`SharedFromThis::shared_from_this`](crate::SharedFromThis)
/// when no `SharedPtr` owns the object yet, and by the
/// `TryFrom<&WeakPtr<T>>` constructor of [`SharedPtr`](crate::SharedPtr)
/// when the payload has already been destroyed. The non-throwing path is
/// [`WeakPtr::upgrade`](crate::WeakPtr::upgrade), which returns `None`
/// instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bad weak pointer: the object is not (or no longer) owned by any SharedPtr")]
pub struct BadWeakPtr;
