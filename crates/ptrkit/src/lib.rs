//! # ptrkit
//!
//! Smart-pointer building blocks with manual lifetime management.
//!
//! The crate provides four pointer families, from simplest to most involved:
//!
//! - [`UniquePtr`] / [`UniqueArray`]: exclusive ownership with a pluggable
//!   destruction policy ([`Deleter`]).
//! - [`SharedPtr`] / [`WeakPtr`]: shared ownership through an out-of-line
//!   control block holding separate strong and weak counts. Weak pointers
//!   observe the payload without extending its lifetime.
//! - [`SharedFromThis`]: an opt-in capability letting an object hand out
//!   `SharedPtr`s to itself.
//! - [`IntrusivePtr`]: shared ownership where the count lives inside the
//!   pointee via the [`Refcount`] mixin.
//!
//! ## Threading
//!
//! All reference counts are plain `Cell`s. Every pointer here is
//! single-threaded by contract (`!Send`, `!Sync`); a concurrent variant
//! would need atomic counts with release-acquire ordering on the
//! destructive decrement.
//!
//! ## Null dereference
//!
//! Dereferencing an empty pointer through `Deref`/`DerefMut` panics. That
//! boundary is the caller's responsibility, not a recoverable error; use
//! `as_ref()` when emptiness is a legitimate state.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;

pub mod deleter;
pub mod error;
pub mod intrusive;
pub mod shared;
pub mod unique;
pub mod weak;

// Re-export main types
pub use deleter::{BoxDelete, Deleter, FnDelete};
pub use error::BadWeakPtr;
pub use intrusive::{make_intrusive, IntrusivePtr, RefCounter, Refcount};
pub use shared::{SelfRef, SharedFromThis, SharedPtr};
pub use unique::{UniqueArray, UniquePtr};
pub use weak::WeakPtr;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
