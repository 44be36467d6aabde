//! The shared-ownership control block.
//!
//! One block is shared by every `SharedPtr`/`WeakPtr` referring to one
//! logical object. The payload dies exactly when the strong count reaches
//! zero; the block storage itself is freed only once the weak count is
//! also zero, so outstanding weak pointers can still observe expiry.

use std::cell::{Cell, UnsafeCell};
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// Discriminated payload: constructed in place, adopted from a raw
/// allocation, or already destroyed.
enum Slot<T> {
    Inline(ManuallyDrop<T>),
    Raw(NonNull<T>),
    Dead,
}

pub(crate) struct ControlBlock<T> {
    strong: Cell<usize>,
    weak: Cell<usize>,
    slot: UnsafeCell<Slot<T>>,
}

impl<T> ControlBlock<T> {
    /// A fresh block with the payload embedded (single allocation).
    ///
    /// Strong count starts at 1. The weak count also starts at 1: the
    /// strong owners collectively hold one weak reference, released when
    /// the payload dies. Without it, a payload that itself holds a weak
    /// pointer to this block (enable-shared-from-this) would free the
    /// block out from under `release_strong`.
    pub(crate) fn new_inline(value: T) -> NonNull<Self> {
        let block = Box::new(Self {
            strong: Cell::new(1),
            weak: Cell::new(1),
            slot: UnsafeCell::new(Slot::Inline(ManuallyDrop::new(value))),
        });
        // SAFETY: Box::into_raw never returns null.
        unsafe { NonNull::new_unchecked(Box::into_raw(block)) }
    }

    /// A fresh block borrowing an existing heap allocation.
    /// Counts start as in [`ControlBlock::new_inline`].
    pub(crate) fn new_raw(ptr: NonNull<T>) -> NonNull<Self> {
        let block = Box::new(Self {
            strong: Cell::new(1),
            weak: Cell::new(1),
            slot: UnsafeCell::new(Slot::Raw(ptr)),
        });
        // SAFETY: as above.
        unsafe { NonNull::new_unchecked(Box::into_raw(block)) }
    }

    /// Data pointer for the live payload.
    ///
    /// Only meaningful while the strong count is above zero; the address is
    /// stable because the block itself is heap-allocated.
    pub(crate) fn payload_ptr(&self) -> NonNull<T> {
        // SAFETY: the slot is only rewritten by destroy_payload, which the
        // single-threaded contract orders strictly after all payload access.
        match unsafe { &mut *self.slot.get() } {
            Slot::Inline(value) => NonNull::from(&mut **value),
            Slot::Raw(ptr) => *ptr,
            Slot::Dead => unreachable!("payload_ptr on a dead control block"),
        }
    }

    pub(crate) fn strong(&self) -> usize {
        self.strong.get()
    }

    pub(crate) fn weak(&self) -> usize {
        self.weak.get()
    }

    pub(crate) fn inc_strong(&self) {
        self.strong.set(self.strong.get() + 1);
    }

    /// Decrement the strong count, returning the new value.
    pub(crate) fn dec_strong(&self) -> usize {
        let n = self.strong.get() - 1;
        self.strong.set(n);
        n
    }

    pub(crate) fn inc_weak(&self) {
        self.weak.set(self.weak.get() + 1);
    }

    /// Decrement the weak count, returning the new value.
    pub(crate) fn dec_weak(&self) -> usize {
        let n = self.weak.get() - 1;
        self.weak.set(n);
        n
    }

    /// Destroy the payload, leaving the slot dead.
    ///
    /// # Safety
    ///
    /// Must be called exactly once, when the strong count has just reached
    /// zero and no payload borrow is outstanding.
    unsafe fn destroy_payload(&self) {
        match std::mem::replace(&mut *self.slot.get(), Slot::Dead) {
            Slot::Inline(value) => drop(ManuallyDrop::into_inner(value)),
            Slot::Raw(ptr) => drop(Box::from_raw(ptr.as_ptr())),
            Slot::Dead => {}
        }
    }
}

/// A (data pointer, control block) pair: the shared internals of
/// `SharedPtr` and `WeakPtr`.
pub(crate) struct BlockRef<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) block: NonNull<ControlBlock<T>>,
}

impl<T> Clone for BlockRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BlockRef<T> {}

/// Drop one strong reference: destroys the payload at zero and frees the
/// block once no weak observers remain either.
///
/// # Safety
///
/// `block` must come from a live `BlockRef` whose strong reference is being
/// given up exactly once.
pub(crate) unsafe fn release_strong<T>(block: NonNull<ControlBlock<T>>) {
    if block.as_ref().dec_strong() == 0 {
        block.as_ref().destroy_payload();
        // Release the weak reference held collectively by the strong
        // owners. Weak pointers dropped while the payload was being
        // destroyed only decremented past this one, so the block is
        // still alive here.
        release_weak(block);
    }
}

/// Drop one weak reference: frees the block when it was the last holder of
/// any kind.
///
/// # Safety
///
/// `block` must come from a live `BlockRef` whose weak reference is being
/// given up exactly once.
pub(crate) unsafe fn release_weak<T>(block: NonNull<ControlBlock<T>>) {
    if block.as_ref().dec_weak() == 0 && block.as_ref().strong() == 0 {
        drop(Box::from_raw(block.as_ptr()));
    }
}
