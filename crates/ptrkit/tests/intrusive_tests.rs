use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use ptrkit::{make_intrusive, FnDelete, IntrusivePtr, RefCounter, Refcount};

struct Counted {
    refs: RefCounter,
    drops: Rc<Cell<usize>>,
    value: i32,
}

impl Refcount for Counted {
    fn counter(&self) -> &RefCounter {
        &self.refs
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn counted(value: i32) -> (Rc<Cell<usize>>, Counted) {
    let drops = Rc::new(Cell::new(0));
    let c = Counted {
        refs: RefCounter::new(),
        drops: drops.clone(),
        value,
    };
    (drops, c)
}

// ═══════════════════════════════════════════════════════════════════════
// Embedded Counting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_make_intrusive_counts_one() {
    let (_, c) = counted(3);
    let p = make_intrusive(c);
    assert_eq!(p.use_count(), 1);
    assert_eq!(p.value, 3);
}

#[test]
fn test_clone_manipulates_embedded_counter() {
    let (_, c) = counted(1);
    let a = make_intrusive(c);
    let b = a.clone();
    let c2 = b.clone();

    // The count lives in the pointee, visible through every handle.
    assert_eq!(a.use_count(), 3);
    assert_eq!(a.counter().count(), 3);

    drop(b);
    drop(c2);
    assert_eq!(a.use_count(), 1);
}

#[test]
fn test_destroyed_once_when_count_hits_zero() {
    let (drops, c) = counted(0);
    let a = make_intrusive(c);
    let b = a.clone();

    drop(a);
    assert_eq!(drops.get(), 0);
    drop(b);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_reset_releases_reference() {
    let (drops, c) = counted(0);
    let mut a = make_intrusive(c);
    let b = a.clone();

    a.reset();
    assert!(a.is_empty());
    assert_eq!(a.use_count(), 0);
    assert_eq!(b.use_count(), 1);
    assert_eq!(drops.get(), 0);
}

#[test]
fn test_empty_pointer() {
    let p: IntrusivePtr<Counted> = IntrusivePtr::empty();
    assert!(p.is_empty());
    assert_eq!(p.use_count(), 0);
    assert!(p.get().is_null());
}

#[test]
#[should_panic(expected = "dereferenced an empty IntrusivePtr")]
fn test_deref_empty_panics() {
    let p: IntrusivePtr<Counted> = IntrusivePtr::empty();
    let _ = p.value;
}

#[test]
fn test_from_raw_shares_existing_count() {
    let (drops, c) = counted(5);
    let a = make_intrusive(c);
    let raw = a.get();

    // A second handle adopted from the raw pointer participates in the
    // same embedded count.
    let b = unsafe { IntrusivePtr::from_raw(raw) };
    assert_eq!(a.use_count(), 2);

    drop(a);
    assert_eq!(drops.get(), 0);
    drop(b);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_swap() {
    let (_, c1) = counted(1);
    let (_, c2) = counted(2);
    let mut a = make_intrusive(c1);
    let mut b = make_intrusive(c2);

    a.swap(&mut b);
    assert_eq!(a.value, 2);
    assert_eq!(b.value, 1);
    assert_eq!(a.use_count(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Deleter Policy
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_custom_deleter_invoked_at_zero() {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let deleter = FnDelete(move |ptr: *mut Counted| {
        seen.set(seen.get() + 1);
        drop(unsafe { Box::from_raw(ptr) });
    });

    let (drops, c) = counted(7);
    let p = unsafe { IntrusivePtr::from_raw_with_deleter(Box::into_raw(Box::new(c)), deleter) };
    assert_eq!(p.use_count(), 1);

    drop(p);
    assert_eq!(calls.get(), 1);
    assert_eq!(drops.get(), 1);
}
