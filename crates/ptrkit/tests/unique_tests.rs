use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use ptrkit::{FnDelete, UniqueArray, UniquePtr};

/// Increments a shared counter on drop so tests can count destructions.
struct DropSpy {
    drops: Rc<Cell<usize>>,
}

impl Drop for DropSpy {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn spy() -> (Rc<Cell<usize>>, DropSpy) {
    let drops = Rc::new(Cell::new(0));
    let s = DropSpy {
        drops: drops.clone(),
    };
    (drops, s)
}

// ═══════════════════════════════════════════════════════════════════════
// Ownership and Access
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_new_and_deref() {
    let mut p = UniquePtr::new(41);
    assert_eq!(*p, 41);
    *p += 1;
    assert_eq!(*p, 42);
    assert!(!p.is_empty());
}

#[test]
fn test_empty_pointer() {
    let p: UniquePtr<i32> = UniquePtr::empty();
    assert!(p.is_empty());
    assert!(p.get().is_null());
    assert!(p.as_ref().is_none());
}

#[test]
fn test_default_is_empty() {
    let p: UniquePtr<String> = UniquePtr::default();
    assert!(p.is_empty());
}

#[test]
#[should_panic(expected = "dereferenced an empty UniquePtr")]
fn test_deref_empty_panics() {
    let p: UniquePtr<i32> = UniquePtr::empty();
    let _ = *p;
}

#[test]
fn test_move_transfers_ownership() {
    let (drops, s) = spy();
    let a = UniquePtr::new(s);
    let b = a; // Rust move: `a` is gone, no double ownership possible
    assert_eq!(drops.get(), 0);
    drop(b);
    assert_eq!(drops.get(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Release and Reset
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_release_relinquishes_without_destruction() {
    let (drops, s) = spy();
    let mut p = UniquePtr::new(s);

    let raw = p.release();
    assert!(p.is_empty());
    assert_eq!(drops.get(), 0);

    // The caller now owns the allocation outright.
    drop(unsafe { Box::from_raw(raw) });
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_release_empty_returns_null() {
    let mut p: UniquePtr<i32> = UniquePtr::empty();
    assert!(p.release().is_null());
}

#[test]
fn test_reset_destroys_previous_payload() {
    let (drops_a, a) = spy();
    let (drops_b, b) = spy();

    let mut p = UniquePtr::new(a);
    unsafe { p.reset(Box::into_raw(Box::new(b))) };
    assert_eq!(drops_a.get(), 1);
    assert_eq!(drops_b.get(), 0);

    drop(p);
    assert_eq!(drops_b.get(), 1);
}

#[test]
fn test_clear_destroys_and_empties() {
    let (drops, s) = spy();
    let mut p = UniquePtr::new(s);
    p.clear();
    assert!(p.is_empty());
    assert_eq!(drops.get(), 1);

    // Clearing an empty pointer is a no-op.
    p.clear();
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_drop_invokes_deleter_exactly_once() {
    let (drops, s) = spy();
    drop(UniquePtr::new(s));
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_swap() {
    let mut a = UniquePtr::new(1);
    let mut b = UniquePtr::new(2);
    a.swap(&mut b);
    assert_eq!(*a, 2);
    assert_eq!(*b, 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Custom Deleters
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_custom_deleter_runs_on_drop() {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let deleter = FnDelete(move |ptr: *mut i32| {
        seen.set(seen.get() + 1);
        drop(unsafe { Box::from_raw(ptr) });
    });

    let p = unsafe { UniquePtr::with_deleter(Box::into_raw(Box::new(5)), deleter) };
    assert_eq!(*p, 5);
    drop(p);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_custom_deleter_skipped_when_empty() {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let deleter = FnDelete(move |_ptr: *mut i32| seen.set(seen.get() + 1));

    let p = unsafe { UniquePtr::with_deleter(std::ptr::null_mut(), deleter) };
    assert!(p.is_empty());
    drop(p);
    assert_eq!(calls.get(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Arrays
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_array_indexing() {
    let mut arr = UniqueArray::from_vec(vec![10, 20, 30]);
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[1], 20);

    arr[2] = 33;
    assert_eq!(arr.as_slice(), &[10, 20, 33]);
    assert!(arr.get(3).is_none());
}

#[test]
fn test_array_drops_every_element() {
    let drops = Rc::new(Cell::new(0));
    let arr = UniqueArray::from_vec(
        (0..4)
            .map(|_| DropSpy {
                drops: drops.clone(),
            })
            .collect(),
    );
    drop(arr);
    assert_eq!(drops.get(), 4);
}

#[test]
fn test_array_empty() {
    let arr: UniqueArray<u8> = UniqueArray::from_vec(Vec::new());
    assert!(arr.is_empty());
    assert_eq!(arr.len(), 0);
}
