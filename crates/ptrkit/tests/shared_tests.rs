use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use ptrkit::{BadWeakPtr, SelfRef, SharedFromThis, SharedPtr};

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
// Strong Counting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_new_single_owner() {
    let p = SharedPtr::new(String::from("hi"));
    assert_eq!(p.use_count(), 1);
    assert_eq!(&*p, "hi");
}

#[test]
fn test_clone_increments_count() {
    let a = SharedPtr::new(5);
    let b = a.clone();
    let c = b.clone();
    assert_eq!(a.use_count(), 3);
    assert_eq!(c.use_count(), 3);
    assert_eq!(a.get(), c.get());
}

#[test]
fn test_destroyed_exactly_once_at_last_owner() {
    let (drops, s) = spy();
    let a = SharedPtr::new(s);
    let b = a.clone();
    let c = a.clone();

    drop(a);
    drop(b);
    assert_eq!(drops.get(), 0);
    assert_eq!(c.use_count(), 1);

    drop(c);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_reset_releases_this_owner_only() {
    let (drops, s) = spy();
    let mut a = SharedPtr::new(s);
    let b = a.clone();

    a.reset();
    assert!(a.is_empty());
    assert_eq!(a.use_count(), 0);
    assert_eq!(b.use_count(), 1);
    assert_eq!(drops.get(), 0);

    drop(b);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_from_raw_adopts_allocation() {
    let (drops, s) = spy();
    let p = unsafe { SharedPtr::from_raw(Box::into_raw(Box::new(s))) };
    assert_eq!(p.use_count(), 1);
    drop(p);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_from_raw_null_is_empty() {
    let p = unsafe { SharedPtr::<i32>::from_raw(std::ptr::null_mut()) };
    assert!(p.is_empty());
    assert_eq!(p.use_count(), 0);
}

#[test]
fn test_empty_pointer() {
    let p: SharedPtr<i32> = SharedPtr::empty();
    assert!(p.is_empty());
    assert!(p.get().is_null());
    assert_eq!(p.use_count(), 0);
    assert_eq!(p.weak_count(), 0);
}

#[test]
#[should_panic(expected = "dereferenced an empty SharedPtr")]
fn test_deref_empty_panics() {
    let p: SharedPtr<i32> = SharedPtr::empty();
    let _ = *p;
}

#[test]
fn test_pointer_identity_equality() {
    let a = SharedPtr::new(1);
    let b = a.clone();
    let c = SharedPtr::new(1);
    assert!(a == b);
    assert!(a != c);
}

#[test]
fn test_swap() {
    let mut a = SharedPtr::new(1);
    let mut b = SharedPtr::new(2);
    a.swap(&mut b);
    assert_eq!(*a, 2);
    assert_eq!(*b, 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Shared From This
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct Node {
    this: SelfRef<Node>,
    label: &'static str,
}

impl SharedFromThis for Node {
    fn self_ref(&self) -> &SelfRef<Node> {
        &self.this
    }
}

fn node(label: &'static str) -> Node {
    Node {
        this: SelfRef::new(),
        label,
    }
}

#[test]
fn test_shared_from_this_promotes() {
    let p = SharedPtr::new_enabled(node("n"));
    let q = p.shared_from_this().unwrap();
    assert_eq!(p.use_count(), 2);
    assert_eq!(q.label, "n");
    assert_eq!(p.get(), q.get());
}

#[test]
fn test_shared_from_this_before_ownership_fails() {
    let plain = node("stack");
    assert_eq!(plain.shared_from_this().unwrap_err(), BadWeakPtr);
}

#[test]
fn test_weak_from_this_observes_without_owning() {
    let p = SharedPtr::new_enabled(node("n"));
    let w = p.weak_from_this();
    assert_eq!(p.use_count(), 1);
    assert_eq!(w.use_count(), 1);

    drop(p);
    assert!(w.expired());
}

#[test]
fn test_self_reference_does_not_leak_ownership() {
    // The seeded self-reference is weak: one strong owner means death.
    let (drops, s) = spy();

    struct Holder {
        this: SelfRef<Holder>,
        _spy: DropSpy,
    }
    impl SharedFromThis for Holder {
        fn self_ref(&self) -> &SelfRef<Holder> {
            &self.this
        }
    }

    let p = SharedPtr::new_enabled(Holder {
        this: SelfRef::new(),
        _spy: s,
    });
    assert_eq!(p.use_count(), 1);
    drop(p);
    assert_eq!(drops.get(), 1);
}
