use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use ptrkit::{BadWeakPtr, SharedPtr, WeakPtr};

struct DropSpy {
    drops: Rc<Cell<usize>>,
}

impl Drop for DropSpy {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Observation and Promotion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_upgrade_while_owner_alive() {
    let strong = SharedPtr::new(7);
    let weak = strong.downgrade();

    assert!(!weak.expired());
    assert_eq!(weak.use_count(), 1);
    assert_eq!(strong.weak_count(), 1);

    let promoted = weak.upgrade().unwrap();
    assert_eq!(*promoted, 7);
    assert_eq!(strong.use_count(), 2);
}

#[test]
fn test_upgrade_fails_after_all_owners_die() {
    let strong = SharedPtr::new(7);
    let weak = strong.downgrade();

    drop(strong);
    assert!(weak.expired());
    assert_eq!(weak.use_count(), 0);
    assert!(weak.upgrade().is_none());

    // Expiry is permanent.
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_upgrade_tracks_copies_not_originals() {
    let a = SharedPtr::new(1);
    let weak = a.downgrade();
    let b = a.clone();

    drop(a);
    // A copy is still alive, so promotion succeeds.
    assert!(weak.upgrade().is_some());

    drop(b);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_weak_does_not_extend_lifetime() {
    let drops = Rc::new(Cell::new(0));
    let strong = SharedPtr::new(DropSpy {
        drops: drops.clone(),
    });
    let weak = strong.downgrade();

    drop(strong);
    // Payload dies with the last strong owner regardless of observers.
    assert_eq!(drops.get(), 1);
    assert!(weak.expired());
}

#[test]
fn test_control_block_outlives_payload() {
    let strong = SharedPtr::new(5);
    let w1 = strong.downgrade();
    let w2 = w1.clone();
    drop(strong);

    // Both observers still read the (expired) block safely.
    assert!(w1.expired());
    assert!(w2.expired());
    drop(w1);
    assert!(w2.expired());
}

#[test]
fn test_empty_weak() {
    let weak: WeakPtr<i32> = WeakPtr::empty();
    assert!(weak.expired());
    assert_eq!(weak.use_count(), 0);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_reset_detaches_observer() {
    let strong = SharedPtr::new(3);
    let mut weak = strong.downgrade();
    assert_eq!(strong.weak_count(), 1);

    weak.reset();
    assert_eq!(strong.weak_count(), 0);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_demote_via_from() {
    let strong = SharedPtr::new(9);
    let weak = WeakPtr::from(&strong);
    assert_eq!(*weak.upgrade().unwrap(), 9);
}

// ═══════════════════════════════════════════════════════════════════════
// Failing Promotion Path
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_try_from_live_weak() {
    let strong = SharedPtr::new(11);
    let weak = strong.downgrade();
    let promoted = SharedPtr::try_from(&weak).unwrap();
    assert_eq!(*promoted, 11);
}

#[test]
fn test_try_from_expired_weak_signals_bad_weak_ptr() {
    let strong = SharedPtr::new(11);
    let weak = strong.downgrade();
    drop(strong);

    assert_eq!(SharedPtr::try_from(&weak).unwrap_err(), BadWeakPtr);
}

#[test]
fn test_try_from_empty_weak_signals_bad_weak_ptr() {
    let weak: WeakPtr<i32> = WeakPtr::empty();
    assert_eq!(SharedPtr::try_from(&weak).unwrap_err(), BadWeakPtr);
}
