//! The allocation arena and its mark-and-sweep collector

use crate::object::Object;

/// Handle to an object in the [`Heap`].
///
/// A non-owning arena index, valid until the next collection pass that
/// finds the object unreachable. Holding a stale handle across a
/// collection is the use-after-free of this design; the evaluator only
/// collects between top-level runs, when nothing but the root scope is
/// held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(usize);

struct HeapSlot {
    object: Object,
    marked: bool,
}

/// The single allocation arena for the interpreter's object graph.
///
/// Objects are born via [`Heap::alloc`] and die only during
/// [`Heap::mark_and_sweep`]. Slots of swept objects are recycled through
/// a free list.
#[derive(Default)]
pub struct Heap {
    slots: Vec<Option<HeapSlot>>,
    free: Vec<usize>,
}

impl Heap {
    /// An empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `object` in the live-object list and return its handle.
    pub fn alloc(&mut self, object: Object) -> ObjRef {
        let slot = HeapSlot {
            object,
            marked: false,
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                ObjRef(index)
            }
            None => {
                self.slots.push(Some(slot));
                ObjRef(self.slots.len() - 1)
            }
        }
    }

    /// Borrow the object behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle (the object was swept), an internal
    /// invariant violation, not a recoverable condition.
    pub fn get(&self, handle: ObjRef) -> &Object {
        match &self.slots[handle.0] {
            Some(slot) => &slot.object,
            None => panic!("stale heap handle {handle:?}"),
        }
    }

    /// Mutably borrow the object behind `handle`.
    ///
    /// # Panics
    ///
    /// As for [`Heap::get`].
    pub fn get_mut(&mut self, handle: ObjRef) -> &mut Object {
        match &mut self.slots[handle.0] {
            Some(slot) => &mut slot.object,
            None => panic!("stale heap handle {handle:?}"),
        }
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether no objects are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reclaim every object unreachable from `roots`.
    ///
    /// Two phases, run to completion with no suspension:
    ///
    /// 1. **Mark**: depth-first traversal from the roots. Each visited
    ///    node's mark bit is set exactly once; an already-marked node is
    ///    not revisited, which is what makes cyclic scope/closure graphs
    ///    safe to traverse.
    /// 2. **Sweep**: every slot still unmarked is destroyed and its
    ///    index recycled; every survivor has its mark bit reset for the
    ///    next pass.
    ///
    /// Running a second pass with no intervening allocation frees
    /// nothing.
    pub fn mark_and_sweep(&mut self, roots: impl IntoIterator<Item = ObjRef>) {
        self.mark(roots);
        self.sweep();
    }

    fn mark(&mut self, roots: impl IntoIterator<Item = ObjRef>) {
        let mut pending: Vec<ObjRef> = roots.into_iter().collect();

        while let Some(handle) = pending.pop() {
            let slot = match &mut self.slots[handle.0] {
                Some(slot) => slot,
                None => continue,
            };
            if slot.marked {
                continue;
            }
            slot.marked = true;

            // Type-specific edges; terminal variants have none.
            match &slot.object {
                Object::Cell(pair) => {
                    pending.extend(pair.first);
                    pending.extend(pair.second);
                }
                Object::Scope(scope) => {
                    pending.extend(scope.parent);
                    pending.extend(scope.bindings.values().flatten());
                }
                Object::Lambda(lambda) => {
                    pending.extend(lambda.body.iter().flatten());
                    pending.push(lambda.scope);
                }
                Object::Number(_)
                | Object::Bool(_)
                | Object::Symbol(_)
                | Object::Builtin(_)
                | Object::Special(_) => {}
            }
        }
    }

    fn sweep(&mut self) {
        for (index, entry) in self.slots.iter_mut().enumerate() {
            match entry {
                Some(slot) if slot.marked => slot.marked = false,
                Some(_) => {
                    *entry = None;
                    self.free.push(index);
                }
                None => {}
            }
        }
    }
}
