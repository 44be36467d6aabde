//! Scope-chain operations over heap-resident scopes
//!
//! Scopes are ordinary heap objects so the collector can trace them; the
//! functions here are the only places that walk the parent chain.

use crate::error::{Result, SchemeError};
use crate::heap::{Heap, ObjRef};
use crate::object::{Object, Scope};

/// Allocate a fresh scope parented at `parent`.
pub fn new_scope(heap: &mut Heap, parent: Option<ObjRef>) -> ObjRef {
    heap.alloc(Object::Scope(Scope {
        parent,
        bindings: Default::default(),
    }))
}

fn as_scope(heap: &Heap, handle: ObjRef) -> &Scope {
    match heap.get(handle) {
        Object::Scope(scope) => scope,
        other => panic!("expected a scope object, found {}", other.kind()),
    }
}

fn as_scope_mut(heap: &mut Heap, handle: ObjRef) -> &mut Scope {
    match heap.get_mut(handle) {
        Object::Scope(scope) => scope,
        other => panic!("expected a scope object, found {}", other.kind()),
    }
}

/// Resolve `name` through the scope chain, innermost first.
///
/// Fails with [`SchemeError::Name`] when no scope binds it.
pub fn lookup(heap: &Heap, scope: ObjRef, name: &str) -> Result<Option<ObjRef>> {
    let mut current = Some(scope);
    while let Some(handle) = current {
        let scope = as_scope(heap, handle);
        if let Some(value) = scope.bindings.get(name) {
            return Ok(*value);
        }
        current = scope.parent;
    }
    Err(SchemeError::name(name))
}

/// Bind `name` to `value` in `scope` itself, shadowing any outer binding.
pub fn define(heap: &mut Heap, scope: ObjRef, name: &str, value: Option<ObjRef>) {
    as_scope_mut(heap, scope)
        .bindings
        .insert(name.to_string(), value);
}

/// Rebind an existing `name` in the innermost scope that defines it.
///
/// Fails with [`SchemeError::Name`] when no scope binds it; `set!`
/// never creates bindings.
pub fn assign(heap: &mut Heap, scope: ObjRef, name: &str, value: Option<ObjRef>) -> Result<()> {
    let mut current = Some(scope);
    while let Some(handle) = current {
        let scope = as_scope(heap, handle);
        if scope.bindings.contains_key(name) {
            as_scope_mut(heap, handle).bindings.insert(name.to_string(), value);
            return Ok(());
        }
        current = scope.parent;
    }
    Err(SchemeError::name(name))
}
