//! The recursive evaluator
//!
//! Structurally a tree walk over the object graph with three calling
//! conventions at applications: quote-like forms return their argument
//! structure, special forms receive arguments unevaluated, and ordinary
//! functions get every argument evaluated left to right.
//!
//! The active scope is threaded explicitly through every call; there is
//! no ambient current-scope state.

mod builtins;
mod forms;

use crate::error::{Result, SchemeError};
use crate::heap::{Heap, ObjRef};
use crate::object::{Object, Pair};
use crate::scope;

/// Evaluate `expr` in `scope`.
///
/// Dispatch order: self-evaluating atoms, symbol resolution through the
/// scope chain, then application. The empty list is not a valid
/// expression.
pub fn eval(heap: &mut Heap, scope: ObjRef, expr: Option<ObjRef>) -> Result<Option<ObjRef>> {
    let handle = expr.ok_or_else(|| SchemeError::runtime("cannot evaluate the empty list"))?;

    match heap.get(handle) {
        Object::Number(_)
        | Object::Bool(_)
        | Object::Builtin(_)
        | Object::Special(_)
        | Object::Lambda(_) => Ok(Some(handle)),
        Object::Symbol(name) => {
            let name = name.clone();
            scope::lookup(heap, scope, &name)
        }
        Object::Cell(pair) => {
            let pair = *pair;
            apply(heap, scope, pair)
        }
        Object::Scope(_) => Err(SchemeError::runtime("cannot evaluate a scope object")),
    }
}

/// Apply the head of `pair` to its argument list.
fn apply(heap: &mut Heap, scope: ObjRef, pair: Pair) -> Result<Option<ObjRef>> {
    let head = eval(heap, scope, pair.first)?
        .ok_or_else(|| SchemeError::runtime("the empty list is not callable"))?;

    match heap.get(head) {
        Object::Special(form) => {
            let form = *form;
            let args = list_to_vec(heap, pair.second);
            forms::apply_form(heap, scope, form, &args)
        }
        Object::Builtin(builtin) => {
            let builtin = *builtin;
            let args = eval_list(heap, scope, pair.second)?;
            builtins::apply_builtin(heap, builtin, &args)
        }
        Object::Lambda(_) => {
            let args = eval_list(heap, scope, pair.second)?;
            apply_lambda(heap, head, &args)
        }
        other => Err(SchemeError::Runtime(format!(
            "a {} is not callable",
            other.kind()
        ))),
    }
}

/// Call the lambda behind `lambda_ref` with already-evaluated arguments.
///
/// Creates a child scope parented at the captured defining scope, binds
/// each parameter, evaluates the body in sequence and returns the last
/// value.
fn apply_lambda(
    heap: &mut Heap,
    lambda_ref: ObjRef,
    args: &[Option<ObjRef>],
) -> Result<Option<ObjRef>> {
    let lambda = match heap.get(lambda_ref) {
        Object::Lambda(lambda) => lambda.clone(),
        other => panic!("apply_lambda on a {}", other.kind()),
    };

    if args.len() != lambda.params.len() {
        return Err(SchemeError::Runtime(format!(
            "lambda expects {} arguments, got {}",
            lambda.params.len(),
            args.len()
        )));
    }

    let call_scope = scope::new_scope(heap, Some(lambda.scope));
    for (param, arg) in lambda.params.iter().zip(args) {
        scope::define(heap, call_scope, param, *arg);
    }

    let mut result = None;
    for expr in &lambda.body {
        result = eval(heap, call_scope, *expr)?;
    }
    Ok(result)
}

/// Flatten list structure into a vector of element edges.
///
/// An improper tail becomes the final element, mirroring how argument
/// lists are consumed everywhere else.
pub(crate) fn list_to_vec(heap: &Heap, node: Option<ObjRef>) -> Vec<Option<ObjRef>> {
    let mut out = Vec::new();
    let mut current = node;
    while let Some(handle) = current {
        match heap.get(handle) {
            Object::Cell(pair) => {
                out.push(pair.first);
                current = pair.second;
            }
            _ => {
                out.push(Some(handle));
                current = None;
            }
        }
    }
    out
}

/// Evaluate every element of a list structure, left to right.
fn eval_list(heap: &mut Heap, scope: ObjRef, node: Option<ObjRef>) -> Result<Vec<Option<ObjRef>>> {
    list_to_vec(heap, node)
        .into_iter()
        .map(|element| eval(heap, scope, element))
        .collect()
}

/// Scheme truthiness: everything except `#f` is true.
pub(crate) fn truthy(heap: &Heap, value: Option<ObjRef>) -> bool {
    match value {
        Some(handle) => !matches!(heap.get(handle), Object::Bool(false)),
        None => true,
    }
}
