//! Serializer: result object → surface syntax

use crate::heap::{Heap, ObjRef};
use crate::object::Object;

/// Render `node` in the language's textual surface syntax.
///
/// Numbers print as decimal, booleans as `#t`/`#f`, symbols verbatim,
/// proper lists as parenthesized space-joined sequences, improper lists
/// with a dot before the tail. The empty list, and anything without a
/// surface form such as a lambda, prints as `()`.
pub fn print(heap: &Heap, node: Option<ObjRef>) -> String {
    let handle = match node {
        Some(handle) => handle,
        None => return "()".to_string(),
    };
    match heap.get(handle) {
        Object::Number(value) => value.to_string(),
        Object::Bool(true) => "#t".to_string(),
        Object::Bool(false) => "#f".to_string(),
        Object::Symbol(name) => name.clone(),
        Object::Cell(_) => format!("({})", print_list(heap, Some(handle))),
        _ => "()".to_string(),
    }
}

fn print_list(heap: &Heap, node: Option<ObjRef>) -> String {
    let handle = match node {
        Some(handle) => handle,
        None => return String::new(),
    };
    match heap.get(handle) {
        Object::Cell(pair) => {
            let first = print(heap, pair.first);
            let rest = print_list(heap, pair.second);
            if rest.is_empty() {
                first
            } else {
                format!("{first} {rest}")
            }
        }
        // Improper tail.
        _ => format!(". {}", print(heap, Some(handle))),
    }
}
