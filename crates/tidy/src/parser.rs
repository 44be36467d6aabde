//! Recursive-descent reader producing heap-resident list structure

use crate::error::{Result, SchemeError};
use crate::heap::{Heap, ObjRef};
use crate::object::{Object, Pair};
use crate::tokenizer::{Token, Tokenizer};

/// Read one expression, allocating its object graph in `heap`.
///
/// `'expr` is sugar for `(quote expr)`. Returns `None` for the empty
/// list `()`.
pub fn read(heap: &mut Heap, tokenizer: &mut Tokenizer<'_>) -> Result<Option<ObjRef>> {
    match tokenizer.next()? {
        Token::Constant(value) => Ok(Some(heap.alloc(Object::Number(value)))),
        Token::Bool(value) => Ok(Some(heap.alloc(Object::Bool(value)))),
        Token::Symbol(name) => Ok(Some(heap.alloc(Object::Symbol(name)))),
        Token::Open => read_list(heap, tokenizer),
        Token::Quote => {
            if tokenizer.is_end() {
                return Err(SchemeError::syntax("quote with no operand"));
            }
            let quoted = read(heap, tokenizer)?;
            let operand = heap.alloc(Object::Cell(Pair {
                first: quoted,
                second: None,
            }));
            let head = heap.alloc(Object::Symbol("quote".to_string()));
            Ok(Some(heap.alloc(Object::Cell(Pair {
                first: Some(head),
                second: Some(operand),
            }))))
        }
        Token::Close => Err(SchemeError::syntax("unexpected `)`")),
        Token::Dot => Err(SchemeError::syntax("`.` outside a list")),
    }
}

/// Read the remainder of a bracketed list (the `(` is already consumed).
fn read_list(heap: &mut Heap, tokenizer: &mut Tokenizer<'_>) -> Result<Option<ObjRef>> {
    match tokenizer.peek() {
        None => Err(SchemeError::syntax("unbalanced `(`")),
        Some(Token::Dot) => {
            tokenizer.next()?;
            let last = read(heap, tokenizer)?;
            match tokenizer.next()? {
                Token::Close => Ok(last),
                _ => Err(SchemeError::syntax("expected `)` after dotted tail")),
            }
        }
        Some(Token::Close) => {
            tokenizer.next()?;
            Ok(None)
        }
        Some(_) => {
            let first = read(heap, tokenizer)?;
            let second = read_list(heap, tokenizer)?;
            Ok(Some(heap.alloc(Object::Cell(Pair { first, second }))))
        }
    }
}
