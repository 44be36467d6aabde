//! Built-in functions (arguments arrive already evaluated)

use super::list_to_vec;
use crate::error::{Result, SchemeError};
use crate::heap::{Heap, ObjRef};
use crate::object::{Builtin, Object, Pair};

/// Dispatch one built-in call.
pub(crate) fn apply_builtin(
    heap: &mut Heap,
    builtin: Builtin,
    args: &[Option<ObjRef>],
) -> Result<Option<ObjRef>> {
    match builtin {
        Builtin::Add => {
            let operands = numbers(heap, builtin, args)?;
            let sum = operands
                .iter()
                .try_fold(0i64, |acc, value| acc.checked_add(*value))
                .ok_or_else(|| overflow(builtin))?;
            Ok(number(heap, sum))
        }
        Builtin::Sub => {
            let operands = nonempty_numbers(heap, builtin, args)?;
            let difference = operands[1..]
                .iter()
                .try_fold(operands[0], |acc, value| acc.checked_sub(*value))
                .ok_or_else(|| overflow(builtin))?;
            Ok(number(heap, difference))
        }
        Builtin::Mul => {
            let operands = numbers(heap, builtin, args)?;
            let product = operands
                .iter()
                .try_fold(1i64, |acc, value| acc.checked_mul(*value))
                .ok_or_else(|| overflow(builtin))?;
            Ok(number(heap, product))
        }
        Builtin::Div => {
            let operands = nonempty_numbers(heap, builtin, args)?;
            let mut quotient = operands[0];
            for divisor in &operands[1..] {
                if *divisor == 0 {
                    return Err(SchemeError::runtime("division by zero"));
                }
                // checked_div still fails on i64::MIN / -1.
                quotient = quotient
                    .checked_div(*divisor)
                    .ok_or_else(|| overflow(builtin))?;
            }
            Ok(number(heap, quotient))
        }

        Builtin::Eq => comparison(heap, builtin, args, |a, b| a == b),
        Builtin::Lt => comparison(heap, builtin, args, |a, b| a < b),
        Builtin::Gt => comparison(heap, builtin, args, |a, b| a > b),
        Builtin::Le => comparison(heap, builtin, args, |a, b| a <= b),
        Builtin::Ge => comparison(heap, builtin, args, |a, b| a >= b),

        Builtin::Abs => {
            let operands = numbers(heap, builtin, args)?;
            match operands[..] {
                [value] => {
                    let magnitude = value.checked_abs().ok_or_else(|| overflow(builtin))?;
                    Ok(number(heap, magnitude))
                }
                _ => Err(arity(builtin, "exactly one argument")),
            }
        }
        Builtin::Min => {
            let operands = nonempty_numbers(heap, builtin, args)?;
            Ok(number(heap, operands.iter().copied().fold(operands[0], i64::min)))
        }
        Builtin::Max => {
            let operands = nonempty_numbers(heap, builtin, args)?;
            Ok(number(heap, operands.iter().copied().fold(operands[0], i64::max)))
        }

        Builtin::IsNumber => {
            let all = args
                .iter()
                .all(|arg| matches!(deref(heap, *arg), Some(Object::Number(_))));
            Ok(boolean(heap, all))
        }
        Builtin::IsBool => {
            let all = args
                .iter()
                .all(|arg| matches!(deref(heap, *arg), Some(Object::Bool(_))));
            Ok(boolean(heap, all))
        }
        Builtin::IsSymbol => {
            let arg = single(builtin, args)?;
            let is = matches!(deref(heap, arg), Some(Object::Symbol(_)));
            Ok(boolean(heap, is))
        }

        Builtin::Car => Ok(cell_arg(heap, builtin, args)?.first),
        Builtin::Cdr => Ok(cell_arg(heap, builtin, args)?.second),
        Builtin::Cons => match args {
            [first, second] => Ok(Some(heap.alloc(Object::Cell(Pair {
                first: *first,
                second: *second,
            })))),
            _ => Err(arity(builtin, "exactly two arguments")),
        },
        Builtin::List => {
            let mut tail = None;
            for element in args.iter().rev() {
                tail = Some(heap.alloc(Object::Cell(Pair {
                    first: *element,
                    second: tail,
                })));
            }
            Ok(tail)
        }
        Builtin::IsList => {
            let arg = single(builtin, args)?;
            Ok(boolean(heap, is_proper_list(heap, arg)))
        }
        Builtin::IsPair => {
            let arg = single(builtin, args)?;
            Ok(boolean(heap, list_to_vec(heap, arg).len() == 2))
        }
        Builtin::IsNull => {
            let arg = single(builtin, args)?;
            Ok(boolean(heap, arg.is_none()))
        }
        Builtin::ListRef => {
            let node = walk_list(heap, builtin, args)?;
            match deref(heap, node) {
                Some(Object::Cell(pair)) => Ok(pair.first),
                _ => Err(SchemeError::Runtime(format!(
                    "{}: index out of range",
                    builtin.name()
                ))),
            }
        }
        Builtin::ListTail => walk_list(heap, builtin, args),
    }
}

fn number(heap: &mut Heap, value: i64) -> Option<ObjRef> {
    Some(heap.alloc(Object::Number(value)))
}

fn boolean(heap: &mut Heap, value: bool) -> Option<ObjRef> {
    Some(heap.alloc(Object::Bool(value)))
}

fn deref(heap: &Heap, node: Option<ObjRef>) -> Option<&Object> {
    node.map(|handle| heap.get(handle))
}

fn arity(builtin: Builtin, expected: &str) -> SchemeError {
    SchemeError::Runtime(format!("{} expects {}", builtin.name(), expected))
}

fn overflow(builtin: Builtin) -> SchemeError {
    SchemeError::Runtime(format!("integer overflow in {}", builtin.name()))
}

fn single(builtin: Builtin, args: &[Option<ObjRef>]) -> Result<Option<ObjRef>> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(arity(builtin, "exactly one argument")),
    }
}

/// Every argument as an integer, or a runtime type error.
fn numbers(heap: &Heap, builtin: Builtin, args: &[Option<ObjRef>]) -> Result<Vec<i64>> {
    args.iter()
        .map(|arg| match deref(heap, *arg) {
            Some(Object::Number(value)) => Ok(*value),
            other => Err(SchemeError::Runtime(format!(
                "{} expects numbers, got {}",
                builtin.name(),
                other.map_or("()", |o| o.kind())
            ))),
        })
        .collect()
}

fn nonempty_numbers(heap: &Heap, builtin: Builtin, args: &[Option<ObjRef>]) -> Result<Vec<i64>> {
    let operands = numbers(heap, builtin, args)?;
    if operands.is_empty() {
        return Err(arity(builtin, "at least one argument"));
    }
    Ok(operands)
}

/// Chained pairwise comparison; vacuously true below two operands.
fn comparison(
    heap: &mut Heap,
    builtin: Builtin,
    args: &[Option<ObjRef>],
    ordered: fn(i64, i64) -> bool,
) -> Result<Option<ObjRef>> {
    let operands = numbers(heap, builtin, args)?;
    let holds = operands.windows(2).all(|pair| ordered(pair[0], pair[1]));
    Ok(boolean(heap, holds))
}

fn cell_arg(heap: &Heap, builtin: Builtin, args: &[Option<ObjRef>]) -> Result<Pair> {
    let arg = single(builtin, args)?;
    match deref(heap, arg) {
        Some(Object::Cell(pair)) => Ok(*pair),
        other => Err(SchemeError::Runtime(format!(
            "{} expects a pair, got {}",
            builtin.name(),
            other.map_or("()", |o| o.kind())
        ))),
    }
}

fn is_proper_list(heap: &Heap, node: Option<ObjRef>) -> bool {
    let mut current = node;
    while let Some(handle) = current {
        match heap.get(handle) {
            Object::Cell(pair) => current = pair.second,
            _ => return false,
        }
    }
    true
}

/// Shared walk for `list-ref`/`list-tail`: advance `n` cells into the
/// list and return the node reached.
fn walk_list(heap: &Heap, builtin: Builtin, args: &[Option<ObjRef>]) -> Result<Option<ObjRef>> {
    let (list, count) = match args {
        [list, count] => (*list, *count),
        _ => return Err(arity(builtin, "exactly two arguments")),
    };
    let count = match deref(heap, count) {
        Some(Object::Number(value)) if *value >= 0 => *value,
        _ => {
            return Err(SchemeError::Runtime(format!(
                "{} expects a non-negative index",
                builtin.name()
            )))
        }
    };

    let mut current = list;
    for _ in 0..count {
        match deref(heap, current) {
            Some(Object::Cell(pair)) => current = pair.second,
            _ => {
                return Err(SchemeError::Runtime(format!(
                    "{}: index out of range",
                    builtin.name()
                )))
            }
        }
    }
    Ok(current)
}
