//! Special forms (arguments arrive unevaluated)

use super::{eval, list_to_vec, truthy};
use crate::error::{Result, SchemeError};
use crate::heap::{Heap, ObjRef};
use crate::object::{Form, Lambda, Object};
use crate::scope;

/// Dispatch one special form. `scope` is the caller's scope; each form
/// decides which argument expressions to evaluate in it.
pub(crate) fn apply_form(
    heap: &mut Heap,
    scope: ObjRef,
    form: Form,
    args: &[Option<ObjRef>],
) -> Result<Option<ObjRef>> {
    match form {
        Form::Quote => match args {
            [operand] => Ok(*operand),
            _ => Err(SchemeError::runtime("quote expects exactly one operand")),
        },

        Form::If => {
            let (condition, then_branch, else_branch) = match args {
                [condition, then_branch] => (*condition, *then_branch, None),
                [condition, then_branch, else_branch] => {
                    (*condition, *then_branch, Some(*else_branch))
                }
                _ => return Err(SchemeError::syntax("if expects two or three operands")),
            };
            let chosen = if truthy_eval(heap, scope, condition)? {
                then_branch
            } else {
                match else_branch {
                    Some(branch) => branch,
                    None => return Ok(None),
                }
            };
            eval(heap, scope, chosen)
        }

        Form::And => {
            let mut last = None;
            for arg in args {
                let value = eval(heap, scope, *arg)?;
                if !truthy(heap, value) {
                    return Ok(value);
                }
                last = Some(value);
            }
            match last {
                Some(value) => Ok(value),
                None => Ok(Some(heap.alloc(Object::Bool(true)))),
            }
        }

        Form::Or => {
            for arg in args {
                let value = eval(heap, scope, *arg)?;
                if truthy(heap, value) {
                    return Ok(value);
                }
            }
            Ok(Some(heap.alloc(Object::Bool(false))))
        }

        Form::Not => match args {
            [operand] => {
                let negated = !truthy_eval(heap, scope, *operand)?;
                Ok(Some(heap.alloc(Object::Bool(negated))))
            }
            _ => Err(SchemeError::runtime("not expects exactly one operand")),
        },

        Form::Define => apply_define(heap, scope, args),

        Form::Set => {
            let (target, expr) = two(form, args)?;
            let name = symbol_name(heap, target, form)?;
            let value = eval(heap, scope, expr)?;
            scope::assign(heap, scope, &name, value)?;
            Ok(None)
        }

        Form::SetCar | Form::SetCdr => {
            let (target, expr) = two(form, args)?;
            let cell = eval(heap, scope, target)?.ok_or_else(|| {
                SchemeError::Runtime(format!("{} expects a pair", form.name()))
            })?;
            let value = eval(heap, scope, expr)?;
            match heap.get_mut(cell) {
                Object::Cell(pair) => {
                    if form == Form::SetCar {
                        pair.first = value;
                    } else {
                        pair.second = value;
                    }
                    Ok(None)
                }
                other => Err(SchemeError::Runtime(format!(
                    "{} expects a pair, got {}",
                    form.name(),
                    other.kind()
                ))),
            }
        }

        Form::Lambda => {
            if args.len() < 2 {
                return Err(SchemeError::syntax(
                    "lambda expects a parameter list and a body",
                ));
            }
            make_lambda(heap, scope, args[0], &args[1..])
        }
    }
}

/// `(define name expr)` or the function sugar
/// `(define (name params...) body...)`.
fn apply_define(heap: &mut Heap, scope: ObjRef, args: &[Option<ObjRef>]) -> Result<Option<ObjRef>> {
    if args.len() < 2 {
        return Err(SchemeError::syntax("define expects a target and a value"));
    }

    let is_sugar = matches!(
        args[0].map(|handle| heap.get(handle)),
        Some(Object::Cell(_))
    );
    if is_sugar {
        let signature = match args[0].map(|handle| heap.get(handle)) {
            Some(Object::Cell(pair)) => *pair,
            _ => unreachable!(),
        };
        let name = symbol_name(heap, signature.first, Form::Define)?;
        let lambda = make_lambda(heap, scope, signature.second, &args[1..])?;
        scope::define(heap, scope, &name, lambda);
        return Ok(None);
    }

    if args.len() != 2 {
        return Err(SchemeError::syntax("define expects a target and a value"));
    }
    let name = symbol_name(heap, args[0], Form::Define)?;
    let value = eval(heap, scope, args[1])?;
    scope::define(heap, scope, &name, value);
    Ok(None)
}

/// Build a lambda object from a parameter list structure and body
/// expressions, capturing `scope` as the defining scope.
fn make_lambda(
    heap: &mut Heap,
    scope: ObjRef,
    params: Option<ObjRef>,
    body: &[Option<ObjRef>],
) -> Result<Option<ObjRef>> {
    if let Some(handle) = params {
        if !matches!(heap.get(handle), Object::Cell(_)) {
            return Err(SchemeError::runtime("lambda parameter list must be a list"));
        }
    }

    let mut names = Vec::new();
    for param in list_to_vec(heap, params) {
        names.push(symbol_name(heap, param, Form::Lambda)?);
    }

    Ok(Some(heap.alloc(Object::Lambda(Lambda {
        params: names,
        body: body.to_vec(),
        scope,
    }))))
}

fn truthy_eval(heap: &mut Heap, scope: ObjRef, expr: Option<ObjRef>) -> Result<bool> {
    let value = eval(heap, scope, expr)?;
    Ok(truthy(heap, value))
}

fn two(form: Form, args: &[Option<ObjRef>]) -> Result<(Option<ObjRef>, Option<ObjRef>)> {
    match args {
        [a, b] => Ok((*a, *b)),
        _ => Err(SchemeError::Runtime(format!(
            "{} expects exactly two operands",
            form.name()
        ))),
    }
}

fn symbol_name(heap: &Heap, node: Option<ObjRef>, form: Form) -> Result<String> {
    match node.map(|handle| heap.get(handle)) {
        Some(Object::Symbol(name)) => Ok(name.clone()),
        other => Err(SchemeError::Runtime(format!(
            "{} expects a symbol, got {}",
            form.name(),
            other.map_or("()", |o| o.kind())
        ))),
    }
}
