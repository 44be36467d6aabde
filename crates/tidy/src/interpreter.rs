//! The interpreter entry point tying the stages together

use crate::error::{Result, SchemeError};
use crate::eval;
use crate::heap::{Heap, ObjRef};
use crate::object::{Builtin, Form, Object};
use crate::parser;
use crate::print;
use crate::scope;
use crate::tokenizer::Tokenizer;

/// Everything bound in the global scope at startup.
const GLOBALS: &[(&str, Object)] = &[
    // Special forms
    ("quote", Object::Special(Form::Quote)),
    ("if", Object::Special(Form::If)),
    ("and", Object::Special(Form::And)),
    ("or", Object::Special(Form::Or)),
    ("not", Object::Special(Form::Not)),
    ("define", Object::Special(Form::Define)),
    ("set!", Object::Special(Form::Set)),
    ("set-car!", Object::Special(Form::SetCar)),
    ("set-cdr!", Object::Special(Form::SetCdr)),
    ("lambda", Object::Special(Form::Lambda)),
    // Integer functions
    ("+", Object::Builtin(Builtin::Add)),
    ("-", Object::Builtin(Builtin::Sub)),
    ("*", Object::Builtin(Builtin::Mul)),
    ("/", Object::Builtin(Builtin::Div)),
    ("=", Object::Builtin(Builtin::Eq)),
    ("<", Object::Builtin(Builtin::Lt)),
    (">", Object::Builtin(Builtin::Gt)),
    ("<=", Object::Builtin(Builtin::Le)),
    (">=", Object::Builtin(Builtin::Ge)),
    ("abs", Object::Builtin(Builtin::Abs)),
    ("min", Object::Builtin(Builtin::Min)),
    ("max", Object::Builtin(Builtin::Max)),
    // Predicates
    ("number?", Object::Builtin(Builtin::IsNumber)),
    ("boolean?", Object::Builtin(Builtin::IsBool)),
    ("symbol?", Object::Builtin(Builtin::IsSymbol)),
    // List functions
    ("car", Object::Builtin(Builtin::Car)),
    ("cdr", Object::Builtin(Builtin::Cdr)),
    ("cons", Object::Builtin(Builtin::Cons)),
    ("list", Object::Builtin(Builtin::List)),
    ("list?", Object::Builtin(Builtin::IsList)),
    ("pair?", Object::Builtin(Builtin::IsPair)),
    ("null?", Object::Builtin(Builtin::IsNull)),
    ("list-ref", Object::Builtin(Builtin::ListRef)),
    ("list-tail", Object::Builtin(Builtin::ListTail)),
];

/// A ready-to-run interpreter: a heap and a populated global scope.
///
/// State (definitions, mutations) persists across [`run`](Interpreter::run)
/// calls; garbage is collected after each one. A failed run leaves the
/// heap valid for the next call.
pub struct Interpreter {
    heap: Heap,
    global: ObjRef,
}

impl Interpreter {
    /// A fresh interpreter with the standard global bindings.
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let global = scope::new_scope(&mut heap, None);
        for (name, object) in GLOBALS {
            let value = heap.alloc(object.clone());
            scope::define(&mut heap, global, name, Some(value));
        }
        Self { heap, global }
    }

    /// Evaluate one expression and render its result.
    ///
    /// Parse, evaluate against the global scope, serialize, then run
    /// exactly one mark-and-sweep pass before returning.
    pub fn run(&mut self, source: &str) -> Result<String> {
        let outcome = self.run_one(source);
        self.heap.mark_and_sweep([self.global]);
        outcome
    }

    /// Evaluate every expression in `source` in order, collecting after
    /// each one. Stops at the first error.
    pub fn run_all(&mut self, source: &str) -> Result<Vec<String>> {
        let mut tokenizer = Tokenizer::new(source)?;
        let mut rendered = Vec::new();
        while !tokenizer.is_end() {
            let expr = parser::read(&mut self.heap, &mut tokenizer)?;
            let outcome = eval::eval(&mut self.heap, self.global, expr)
                .map(|result| print::print(&self.heap, result));
            self.heap.mark_and_sweep([self.global]);
            rendered.push(outcome?);
        }
        Ok(rendered)
    }

    /// The heap, exposed for inspection (live-object counts in tests,
    /// diagnostics in the REPL).
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Run a collection pass rooted at the global scope.
    pub fn collect(&mut self) {
        self.heap.mark_and_sweep([self.global]);
    }

    fn run_one(&mut self, source: &str) -> Result<String> {
        let mut tokenizer = Tokenizer::new(source)?;
        let expr = parser::read(&mut self.heap, &mut tokenizer)?;
        if !tokenizer.is_end() {
            return Err(SchemeError::syntax("trailing input after expression"));
        }
        let result = eval::eval(&mut self.heap, self.global, expr)?;
        Ok(print::print(&self.heap, result))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
