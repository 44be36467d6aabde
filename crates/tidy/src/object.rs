//! The object model: a closed sum over every heap-resident value

use indexmap::IndexMap;

use crate::heap::ObjRef;

/// A heap-resident value.
///
/// Edges between objects are [`ObjRef`] arena handles; the empty list is
/// not an object but an absent edge (`None`). The closed set of variants
/// lets the collector's traversal and the evaluator's dispatch both be a
/// single `match`.
#[derive(Debug, Clone)]
pub enum Object {
    /// 64-bit integer
    Number(i64),
    /// Boolean
    Bool(bool),
    /// Symbol with its name
    Symbol(String),
    /// Cons cell (ordered pair), the list building block
    Cell(Pair),
    /// Built-in function evaluating all arguments left to right
    Builtin(Builtin),
    /// Special form receiving its arguments unevaluated
    Special(Form),
    /// User-defined lambda with its captured scope
    Lambda(Lambda),
    /// A variable scope; heap-resident because closures keep scope
    /// chains alive and can make them cyclic
    Scope(Scope),
}

impl Object {
    /// Short variant name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Number(_) => "number",
            Object::Bool(_) => "boolean",
            Object::Symbol(_) => "symbol",
            Object::Cell(_) => "pair",
            Object::Builtin(_) => "builtin",
            Object::Special(_) => "special form",
            Object::Lambda(_) => "lambda",
            Object::Scope(_) => "scope",
        }
    }

    /// The integer payload, if this is a number.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Object::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The symbol name, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Object::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The pair payload, if this is a cons cell.
    pub fn as_cell(&self) -> Option<Pair> {
        match self {
            Object::Cell(pair) => Some(*pair),
            _ => None,
        }
    }
}

/// The two slots of a cons cell. `None` is the empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pair {
    /// The `car` slot
    pub first: Option<ObjRef>,
    /// The `cdr` slot
    pub second: Option<ObjRef>,
}

/// A user-defined function: parameter names, body expressions, and the
/// scope captured at the definition site.
#[derive(Debug, Clone)]
pub struct Lambda {
    /// Parameter names bound at each call
    pub params: Vec<String>,
    /// Body expressions, evaluated in sequence; the last one's value is
    /// the call's value
    pub body: Vec<Option<ObjRef>>,
    /// The defining scope, parent of every call scope
    pub scope: ObjRef,
}

/// A mapping from symbol name to value plus a back-reference to the
/// enclosing scope. Scope chains form a tree, except that captured
/// closures can keep chains alive and cyclic after their defining call
/// returns.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// The enclosing scope (`None` for the global scope)
    pub parent: Option<ObjRef>,
    /// Bindings in insertion order
    pub bindings: IndexMap<String, Option<ObjRef>>,
}

/// Built-in functions. Arguments arrive already evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Builtin {
    // Integer functions
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Abs,
    Min,
    Max,

    // Predicates
    IsNumber,
    IsBool,
    IsSymbol,

    // List functions
    Car,
    Cdr,
    Cons,
    List,
    IsList,
    IsPair,
    IsNull,
    ListRef,
    ListTail,
}

impl Builtin {
    /// The surface-syntax name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Eq => "=",
            Builtin::Lt => "<",
            Builtin::Gt => ">",
            Builtin::Le => "<=",
            Builtin::Ge => ">=",
            Builtin::Abs => "abs",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::IsNumber => "number?",
            Builtin::IsBool => "boolean?",
            Builtin::IsSymbol => "symbol?",
            Builtin::Car => "car",
            Builtin::Cdr => "cdr",
            Builtin::Cons => "cons",
            Builtin::List => "list",
            Builtin::IsList => "list?",
            Builtin::IsPair => "pair?",
            Builtin::IsNull => "null?",
            Builtin::ListRef => "list-ref",
            Builtin::ListTail => "list-tail",
        }
    }
}

/// Special forms. Arguments arrive unevaluated; each form decides
/// internally which sub-expressions to evaluate, which is what makes
/// short-circuiting and deferred binding possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Form {
    Quote,
    If,
    And,
    Or,
    Not,
    Define,
    Set,
    SetCar,
    SetCdr,
    Lambda,
}

impl Form {
    /// The surface-syntax name.
    pub fn name(self) -> &'static str {
        match self {
            Form::Quote => "quote",
            Form::If => "if",
            Form::And => "and",
            Form::Or => "or",
            Form::Not => "not",
            Form::Define => "define",
            Form::Set => "set!",
            Form::SetCar => "set-car!",
            Form::SetCdr => "set-cdr!",
            Form::Lambda => "lambda",
        }
    }
}
