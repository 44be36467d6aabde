//! Error types for the interpreter

use thiserror::Error;

/// Errors surfaced by [`Interpreter::run`](crate::Interpreter::run).
///
/// None of these are recovered internally: each aborts the current
/// top-level call. The heap stays valid for the next call regardless,
/// because allocation is append-only and collection is idempotent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    /// Malformed token or expression shape: unbalanced brackets, a bad
    /// literal, a stray quote or dot.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A symbol did not resolve anywhere in the scope chain.
    #[error("name error: undefined symbol `{0}`")]
    Name(String),

    /// Type mismatch in a built-in, wrong arity, or applying a
    /// non-function.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl SchemeError {
    /// A [`SchemeError::Syntax`] from anything message-like.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// A [`SchemeError::Name`] for an unresolved symbol.
    pub fn name(symbol: impl Into<String>) -> Self {
        Self::Name(symbol.into())
    }

    /// A [`SchemeError::Runtime`] from anything message-like.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}

/// Result type alias for interpreter operations
pub type Result<T> = std::result::Result<T, SchemeError>;
