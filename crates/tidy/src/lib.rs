//! # tidy
//!
//! A tree-walking interpreter for a small Scheme, with a mark-and-sweep
//! collected heap.
//!
//! ## Architecture
//!
//! - **Tokenizer**: character stream → typed tokens
//! - **Parser**: recursive-descent reader building cons-cell graphs in the
//!   heap
//! - **Heap**: the single allocation arena; every object lives in it and
//!   dies only during a collection pass
//! - **Eval**: recursive evaluator threading the active scope explicitly
//! - **Printer**: result object → surface syntax
//!
//! Scopes and closures live in the same heap as data, because recursive
//! closures form reference cycles that plain reference counting would
//! leak. [`Interpreter::run`] evaluates one expression and then runs
//! exactly one [`Heap::mark_and_sweep`] pass rooted at the global scope.
//!
//! ```
//! use tidy::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! assert_eq!(interp.run("(+ 1 2 3)").unwrap(), "6");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod eval;
pub mod heap;
pub mod interpreter;
pub mod object;
pub mod parser;
pub mod print;
pub mod scope;
pub mod tokenizer;

// Re-export main types
pub use error::{Result, SchemeError};
pub use eval::eval;
pub use heap::{Heap, ObjRef};
pub use interpreter::Interpreter;
pub use object::{Builtin, Form, Lambda, Object, Pair, Scope};
pub use print::print;
pub use tokenizer::{Token, Tokenizer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
