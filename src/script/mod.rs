//! The sketch language: a small JavaScript-like subset, parsed into an AST and evaluated by a
//! tree walker.
//!
//! Supported: `let`/`const`/`var`, functions (declarations and expressions, no closures over
//! enclosing locals), `if`/`else`, `while`, `for(;;)`, `for (x of xs)`, `break`/`continue`/
//! `return`, array and object literals, the usual operators, and optional semicolons.

pub(crate) mod ast;
pub(crate) mod builtins;
pub(crate) mod error;
pub(crate) mod interp;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod value;

pub(crate) use interp::{Host, Interpreter, Interrupt};
pub(crate) use parser::parse_program;
