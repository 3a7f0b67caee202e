//! `liftoff` library crate: a tree-walking interpreter for the Rocket
//! language.
//!
//! High-level layout:
//! - frontend: `lexer` + `parser` produce the shared AST (`ast`)
//! - `interpreter`: evaluator, lexical environments, and the value model
//! - `builtins`: fixed registry of global functions and per-type methods
pub mod ast;
pub mod builtins;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
