//! `tinylang` library crate.
//!
//! A tree-walking interpreter for TinyLang, a small C-style scripting
//! language with primitive types, arrays, first-class functions (the
//! `ComeAndDo` keyword) and single-inheritance classes.
//!
//! High-level layout:
//! - frontend: [`lexer`] + [`parser`] produce the shared AST ([`ast`])
//! - evaluation: [`interpreter`] walks the statements directly
//! - driver support: [`imports`] splices `import` statements before lexing

pub mod ast;
pub mod imports;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
