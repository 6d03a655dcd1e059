//! JavaScript code generation backend for the Alder compiler.
//!
//! Alder is a strict, pure-functional, Hindley-Milner-typed language whose
//! runtime model is JavaScript. This crate is the final stage of the
//! compiler: it takes the optimizer's IR ([`ir::Expr`] / [`ir::Def`]) and
//! lowers it, one top-level definition at a time, into a structured
//! JavaScript AST ([`codegen::js_ast`]) ready for printing and linking.
//!
//! The interesting work lives in [`codegen::expression`]: the recursive
//! translation of expressions, the curried-function calling convention,
//! self-tail-call loops, and the compilation of pattern-match decision
//! trees into switches with labeled breaks.

pub mod codegen;
pub mod interner;
pub mod ir;

pub use codegen::expression::{generate, generate_def, generate_js_expr, Code, Generator};
pub use ir::InvalidIr;
