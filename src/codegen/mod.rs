//! Lowering from optimized IR to JavaScript.
//!
//! [`expression`] holds the recursive translator; [`js_ast`] the structured
//! output it builds; [`printer`] renders that AST to source text;
//! [`common`] owns identifier mangling and fresh-name minting; [`literal`]
//! and [`foreign`] encode literals and port (de)serializers.

pub mod common;
pub mod expression;
pub mod foreign;
pub mod js_ast;
pub mod literal;
pub mod printer;
