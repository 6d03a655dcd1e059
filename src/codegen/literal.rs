//! Literal encoding.
//!
//! Ints, floats, bools, and strings map to native JS literals. Characters
//! are boxed through the runtime `chr` helper: the box carries a
//! `valueOf()` returning the underlying single-character string, which is
//! what strict equality and `switch` dispatch compare against.

use crate::ir::Literal;

use super::js_ast::JsExpr;

pub fn encode(lit: &Literal) -> JsExpr {
    match lit {
        Literal::Int(n) => JsExpr::Int(*n),
        Literal::Float(n) => JsExpr::Float(*n),
        Literal::Bool(b) => JsExpr::Bool(*b),
        Literal::Chr(c) => JsExpr::Call(
            Box::new(JsExpr::Ref("chr".to_string())),
            vec![JsExpr::String(c.to_string())],
        ),
        Literal::Str(s) => JsExpr::String(s.clone()),
    }
}
