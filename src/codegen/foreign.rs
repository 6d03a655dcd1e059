//! Encoders and decoders for values crossing the port boundary.
//!
//! A [`ForeignType`] descriptor compiles to a JS expression referencing the
//! runtime JSON helper family: ground types are direct references, compound
//! types apply a combinator to the element's (de)serializer. Outgoing ports
//! encode, incoming ports and program flags decode.

use crate::ir::ForeignType;

use super::common::field;
use super::js_ast::JsExpr;

/// Build the serializer expression for an outgoing port.
pub fn encoder(ty: &ForeignType) -> JsExpr {
    converter(ty, "encode")
}

/// Build the deserializer expression for an incoming port or program flags.
pub fn decoder(ty: &ForeignType) -> JsExpr {
    converter(ty, "decode")
}

fn converter(ty: &ForeignType, direction: &str) -> JsExpr {
    match ty {
        ForeignType::Int => helper(direction, "Int"),
        ForeignType::Float => helper(direction, "Float"),
        ForeignType::Bool => helper(direction, "Bool"),
        ForeignType::String => helper(direction, "String"),
        ForeignType::Unit => helper(direction, "Unit"),
        ForeignType::Value => helper(direction, "Value"),
        ForeignType::List(inner) => JsExpr::Call(
            Box::new(helper(direction, "List")),
            vec![converter(inner, direction)],
        ),
        ForeignType::Maybe(inner) => JsExpr::Call(
            Box::new(helper(direction, "Maybe")),
            vec![converter(inner, direction)],
        ),
        ForeignType::Record(fields) => {
            let converters = fields
                .iter()
                .map(|(name, inner)| (field(*name), converter(inner, direction)))
                .collect();
            JsExpr::Call(
                Box::new(helper(direction, "Record")),
                vec![JsExpr::Object(converters)],
            )
        }
    }
}

fn helper(direction: &str, kind: &str) -> JsExpr {
    JsExpr::Ref(format!("{direction}{kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::print_expr;
    use crate::interner::intern;

    #[test]
    fn ground_types_are_direct_references() {
        assert_eq!(print_expr(&decoder(&ForeignType::Int)), "decodeInt");
        assert_eq!(print_expr(&encoder(&ForeignType::String)), "encodeString");
    }

    #[test]
    fn compound_types_apply_combinators() {
        let ty = ForeignType::List(Box::new(ForeignType::Maybe(Box::new(ForeignType::Int))));
        assert_eq!(
            print_expr(&decoder(&ty)),
            "decodeList(decodeMaybe(decodeInt))"
        );
    }

    #[test]
    fn record_types_build_a_field_table() {
        let ty = ForeignType::Record(vec![
            (intern("id"), ForeignType::Int),
            (intern("name"), ForeignType::String),
        ]);
        assert_eq!(
            print_expr(&encoder(&ty)),
            "encodeRecord({ id: encodeInt, name: encodeString })"
        );
    }
}
