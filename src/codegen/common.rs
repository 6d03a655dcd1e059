//! Identifier mangling for JavaScript emission.
//!
//! Three disjoint lexical spaces keep the output collision-free:
//!
//! - user locals and fields: escaped source names, `$$`-prefixed when they
//!   collide with a JS reserved word, a standard global, or a runtime
//!   helper (source identifiers start with a letter and never contain `$`);
//! - qualified globals: `Module$name` — the `$` separator cannot appear in
//!   a source module segment, so globals never collide with locals;
//! - generator temporaries and labels: `_vN` — source identifiers never
//!   start with an underscore.

use crate::interner::resolve_or_empty;
use crate::ir::{ModuleName, Name};

use super::js_ast::{JsExpr, JsStmt};

/// Mangle a locally scoped identifier.
pub fn local(name: Name) -> String {
    let escaped = escape_name(&resolve_or_empty(name));
    if is_reserved_word(&escaped) || is_js_builtin(&escaped) || is_runtime_helper(&escaped) {
        format!("$${escaped}")
    } else {
        escaped
    }
}

/// Mangle a record field name. Fields live in their own object, so only
/// reserved words need the prefix.
pub fn field(name: Name) -> String {
    let escaped = escape_name(&resolve_or_empty(name));
    if is_reserved_word(&escaped) {
        format!("$${escaped}")
    } else {
        escaped
    }
}

/// Mangle a qualified top-level reference: `Data.List` + `foldl` becomes
/// `Data$List$foldl`. Operator names go through the same escape table, so
/// `Basics` + `+` becomes `Basics$$plus`.
pub fn global(home: ModuleName, name: Name) -> String {
    let module = resolve_or_empty(home).replace('.', "$");
    let escaped = escape_name(&resolve_or_empty(name));
    format!("{module}${escaped}")
}

/// The counter-based fresh-name family.
pub fn fresh(n: usize) -> String {
    format!("_v{n}")
}

/// Emit the module-scoped declaration for one top-level definition. Export
/// wiring is the linker's concern; it appends to whatever this returns.
pub fn define_global(home: ModuleName, name: Name, expr: JsExpr) -> Vec<JsStmt> {
    vec![JsStmt::Var(global(home, name), expr)]
}

/// Escape operator characters so any source name becomes a JS identifier.
fn escape_name(name: &str) -> String {
    if name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match escape_char(ch) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(ch),
        }
    }
    out
}

fn escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '=' => Some("$eq"),
        '<' => Some("$less"),
        '>' => Some("$greater"),
        '!' => Some("$bang"),
        '%' => Some("$percent"),
        '^' => Some("$up"),
        '&' => Some("$amp"),
        '|' => Some("$bar"),
        '*' => Some("$times"),
        '/' => Some("$div"),
        '+' => Some("$plus"),
        '-' => Some("$minus"),
        ':' => Some("$colon"),
        '.' => Some("$dot"),
        '\'' => Some("$prime"),
        '?' => Some("$qmark"),
        '~' => Some("$tilde"),
        '@' => Some("$at"),
        '#' => Some("$hash"),
        '$' => Some("$dollar"),
        '\\' => Some("$bslash"),
        _ => None,
    }
}

/// JavaScript reserved words (including future and strict-mode reservations
/// and the literal keywords).
pub fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "implements"
            | "import"
            | "in"
            | "instanceof"
            | "interface"
            | "let"
            | "new"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "static"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
            | "await"
            | "null"
            | "true"
            | "false"
    )
}

/// Standard globals the emitted code may reference directly (`Math.pow`).
pub fn is_js_builtin(name: &str) -> bool {
    matches!(
        name,
        "Array"
            | "Boolean"
            | "Date"
            | "Error"
            | "Function"
            | "Infinity"
            | "JSON"
            | "Map"
            | "Math"
            | "NaN"
            | "Number"
            | "Object"
            | "Promise"
            | "Proxy"
            | "Reflect"
            | "RegExp"
            | "Set"
            | "String"
            | "Symbol"
            | "WeakMap"
            | "WeakSet"
            | "arguments"
            | "console"
            | "eval"
            | "globalThis"
            | "isFinite"
            | "isNaN"
            | "parseFloat"
            | "parseInt"
            | "undefined"
    )
}

/// Runtime helper names the generator emits as plain identifiers. A user
/// binding spelled the same way must be renamed out of the way.
pub fn is_runtime_helper(name: &str) -> bool {
    matches!(
        name,
        "F2" | "F3"
            | "F4"
            | "F5"
            | "F6"
            | "F7"
            | "F8"
            | "F9"
            | "A2"
            | "A3"
            | "A4"
            | "A5"
            | "A6"
            | "A7"
            | "A8"
            | "A9"
            | "chr"
            | "list"
            | "cons"
            | "recordUpdate"
            | "eq"
            | "cmp"
            | "effect"
            | "outgoingPort"
            | "incomingPort"
            | "staticProgram"
            | "crash"
            | "decodeInt"
            | "decodeFloat"
            | "decodeBool"
            | "decodeString"
            | "decodeUnit"
            | "decodeValue"
            | "decodeList"
            | "decodeMaybe"
            | "decodeRecord"
            | "encodeInt"
            | "encodeFloat"
            | "encodeBool"
            | "encodeString"
            | "encodeUnit"
            | "encodeValue"
            | "encodeList"
            | "encodeMaybe"
            | "encodeRecord"
    )
}

/// Whether a string can be printed as a bare identifier (dot access and
/// unquoted object keys).
pub fn is_valid_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::intern;

    #[test]
    fn plain_locals_pass_through() {
        assert_eq!(local(intern("count")), "count");
        assert_eq!(local(intern("x1")), "x1");
    }

    #[test]
    fn reserved_words_are_prefixed() {
        assert_eq!(local(intern("class")), "$$class");
        assert_eq!(local(intern("default")), "$$default");
        assert_eq!(field(intern("switch")), "$$switch");
    }

    #[test]
    fn builtins_and_helpers_are_prefixed_for_locals_only() {
        assert_eq!(local(intern("Math")), "$$Math");
        assert_eq!(local(intern("eq")), "$$eq");
        assert_eq!(local(intern("F2")), "$$F2");
        // fields cannot shadow globals, so they keep their spelling
        assert_eq!(field(intern("eq")), "eq");
    }

    #[test]
    fn operator_names_escape() {
        assert_eq!(global(intern("Basics"), intern("+")), "Basics$$plus");
        assert_eq!(global(intern("List"), intern("::")), "List$$colon$colon");
        assert_eq!(local(intern("go'")), "go$prime");
    }

    #[test]
    fn dotted_modules_join_with_dollar() {
        assert_eq!(
            global(intern("Data.List"), intern("foldl")),
            "Data$List$foldl"
        );
    }

    #[test]
    fn fresh_names_count_up() {
        assert_eq!(fresh(0), "_v0");
        assert_eq!(fresh(12), "_v12");
    }

    #[test]
    fn valid_identifier_check() {
        assert!(is_valid_js_identifier("foo"));
        assert!(is_valid_js_identifier("_v0"));
        assert!(is_valid_js_identifier("$$class"));
        assert!(!is_valid_js_identifier(""));
        assert!(!is_valid_js_identifier("1abc"));
        assert!(!is_valid_js_identifier("a-b"));
    }
}
