//! Pretty-printer for the JavaScript AST.
//!
//! Produces readable output with two-space indentation and precedence-aware
//! parenthesization. Operands of bitwise and shift operators are always
//! grouped explicitly (`(7 / 2) | 0`), matching how the runtime library is
//! written and keeping the integer-division idiom recognizable.

use super::common::is_valid_js_identifier;
use super::js_ast::*;

/// Render a statement sequence, one top-level statement per line group.
pub fn print_stmts(stmts: &[JsStmt]) -> String {
    let mut p = Printer::new();
    for stmt in stmts {
        p.print_stmt(stmt);
    }
    p.output
}

/// Render a single expression (used by tests and diagnostics).
pub fn print_expr(expr: &JsExpr) -> String {
    let mut p = Printer::new();
    p.print_expr(expr, 0);
    p.output
}

struct Printer {
    output: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Printer {
            output: String::new(),
            indent: 0,
        }
    }

    fn print_stmt(&mut self, stmt: &JsStmt) {
        match stmt {
            JsStmt::Block(stmts) => {
                self.print_indent();
                self.writeln("{");
                self.print_body_stmts(stmts);
                self.print_indent();
                self.writeln("}");
            }
            JsStmt::Var(name, init) => {
                self.print_indent();
                self.write("var ");
                self.write(name);
                self.write(" = ");
                self.print_expr(init, 0);
                self.writeln(";");
            }
            JsStmt::Vars(decls) => {
                self.print_indent();
                self.write("var ");
                for (i, (name, init)) in decls.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(name);
                    self.write(" = ");
                    self.print_expr(init, 0);
                }
                self.writeln(";");
            }
            JsStmt::Assign(target, value) => {
                self.print_indent();
                self.print_expr(target, 0);
                self.write(" = ");
                self.print_expr(value, 0);
                self.writeln(";");
            }
            JsStmt::Return(expr) => {
                self.print_indent();
                self.write("return ");
                self.print_expr(expr, 0);
                self.writeln(";");
            }
            JsStmt::If(cond, then_stmt, else_stmt) => {
                self.print_indent();
                self.print_if_chain(cond, then_stmt, else_stmt);
            }
            JsStmt::While(cond, body) => {
                self.print_indent();
                self.write("while (");
                self.print_expr(cond, 0);
                self.writeln(") {");
                self.print_body(body);
                self.print_indent();
                self.writeln("}");
            }
            JsStmt::DoWhile(cond, body) => {
                self.print_indent();
                self.writeln("do {");
                self.print_body(body);
                self.print_indent();
                self.write("} while (");
                self.print_expr(cond, 0);
                self.writeln(");");
            }
            JsStmt::Labeled(label, body) => {
                self.print_indent();
                self.write(label);
                self.writeln(":");
                self.print_stmt(body);
            }
            JsStmt::Break(label) => {
                self.print_indent();
                match label {
                    Some(l) => {
                        self.write("break ");
                        self.write(l);
                        self.writeln(";");
                    }
                    None => self.writeln("break;"),
                }
            }
            JsStmt::Continue(label) => {
                self.print_indent();
                match label {
                    Some(l) => {
                        self.write("continue ");
                        self.write(l);
                        self.writeln(";");
                    }
                    None => self.writeln("continue;"),
                }
            }
            JsStmt::Switch(scrutinee, clauses) => {
                self.print_indent();
                self.write("switch (");
                self.print_expr(scrutinee, 0);
                self.writeln(") {");
                self.indent += 1;
                for clause in clauses {
                    match clause {
                        SwitchClause::Case(value, stmts) => {
                            self.print_indent();
                            self.write("case ");
                            self.print_expr(value, 0);
                            self.writeln(":");
                            self.print_body_stmts(stmts);
                        }
                        SwitchClause::Default(stmts) => {
                            self.print_indent();
                            self.writeln("default:");
                            self.print_body_stmts(stmts);
                        }
                    }
                }
                self.indent -= 1;
                self.print_indent();
                self.writeln("}");
            }
        }
    }

    /// `if (…) { … } else if (…) { … } else { … }`, flattening a statement
    /// `else` that is itself an `If`. The caller has printed the indent.
    fn print_if_chain(&mut self, cond: &JsExpr, then_stmt: &JsStmt, else_stmt: &JsStmt) {
        self.write("if (");
        self.print_expr(cond, 0);
        self.writeln(") {");
        self.print_body(then_stmt);
        self.print_indent();
        match else_stmt {
            JsStmt::If(c, t, e) => {
                self.write("} else ");
                self.print_if_chain(c, t, e);
            }
            _ => {
                self.writeln("} else {");
                self.print_body(else_stmt);
                self.print_indent();
                self.writeln("}");
            }
        }
    }

    /// Print a statement as the inside of a braced body, flattening blocks.
    fn print_body(&mut self, stmt: &JsStmt) {
        match stmt {
            JsStmt::Block(stmts) => self.print_body_stmts(stmts),
            _ => {
                self.indent += 1;
                self.print_stmt(stmt);
                self.indent -= 1;
            }
        }
    }

    fn print_body_stmts(&mut self, stmts: &[JsStmt]) {
        self.indent += 1;
        for stmt in stmts {
            self.print_stmt(stmt);
        }
        self.indent -= 1;
    }

    fn print_expr(&mut self, expr: &JsExpr, parent_prec: u8) {
        let prec = expr_precedence(expr);
        let needs_parens = prec < parent_prec;
        if needs_parens {
            self.write("(");
        }

        match expr {
            JsExpr::String(s) => {
                self.write("\"");
                self.write(&escape_js_string(s));
                self.write("\"");
            }
            JsExpr::Float(n) => {
                if *n < 0.0 {
                    self.write(&format!("({})", n));
                } else {
                    self.write(&format!("{}", n));
                }
            }
            JsExpr::Int(n) => {
                if *n < 0 {
                    self.write(&format!("({})", n));
                } else {
                    self.write(&format!("{}", n));
                }
            }
            JsExpr::Bool(b) => {
                self.write(if *b { "true" } else { "false" });
            }
            JsExpr::Array(entries) => {
                self.write("[");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expr(entry, 0);
                }
                self.write("]");
            }
            JsExpr::Object(fields) => {
                if fields.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    for (i, (key, value)) in fields.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        if is_valid_js_identifier(key) {
                            self.write(key);
                        } else {
                            self.write("\"");
                            self.write(&escape_js_string(key));
                            self.write("\"");
                        }
                        self.write(": ");
                        self.print_expr(value, 0);
                    }
                    self.write(" }");
                }
            }
            JsExpr::Ref(name) => {
                self.write(name);
            }
            JsExpr::Access(object, field) => {
                self.print_expr(object, PREC_MEMBER);
                if is_valid_js_identifier(field) {
                    self.write(".");
                    self.write(field);
                } else {
                    self.write("[\"");
                    self.write(&escape_js_string(field));
                    self.write("\"]");
                }
            }
            JsExpr::Function(params, body) => {
                self.write("function(");
                self.write(&params.join(", "));
                self.writeln(") {");
                self.print_body_stmts(body);
                self.print_indent();
                self.write("}");
            }
            JsExpr::Call(callee, args) => {
                self.print_expr(callee, PREC_CALL);
                self.write("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expr(arg, 0);
                }
                self.write(")");
            }
            JsExpr::Prefix(op, operand) => {
                self.write(prefix_op_str(*op));
                // `- -x` must not fuse into a decrement token
                let ctx = match op {
                    PrefixOp::Negate => PREC_UNARY + 1,
                    _ => PREC_UNARY,
                };
                self.print_expr(operand, ctx);
            }
            JsExpr::Infix(op, left, right) => {
                let op_prec = infix_precedence(*op);
                let (left_ctx, right_ctx) = if is_bitwise(*op) {
                    (PREC_UNARY, PREC_UNARY)
                } else {
                    (op_prec, op_prec + 1)
                };
                self.print_expr(left, left_ctx);
                self.write(" ");
                self.write(infix_op_str(*op));
                self.write(" ");
                self.print_expr(right, right_ctx);
            }
            JsExpr::If(cond, then_expr, else_expr) => {
                self.print_expr(cond, PREC_TERNARY + 1);
                self.write(" ? ");
                self.print_expr(then_expr, 0);
                self.write(" : ");
                self.print_expr(else_expr, 0);
            }
        }

        if needs_parens {
            self.write(")");
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn print_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }
}

// Precedence levels (higher binds tighter)
const PREC_TERNARY: u8 = 3;
const PREC_OR: u8 = 5;
const PREC_AND: u8 = 6;
const PREC_BITOR: u8 = 7;
const PREC_BITXOR: u8 = 8;
const PREC_BITAND: u8 = 9;
const PREC_EQUALITY: u8 = 10;
const PREC_RELATIONAL: u8 = 11;
const PREC_SHIFT: u8 = 12;
const PREC_ADDITIVE: u8 = 13;
const PREC_MULTIPLICATIVE: u8 = 14;
const PREC_UNARY: u8 = 15;
const PREC_CALL: u8 = 18;
const PREC_MEMBER: u8 = 19;
const PREC_ATOM: u8 = 20;

fn expr_precedence(expr: &JsExpr) -> u8 {
    match expr {
        JsExpr::If(..) => PREC_TERNARY,
        JsExpr::Infix(op, ..) => infix_precedence(*op),
        JsExpr::Prefix(..) => PREC_UNARY,
        JsExpr::Call(..) => PREC_CALL,
        JsExpr::Access(..) => PREC_MEMBER,
        JsExpr::Function(..) => 1,
        _ => PREC_ATOM,
    }
}

fn infix_precedence(op: InfixOp) -> u8 {
    match op {
        InfixOp::Or => PREC_OR,
        InfixOp::And => PREC_AND,
        InfixOp::BitOr => PREC_BITOR,
        InfixOp::BitXor => PREC_BITXOR,
        InfixOp::BitAnd => PREC_BITAND,
        InfixOp::StrictEq => PREC_EQUALITY,
        InfixOp::Lt | InfixOp::Gt => PREC_RELATIONAL,
        InfixOp::Shl | InfixOp::Sar | InfixOp::Shr => PREC_SHIFT,
        InfixOp::Add | InfixOp::Sub => PREC_ADDITIVE,
        InfixOp::Mul | InfixOp::Div => PREC_MULTIPLICATIVE,
    }
}

fn is_bitwise(op: InfixOp) -> bool {
    matches!(
        op,
        InfixOp::BitAnd
            | InfixOp::BitOr
            | InfixOp::BitXor
            | InfixOp::Shl
            | InfixOp::Sar
            | InfixOp::Shr
    )
}

fn prefix_op_str(op: PrefixOp) -> &'static str {
    match op {
        PrefixOp::Not => "!",
        PrefixOp::Negate => "-",
        PrefixOp::Complement => "~",
    }
}

fn infix_op_str(op: InfixOp) -> &'static str {
    match op {
        InfixOp::Add => "+",
        InfixOp::Sub => "-",
        InfixOp::Mul => "*",
        InfixOp::Div => "/",
        InfixOp::And => "&&",
        InfixOp::Or => "||",
        InfixOp::StrictEq => "===",
        InfixOp::Lt => "<",
        InfixOp::Gt => ">",
        InfixOp::BitAnd => "&",
        InfixOp::BitOr => "|",
        InfixOp::BitXor => "^",
        InfixOp::Shl => "<<",
        InfixOp::Sar => ">>",
        InfixOp::Shr => ">>>",
    }
}

/// Escape a string for a double-quoted JS string literal.
fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> JsExpr {
        JsExpr::Int(n)
    }

    fn var(name: &str) -> JsExpr {
        JsExpr::Ref(name.to_string())
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let e = JsExpr::Infix(
            InfixOp::Add,
            Box::new(JsExpr::Infix(InfixOp::Mul, Box::new(int(2)), Box::new(int(3)))),
            Box::new(int(4)),
        );
        assert_eq!(print_expr(&e), "2 * 3 + 4");
    }

    #[test]
    fn addition_under_multiplication_is_grouped() {
        let e = JsExpr::Infix(
            InfixOp::Mul,
            Box::new(JsExpr::Infix(InfixOp::Add, Box::new(int(2)), Box::new(int(3)))),
            Box::new(int(4)),
        );
        assert_eq!(print_expr(&e), "(2 + 3) * 4");
    }

    #[test]
    fn bitwise_operands_are_grouped_explicitly() {
        let e = JsExpr::Infix(
            InfixOp::BitOr,
            Box::new(JsExpr::Infix(InfixOp::Div, Box::new(int(7)), Box::new(int(2)))),
            Box::new(int(0)),
        );
        assert_eq!(print_expr(&e), "(7 / 2) | 0");
    }

    #[test]
    fn shift_with_atomic_operands_stays_bare() {
        let e = JsExpr::Infix(InfixOp::Shl, Box::new(var("x")), Box::new(var("n")));
        assert_eq!(print_expr(&e), "x << n");
    }

    #[test]
    fn and_chain_left_fold_needs_no_parens() {
        let eq = |l: JsExpr, r: JsExpr| {
            JsExpr::Infix(InfixOp::StrictEq, Box::new(l), Box::new(r))
        };
        let e = JsExpr::Infix(
            InfixOp::And,
            Box::new(JsExpr::Infix(
                InfixOp::And,
                Box::new(eq(var("a"), int(1))),
                Box::new(eq(var("b"), int(2))),
            )),
            Box::new(eq(var("c"), int(3))),
        );
        assert_eq!(print_expr(&e), "a === 1 && b === 2 && c === 3");
    }

    #[test]
    fn ternary_chain_is_right_associated() {
        let e = JsExpr::If(
            Box::new(var("a")),
            Box::new(int(1)),
            Box::new(JsExpr::If(Box::new(var("b")), Box::new(int(2)), Box::new(int(3)))),
        );
        assert_eq!(print_expr(&e), "a ? 1 : b ? 2 : 3");
    }

    #[test]
    fn iife_gets_parenthesized() {
        let e = JsExpr::Call(
            Box::new(JsExpr::Function(vec![], vec![JsStmt::Return(int(1))])),
            vec![],
        );
        assert_eq!(print_expr(&e), "(function() {\n  return 1;\n})()");
    }

    #[test]
    fn dot_vs_bracket_member_access() {
        let dot = JsExpr::Access(Box::new(var("obj")), "name".to_string());
        assert_eq!(print_expr(&dot), "obj.name");
        let bracket = JsExpr::Access(Box::new(var("obj")), "my-key".to_string());
        assert_eq!(print_expr(&bracket), "obj[\"my-key\"]");
    }

    #[test]
    fn negative_literals_are_parenthesized() {
        let e = JsExpr::Infix(
            InfixOp::Gt,
            Box::new(JsExpr::Call(Box::new(var("cmp")), vec![var("a"), var("b")])),
            Box::new(int(-1)),
        );
        assert_eq!(print_expr(&e), "cmp(a, b) > (-1)");
    }

    #[test]
    fn object_literal_is_inline() {
        let e = JsExpr::Object(vec![
            ("ctor".to_string(), JsExpr::String("Just".to_string())),
            ("_0".to_string(), int(1)),
        ]);
        assert_eq!(print_expr(&e), "{ ctor: \"Just\", _0: 1 }");
    }

    #[test]
    fn else_if_chains_flatten() {
        let stmt = JsStmt::If(
            var("a"),
            Box::new(JsStmt::Return(int(1))),
            Box::new(JsStmt::If(
                var("b"),
                Box::new(JsStmt::Return(int(2))),
                Box::new(JsStmt::Return(int(3))),
            )),
        );
        assert_eq!(
            print_stmts(&[stmt]),
            "if (a) {\n  return 1;\n} else if (b) {\n  return 2;\n} else {\n  return 3;\n}\n"
        );
    }

    #[test]
    fn labeled_do_while_false() {
        let stmt = JsStmt::Labeled(
            "_v0_0".to_string(),
            Box::new(JsStmt::DoWhile(
                JsExpr::Bool(false),
                Box::new(JsStmt::Block(vec![JsStmt::Break(Some("_v0_0".to_string()))])),
            )),
        );
        assert_eq!(
            print_stmts(&[stmt]),
            "_v0_0:\ndo {\n  break _v0_0;\n} while (false);\n"
        );
    }

    #[test]
    fn switch_clauses() {
        let stmt = JsStmt::Switch(
            JsExpr::Access(Box::new(var("x")), "ctor".to_string()),
            vec![
                SwitchClause::Case(
                    JsExpr::String("A".to_string()),
                    vec![JsStmt::Return(int(1))],
                ),
                SwitchClause::Default(vec![JsStmt::Break(Some("_v0_0".to_string()))]),
            ],
        );
        assert_eq!(
            print_stmts(&[stmt]),
            "switch (x.ctor) {\n  case \"A\":\n    return 1;\n  default:\n    break _v0_0;\n}\n"
        );
    }

    #[test]
    fn multi_declarator_var() {
        let stmt = JsStmt::Vars(vec![
            ("_v0".to_string(), int(1)),
            ("_v1".to_string(), int(2)),
        ]);
        assert_eq!(print_stmts(&[stmt]), "var _v0 = 1, _v1 = 2;\n");
    }

    #[test]
    fn string_escaping() {
        assert_eq!(escape_js_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_js_string("back\\slash"), "back\\\\slash");
    }
}
