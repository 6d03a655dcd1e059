//! Expression code generation.
//!
//! A pure recursive translator from optimized IR to the JS AST. Each
//! routine returns a [`Code`] envelope — an expression when the value fits
//! in one, a statement block when it cannot — and the envelope is coerced
//! only where the surrounding context demands, so an IIFE wrap appears in
//! the output only when genuinely unavoidable.
//!
//! The one piece of threaded state is a fresh-name counter on
//! [`Generator`], reset per top-level definition. Traversal is strictly
//! left-to-right, which makes temporary numbering (`_v0`, `_v1`, …) a
//! stable, observable part of the output.

use std::cell::Cell;

use crate::interner::resolve_or_empty;
use crate::ir::{
    Choice, Decider, Def, Expr, Global, Literal, ModuleName, Name, Path, Position, ProgramKind,
    Region, Test,
};

use super::common;
use super::foreign;
use super::js_ast::*;
use super::literal;

// ===== Code envelope =====

/// A compiled value: either producible as a single expression, or only as
/// a statement block.
#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    Expr(JsExpr),
    Block(Vec<JsStmt>),
}

impl Code {
    /// Coerce to a statement list (function bodies).
    pub fn to_stmt_list(self) -> Vec<JsStmt> {
        match self {
            Code::Expr(expr) => vec![JsStmt::Return(expr)],
            Code::Block(stmts) => stmts,
        }
    }

    /// Coerce to a single statement (loop and branch bodies).
    pub fn to_stmt(self) -> JsStmt {
        match self {
            Code::Expr(expr) => JsStmt::Return(expr),
            Code::Block(mut stmts) => {
                if stmts.len() == 1 {
                    stmts.remove(0)
                } else {
                    JsStmt::Block(stmts)
                }
            }
        }
    }

    /// Coerce to an expression. A block pays for an IIFE, so callers keep
    /// blocks in statement position whenever the context allows.
    pub fn to_expr(self) -> JsExpr {
        match self {
            Code::Expr(expr) => expr,
            Code::Block(stmts) => {
                JsExpr::Call(Box::new(JsExpr::Function(vec![], stmts)), vec![])
            }
        }
    }

    fn is_block(&self) -> bool {
        matches!(self, Code::Block(_))
    }
}

// ===== Generator context =====

/// Per-definition code generation context: a monotonically increasing
/// counter minting `_vN` temporaries and case labels.
pub struct Generator {
    fresh_counter: Cell<usize>,
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            fresh_counter: Cell::new(0),
        }
    }

    fn fresh_name(&self) -> String {
        let n = self.fresh_counter.get();
        self.fresh_counter.set(n + 1);
        common::fresh(n)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

// ===== Definitions =====

/// Lower one top-level definition to its module-scoped declaration.
pub fn generate_def(home: ModuleName, name: Name, def: &Def) -> Vec<JsStmt> {
    log::debug!(
        "generating {}.{}",
        resolve_or_empty(home),
        resolve_or_empty(name)
    );
    let ctx = Generator::new();
    let expr = match def {
        Def::Def(body) => generate_js_expr(&ctx, body),
        Def::TailDef(args, body) => generate_tail_fn(&ctx, &common::local(name), args, body),
    };
    common::define_global(home, name, expr)
}

// ===== Expressions =====

/// Translate an expression, producing whichever envelope shape it needs.
pub fn generate(ctx: &Generator, expr: &Expr) -> Code {
    match expr {
        Expr::VarLocal(name) => Code::Expr(JsExpr::Ref(common::local(*name))),

        Expr::VarGlobal(var) => Code::Expr(JsExpr::Ref(common::global(var.home, var.name))),

        Expr::Literal(lit) => Code::Expr(literal::encode(lit)),

        Expr::Access(record, field) => Code::Expr(JsExpr::Access(
            Box::new(generate_js_expr(ctx, record)),
            common::field(*field),
        )),

        Expr::Update(record, fields) => {
            let record = generate_js_expr(ctx, record);
            let updates = generate_fields(ctx, fields);
            Code::Expr(JsExpr::Call(
                Box::new(runtime("recordUpdate")),
                vec![record, JsExpr::Object(updates)],
            ))
        }

        Expr::Record(fields) => Code::Expr(JsExpr::Object(generate_fields(ctx, fields))),

        Expr::Binop(op, left, right) => Code::Expr(generate_binop(ctx, op, left, right)),

        Expr::Function(args, body) => {
            let body = generate(ctx, body);
            Code::Expr(generate_function(args, body))
        }

        Expr::Call(func, args) => Code::Expr(generate_call(ctx, func, args)),

        Expr::TailCall(name, args) => Code::Block(generate_tail_call(ctx, *name, args)),

        Expr::Let(defs, body) => {
            let mut stmts = Vec::with_capacity(defs.len() + 1);
            for (name, def) in defs {
                stmts.push(generate_let_def(ctx, *name, def));
            }
            stmts.extend(generate(ctx, body).to_stmt_list());
            Code::Block(stmts)
        }

        Expr::If(branches, final_) => generate_if(ctx, branches, final_),

        Expr::Case(root, decider, jumps) => {
            Code::Block(generate_case(ctx, *root, decider, jumps))
        }

        Expr::List(entries) => {
            let entries = entries.iter().map(|e| generate_js_expr(ctx, e)).collect();
            Code::Expr(JsExpr::Call(
                Box::new(runtime("list")),
                vec![JsExpr::Array(entries)],
            ))
        }

        Expr::Ctor(tag, members) => {
            let mut fields = Vec::with_capacity(members.len() + 1);
            fields.push(("ctor".to_string(), JsExpr::String(resolve_or_empty(*tag))));
            for (index, member) in members.iter().enumerate() {
                fields.push((format!("_{index}"), generate_js_expr(ctx, member)));
            }
            Code::Expr(JsExpr::Object(fields))
        }

        Expr::CtorAccess(value, index) => Code::Expr(JsExpr::Access(
            Box::new(generate_js_expr(ctx, value)),
            format!("_{index}"),
        )),

        Expr::Cmd(home) | Expr::Sub(home) => Code::Expr(JsExpr::Call(
            Box::new(runtime("effect")),
            vec![JsExpr::String(resolve_or_empty(*home))],
        )),

        Expr::OutgoingPort(name, ty) => Code::Expr(JsExpr::Call(
            Box::new(runtime("outgoingPort")),
            vec![JsExpr::String(resolve_or_empty(*name)), foreign::encoder(ty)],
        )),

        Expr::IncomingPort(name, ty) => Code::Expr(JsExpr::Call(
            Box::new(runtime("incomingPort")),
            vec![JsExpr::String(resolve_or_empty(*name)), foreign::decoder(ty)],
        )),

        Expr::Program(kind, body) => Code::Expr(generate_program(ctx, kind, body)),

        Expr::GlShader(src) => Code::Expr(JsExpr::Object(vec![(
            "src".to_string(),
            JsExpr::String(src.clone()),
        )])),

        Expr::Crash {
            home,
            region,
            unhandled,
        } => Code::Expr(generate_crash(ctx, *home, region, unhandled.as_deref())),
    }
}

/// Translate an expression and force it into expression form.
pub fn generate_js_expr(ctx: &Generator, expr: &Expr) -> JsExpr {
    generate(ctx, expr).to_expr()
}

fn generate_fields(ctx: &Generator, fields: &[(Name, Expr)]) -> Vec<(String, JsExpr)> {
    fields
        .iter()
        .map(|(name, value)| (common::field(*name), generate_js_expr(ctx, value)))
        .collect()
}

/// A reference to one of the runtime library helpers. The mangler reserves
/// these spellings, so the reference cannot be shadowed.
fn runtime(name: &str) -> JsExpr {
    debug_assert!(common::is_runtime_helper(name));
    JsExpr::Ref(name.to_string())
}

// ===== Functions =====

/// Emit a curried function under the arity-curry convention: a raw
/// one-argument function at arity 1, `Fn(function(…){…})` through arity 9,
/// and a right-associated chain of one-argument closures above that (the
/// runtime library stops at `F9`).
fn generate_function(args: &[Name], body: Code) -> JsExpr {
    let arity = args.len();
    match arity {
        0 => unreachable!("zero-arity function reached code generation"),
        1 => JsExpr::Function(vec![common::local(args[0])], body.to_stmt_list()),
        2..=9 => {
            let params = args.iter().map(|arg| common::local(*arg)).collect();
            JsExpr::Call(
                Box::new(JsExpr::Ref(format!("F{arity}"))),
                vec![JsExpr::Function(params, body.to_stmt_list())],
            )
        }
        _ => {
            let mut expr =
                JsExpr::Function(vec![common::local(args[arity - 1])], body.to_stmt_list());
            for arg in args[..arity - 1].iter().rev() {
                expr = JsExpr::Function(vec![common::local(*arg)], vec![JsStmt::Return(expr)]);
            }
            expr
        }
    }
}

/// Compile a self-tail-recursive function: the body runs inside
/// `label: while (true) { … }` and tail calls continue the loop.
fn generate_tail_fn(ctx: &Generator, label: &str, args: &[Name], body: &Expr) -> JsExpr {
    let body = generate(ctx, body);
    let looped = JsStmt::Labeled(
        label.to_string(),
        Box::new(JsStmt::While(JsExpr::Bool(true), Box::new(body.to_stmt()))),
    );
    generate_function(args, Code::Block(vec![looped]))
}

/// Compile a tail call as loop iteration: evaluate every argument, park the
/// results in fresh temporaries, then reassign the parameters and continue.
/// The two-phase discipline matters — arguments may read the old values of
/// the parameters they are about to replace.
fn generate_tail_call(ctx: &Generator, name: Name, args: &[(Name, Expr)]) -> Vec<JsStmt> {
    debug_assert!(!args.is_empty(), "tail call with no arguments");
    let values: Vec<JsExpr> = args
        .iter()
        .map(|(_, arg)| generate_js_expr(ctx, arg))
        .collect();
    let temps: Vec<String> = values.iter().map(|_| ctx.fresh_name()).collect();

    let mut stmts = Vec::with_capacity(args.len() + 2);
    stmts.push(JsStmt::Vars(temps.iter().cloned().zip(values).collect()));
    for ((param, _), temp) in args.iter().zip(&temps) {
        stmts.push(JsStmt::Assign(
            JsExpr::Ref(common::local(*param)),
            JsExpr::Ref(temp.clone()),
        ));
    }
    stmts.push(JsStmt::Continue(Some(common::local(name))));
    stmts
}

// ===== Calls =====

fn generate_call(ctx: &Generator, func: &Expr, args: &[Expr]) -> JsExpr {
    if let Expr::VarGlobal(var) = func {
        if let Some(expr) = generate_core_call(ctx, *var, args) {
            return expr;
        }
    }
    let func = generate_js_expr(ctx, func);
    let args: Vec<JsExpr> = args.iter().map(|arg| generate_js_expr(ctx, arg)).collect();
    match args.len() {
        2..=9 => {
            let helper = JsExpr::Ref(format!("A{}", args.len()));
            let mut call_args = Vec::with_capacity(args.len() + 1);
            call_args.push(func);
            call_args.extend(args);
            JsExpr::Call(Box::new(helper), call_args)
        }
        // arity 1 is a native call; past nine the application folds left,
        // one native single-argument call at a time (the runtime stops at A9)
        _ => args
            .into_iter()
            .fold(func, |f, arg| JsExpr::Call(Box::new(f), vec![arg])),
    }
}

/// Saturated calls to a handful of kernel functions compile to primitive
/// operators instead of going through the runtime. The shift helpers take
/// the offset first, so their operands swap.
fn generate_core_call(ctx: &Generator, var: Global, args: &[Expr]) -> Option<JsExpr> {
    let home = resolve_or_empty(var.home);
    let name = resolve_or_empty(var.name);
    match (home.as_str(), name.as_str(), args) {
        ("Basics", "not", [x]) => Some(prefix(PrefixOp::Not, generate_js_expr(ctx, x))),
        ("Basics", "negate", [x]) => Some(prefix(PrefixOp::Negate, generate_js_expr(ctx, x))),
        ("Bitwise", "complement", [x]) => {
            Some(prefix(PrefixOp::Complement, generate_js_expr(ctx, x)))
        }
        ("Bitwise", "and", [a, b]) => {
            let a = generate_js_expr(ctx, a);
            let b = generate_js_expr(ctx, b);
            Some(infix(InfixOp::BitAnd, a, b))
        }
        ("Bitwise", "or", [a, b]) => {
            let a = generate_js_expr(ctx, a);
            let b = generate_js_expr(ctx, b);
            Some(infix(InfixOp::BitOr, a, b))
        }
        ("Bitwise", "xor", [a, b]) => {
            let a = generate_js_expr(ctx, a);
            let b = generate_js_expr(ctx, b);
            Some(infix(InfixOp::BitXor, a, b))
        }
        ("Bitwise", "shiftLeftBy", [offset, x]) => {
            let offset = generate_js_expr(ctx, offset);
            let x = generate_js_expr(ctx, x);
            Some(infix(InfixOp::Shl, x, offset))
        }
        ("Bitwise", "shiftRightBy", [offset, x]) => {
            let offset = generate_js_expr(ctx, offset);
            let x = generate_js_expr(ctx, x);
            Some(infix(InfixOp::Sar, x, offset))
        }
        ("Bitwise", "shiftRightZfBy", [offset, x]) => {
            let offset = generate_js_expr(ctx, offset);
            let x = generate_js_expr(ctx, x);
            Some(infix(InfixOp::Shr, x, offset))
        }
        _ => None,
    }
}

// ===== Binary operators =====

fn generate_binop(ctx: &Generator, op: &Global, left: &Expr, right: &Expr) -> JsExpr {
    let l = generate_js_expr(ctx, left);
    let r = generate_js_expr(ctx, right);
    let home = resolve_or_empty(op.home);
    let name = resolve_or_empty(op.name);
    match (home.as_str(), name.as_str()) {
        ("Basics", "+") => infix(InfixOp::Add, l, r),
        ("Basics", "-") => infix(InfixOp::Sub, l, r),
        ("Basics", "*") => infix(InfixOp::Mul, l, r),
        ("Basics", "/") => infix(InfixOp::Div, l, r),
        ("Basics", "&&") => infix(InfixOp::And, l, r),
        ("Basics", "||") => infix(InfixOp::Or, l, r),
        ("Basics", "^") => JsExpr::Call(
            Box::new(JsExpr::Access(
                Box::new(JsExpr::Ref("Math".to_string())),
                "pow".to_string(),
            )),
            vec![l, r],
        ),
        ("Basics", "==") => structural_eq(l, r),
        ("Basics", "/=") => prefix(PrefixOp::Not, structural_eq(l, r)),
        ("Basics", "<") => infix(InfixOp::Lt, cmp(l, r), JsExpr::Int(0)),
        ("Basics", ">") => infix(InfixOp::Gt, cmp(l, r), JsExpr::Int(0)),
        ("Basics", "<=") => infix(InfixOp::Lt, cmp(l, r), JsExpr::Int(1)),
        ("Basics", ">=") => infix(InfixOp::Gt, cmp(l, r), JsExpr::Int(-1)),
        // integer division truncates toward zero via bitwise-or-zero
        ("Basics", "//") => infix(InfixOp::BitOr, infix(InfixOp::Div, l, r), JsExpr::Int(0)),
        ("List", "::") => JsExpr::Call(Box::new(runtime("cons")), vec![l, r]),
        _ => JsExpr::Call(
            Box::new(JsExpr::Ref("A2".to_string())),
            vec![JsExpr::Ref(common::global(op.home, op.name)), l, r],
        ),
    }
}

fn structural_eq(l: JsExpr, r: JsExpr) -> JsExpr {
    JsExpr::Call(Box::new(runtime("eq")), vec![l, r])
}

fn cmp(l: JsExpr, r: JsExpr) -> JsExpr {
    JsExpr::Call(Box::new(runtime("cmp")), vec![l, r])
}

fn infix(op: InfixOp, l: JsExpr, r: JsExpr) -> JsExpr {
    JsExpr::Infix(op, Box::new(l), Box::new(r))
}

fn prefix(op: PrefixOp, operand: JsExpr) -> JsExpr {
    JsExpr::Prefix(op, Box::new(operand))
}

// ===== Conditionals =====

fn generate_if(ctx: &Generator, raw_branches: &[(Expr, Expr)], raw_final: &Expr) -> Code {
    let (branches, final_) = crush_ifs(raw_branches, raw_final);

    let mut pairs = Vec::with_capacity(branches.len());
    for (cond, body) in branches {
        pairs.push((generate_js_expr(ctx, cond), generate(ctx, body)));
    }
    let final_code = generate(ctx, final_);

    if final_code.is_block() || pairs.iter().any(|(_, code)| code.is_block()) {
        let mut stmt = final_code.to_stmt();
        for (cond, code) in pairs.into_iter().rev() {
            stmt = JsStmt::If(cond, Box::new(code.to_stmt()), Box::new(stmt));
        }
        Code::Block(vec![stmt])
    } else {
        let mut expr = final_code.to_expr();
        for (cond, code) in pairs.into_iter().rev() {
            expr = JsExpr::If(Box::new(cond), Box::new(code.to_expr()), Box::new(expr));
        }
        Code::Expr(expr)
    }
}

/// Flatten nested conditionals into one branch list plus a single default.
/// A branch guarded by literal `true` becomes the default and drops
/// everything after it; a default that is itself an `If` is folded in.
fn crush_ifs<'a>(
    mut branches: &'a [(Expr, Expr)],
    mut final_: &'a Expr,
) -> (Vec<(&'a Expr, &'a Expr)>, &'a Expr) {
    let mut visited = Vec::new();
    loop {
        for (cond, body) in branches {
            if matches!(cond, Expr::Literal(Literal::Bool(true))) {
                return (visited, body);
            }
            visited.push((cond, body));
        }
        match final_ {
            Expr::If(sub_branches, sub_final) => {
                branches = sub_branches;
                final_ = sub_final;
            }
            _ => return (visited, final_),
        }
    }
}

// ===== Let =====

fn generate_let_def(ctx: &Generator, name: Name, def: &Def) -> JsStmt {
    let js_name = common::local(name);
    let value = match def {
        Def::Def(body) => generate_js_expr(ctx, body),
        Def::TailDef(args, body) => generate_tail_fn(ctx, &js_name, args, body),
    };
    JsStmt::Var(js_name, value)
}

// ===== Case and decision trees =====

/// Compile a pattern match. The decider lands inside nested
/// `label: do { … } while (false);` shells — one per shared continuation —
/// so a `Jump(t)` compiles to `break label_t`, a forward goto to the
/// statements right after that shell.
fn generate_case(
    ctx: &Generator,
    root: Name,
    decider: &Decider,
    jumps: &[(u32, Expr)],
) -> Vec<JsStmt> {
    let label_root = ctx.fresh_name();
    let root = common::local(root);
    let mut stmts = generate_decider(ctx, &root, &label_root, decider);
    for (target, branch) in jumps {
        let shell = JsStmt::Labeled(
            format!("{label_root}_{target}"),
            Box::new(JsStmt::DoWhile(
                JsExpr::Bool(false),
                Box::new(JsStmt::Block(stmts)),
            )),
        );
        stmts = vec![shell];
        stmts.extend(generate(ctx, branch).to_stmt_list());
    }
    stmts
}

fn generate_decider(
    ctx: &Generator,
    root: &str,
    label_root: &str,
    decider: &Decider,
) -> Vec<JsStmt> {
    match decider {
        Decider::Leaf(Choice::Inline(expr)) => generate(ctx, expr).to_stmt_list(),

        Decider::Leaf(Choice::Jump(target)) => {
            vec![JsStmt::Break(Some(format!("{label_root}_{target}")))]
        }

        Decider::Chain {
            test_chain,
            success,
            failure,
        } => {
            let mut cond: Option<JsExpr> = None;
            for (path, test) in test_chain {
                let access = testable(path_access(root, path), test);
                let check = infix(InfixOp::StrictEq, access, test_value(test));
                cond = Some(match cond {
                    Some(conjunction) => infix(InfixOp::And, conjunction, check),
                    None => check,
                });
            }
            let cond = cond.unwrap_or(JsExpr::Bool(true));
            let success = stmts_to_stmt(generate_decider(ctx, root, label_root, success));
            let failure = stmts_to_stmt(generate_decider(ctx, root, label_root, failure));
            vec![JsStmt::If(cond, Box::new(success), Box::new(failure))]
        }

        Decider::FanOut {
            path,
            tests,
            fallback,
        } => {
            // every edge tests the same position, so the first edge fixes
            // the testable access form for the whole switch
            let scrutinee = match tests.first() {
                Some((test, _)) => testable(path_access(root, path), test),
                None => path_access(root, path),
            };
            let mut clauses: Vec<SwitchClause> = tests
                .iter()
                .map(|(test, subtree)| {
                    SwitchClause::Case(
                        test_value(test),
                        generate_decider(ctx, root, label_root, subtree),
                    )
                })
                .collect();
            clauses.push(SwitchClause::Default(generate_decider(
                ctx, root, label_root, fallback,
            )));
            vec![JsStmt::Switch(scrutinee, clauses)]
        }
    }
}

/// Fold a path into the access expression naming the tested sub-value.
fn path_access(root: &str, path: &Path) -> JsExpr {
    let mut expr = JsExpr::Ref(root.to_string());
    let mut path = path;
    loop {
        match path {
            Path::Position(index, rest) => {
                expr = JsExpr::Access(Box::new(expr), format!("_{index}"));
                path = rest;
            }
            Path::Field(name, rest) => {
                expr = JsExpr::Access(Box::new(expr), common::field(*name));
                path = rest;
            }
            Path::Empty | Path::Alias => return expr,
        }
    }
}

/// Adapt an access expression to the form a test compares against:
/// constructors dispatch on the `.ctor` tag, characters unbox through
/// `.valueOf()`, everything else compares directly.
fn testable(access: JsExpr, test: &Test) -> JsExpr {
    match test {
        Test::Ctor(_) => JsExpr::Access(Box::new(access), "ctor".to_string()),
        Test::Lit(Literal::Chr(_)) => JsExpr::Call(
            Box::new(JsExpr::Access(Box::new(access), "valueOf".to_string())),
            vec![],
        ),
        Test::Lit(_) => access,
    }
}

fn test_value(test: &Test) -> JsExpr {
    match test {
        Test::Ctor(tag) => JsExpr::String(resolve_or_empty(*tag)),
        Test::Lit(Literal::Chr(c)) => JsExpr::String(c.to_string()),
        Test::Lit(lit) => literal::encode(lit),
    }
}

fn stmts_to_stmt(mut stmts: Vec<JsStmt>) -> JsStmt {
    if stmts.len() == 1 {
        stmts.remove(0)
    } else {
        JsStmt::Block(stmts)
    }
}

// ===== Programs and crashes =====

fn generate_program(ctx: &Generator, kind: &ProgramKind, body: &Expr) -> JsExpr {
    match kind {
        ProgramKind::VDom => JsExpr::Call(
            Box::new(runtime("staticProgram")),
            vec![generate_js_expr(ctx, body)],
        ),
        ProgramKind::NoFlags => JsExpr::Call(Box::new(generate_js_expr(ctx, body)), vec![]),
        ProgramKind::Flags(ty) => JsExpr::Call(
            Box::new(generate_js_expr(ctx, body)),
            vec![foreign::decoder(ty)],
        ),
    }
}

fn generate_crash(
    ctx: &Generator,
    home: ModuleName,
    region: &Region,
    unhandled: Option<&Expr>,
) -> JsExpr {
    let mut args = vec![
        JsExpr::String(resolve_or_empty(home)),
        region_object(region),
    ];
    if let Some(value) = unhandled {
        args.push(generate_js_expr(ctx, value));
    }
    JsExpr::Call(Box::new(runtime("crash")), args)
}

fn region_object(region: &Region) -> JsExpr {
    JsExpr::Object(vec![
        ("start".to_string(), position_object(&region.start)),
        ("end".to_string(), position_object(&region.end)),
    ])
}

fn position_object(position: &Position) -> JsExpr {
    JsExpr::Object(vec![
        ("line".to_string(), JsExpr::Int(i64::from(position.line))),
        ("column".to_string(), JsExpr::Int(i64::from(position.column))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::intern;

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Int(n))
    }

    fn bool_lit(b: bool) -> Expr {
        Expr::Literal(Literal::Bool(b))
    }

    fn var(name: &str) -> Expr {
        Expr::VarLocal(intern(name))
    }

    #[test]
    fn crush_flattens_nested_defaults() {
        // if c1 then 1 else (if c2 then 2 else 3)
        let nested = Expr::If(vec![(var("c2"), int(2))], Box::new(int(3)));
        let branches = vec![(var("c1"), int(1))];
        let (crushed, final_) = crush_ifs(&branches, &nested);
        assert_eq!(
            crushed,
            vec![(&var("c1"), &int(1)), (&var("c2"), &int(2))]
        );
        assert_eq!(final_, &int(3));
    }

    #[test]
    fn crush_stops_at_literal_true() {
        let branches = vec![
            (var("c1"), int(1)),
            (bool_lit(true), int(2)),
            (var("c3"), int(3)),
        ];
        let default = int(9);
        let (crushed, final_) = crush_ifs(&branches, &default);
        assert_eq!(crushed, vec![(&var("c1"), &int(1))]);
        assert_eq!(final_, &int(2));
    }

    #[test]
    fn expr_code_never_wraps_in_iife() {
        let code = Code::Expr(JsExpr::Int(1));
        assert_eq!(code.to_expr(), JsExpr::Int(1));
    }

    #[test]
    fn block_code_becomes_iife_only_in_expression_position() {
        let code = Code::Block(vec![JsStmt::Return(JsExpr::Int(1))]);
        let expr = code.to_expr();
        assert!(matches!(&expr, JsExpr::Call(callee, args)
            if args.is_empty() && matches!(callee.as_ref(), JsExpr::Function(..))));
    }

    #[test]
    fn single_statement_blocks_collapse() {
        let code = Code::Block(vec![JsStmt::Break(None)]);
        assert_eq!(code.to_stmt(), JsStmt::Break(None));
    }

    #[test]
    fn fresh_names_are_sequential() {
        let ctx = Generator::new();
        assert_eq!(ctx.fresh_name(), "_v0");
        assert_eq!(ctx.fresh_name(), "_v1");
        assert_eq!(ctx.fresh_name(), "_v2");
    }
}
