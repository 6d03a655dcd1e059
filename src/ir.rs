//! The optimizer's IR — input to the code generator.
//!
//! A closed tagged union over which the generator dispatches. The optimizer
//! is the trusted producer of these trees: the generator assumes they are
//! well-formed and never defines user-facing errors for them. [`check_def`]
//! exists for the producer side — it detects the programming errors that
//! would otherwise turn into silently wrong JavaScript, and callers treat a
//! failure as an internal compiler error and abort.

use thiserror::Error;

use crate::interner::{resolve_or_empty, Symbol};

pub type Name = Symbol;
pub type ModuleName = Symbol;

/// A qualified reference to a top-level binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Global {
    pub home: ModuleName,
    pub name: Name,
}

impl Global {
    pub fn new(home: ModuleName, name: Name) -> Self {
        Global { home, name }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Chr(char),
    Str(String),
}

/// A source region, carried by `Crash` for runtime error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Optimized expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    VarLocal(Name),
    VarGlobal(Global),
    Literal(Literal),
    /// Record projection: `record.field`.
    Access(Box<Expr>, Name),
    /// Functional record update; field names are unique.
    Update(Box<Expr>, Vec<(Name, Expr)>),
    Record(Vec<(Name, Expr)>),
    /// Binary operator call with the operator's defining module resolved.
    Binop(Global, Box<Expr>, Box<Expr>),
    /// Curried lambda with at least one parameter.
    Function(Vec<Name>, Box<Expr>),
    /// Saturated application.
    Call(Box<Expr>, Vec<Expr>),
    /// Self-recursive call in tail position: the target name plus
    /// `(parameter, argument)` pairs in the original parameter order.
    TailCall(Name, Vec<(Name, Expr)>),
    Let(Vec<(Name, Def)>, Box<Expr>),
    /// Guarded branches plus a default.
    If(Vec<(Expr, Expr)>, Box<Expr>),
    /// Pattern match: the scrutinee is already bound under the given name;
    /// the decider branches into shared continuations addressed by label.
    Case(Name, Box<Decider>, Vec<(u32, Expr)>),
    List(Vec<Expr>),
    /// Data constructor application: tag plus positional members.
    Ctor(Name, Vec<Expr>),
    /// Positional field access on a constructed value.
    CtorAccess(Box<Expr>, usize),
    /// Effect-manager placeholders for the named module.
    Cmd(ModuleName),
    Sub(ModuleName),
    OutgoingPort(Name, ForeignType),
    IncomingPort(Name, ForeignType),
    Program(ProgramKind, Box<Expr>),
    GlShader(String),
    Crash {
        home: ModuleName,
        region: Region,
        unhandled: Option<Box<Expr>>,
    },
}

/// A top-level or let-bound definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Def {
    Def(Expr),
    /// Self-tail-recursive function; `TailCall`s in the body target it.
    TailDef(Vec<Name>, Expr),
}

/// A pattern-match decision tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Decider {
    Leaf(Choice),
    /// All tests in the chain must succeed to reach `success`.
    Chain {
        test_chain: Vec<(Path, Test)>,
        success: Box<Decider>,
        failure: Box<Decider>,
    },
    /// Multi-way branch on the value at `path`.
    FanOut {
        path: Path,
        tests: Vec<(Test, Decider)>,
        fallback: Box<Decider>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Inline(Expr),
    Jump(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    Ctor(Name),
    Lit(Literal),
}

/// A zipper from the scrutinee root into the sub-value being tested.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    Empty,
    Alias,
    Position(usize, Box<Path>),
    Field(Name, Box<Path>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgramKind {
    VDom,
    NoFlags,
    Flags(ForeignType),
}

/// Type descriptor for values crossing the FFI port boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignType {
    Int,
    Float,
    Bool,
    String,
    Unit,
    /// An opaque JSON value, passed through unchanged.
    Value,
    List(Box<ForeignType>),
    Maybe(Box<ForeignType>),
    Record(Vec<(Name, ForeignType)>),
}

// ===== Validation =====

/// Structural defects [`check_def`] can detect. All of them are producer
/// bugs; none are recoverable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidIr {
    #[error("function with no parameters")]
    ZeroArityFunction,
    #[error("tail call to `{name}` with no arguments")]
    EmptyTailCall { name: String },
    #[error("tail call targets `{found}`, enclosing definition is `{expected}`")]
    TailCallTarget { expected: String, found: String },
    #[error("tail call to `{name}` passes {found} arguments, definition takes {expected}")]
    TailCallArity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("tail call to `{name}` outside a tail-recursive definition")]
    StrayTailCall { name: String },
    #[error("duplicate jump label {label}")]
    DuplicateJumpLabel { label: u32 },
    #[error("jump to unbound label {label}")]
    UnboundJump { label: u32 },
    #[error("duplicate field `{field}`")]
    DuplicateField { field: String },
}

/// Validate one top-level definition before handing it to the generator.
pub fn check_def(name: Name, def: &Def) -> Result<(), InvalidIr> {
    match def {
        Def::Def(body) => check_expr(body, None),
        Def::TailDef(args, body) => {
            if args.is_empty() {
                return Err(InvalidIr::ZeroArityFunction);
            }
            check_expr(body, Some((name, args.len())))
        }
    }
}

/// Walk an expression. `tail` is the innermost tail-recursive definition in
/// scope; lambda bodies clear it because a closure cannot continue the
/// enclosing loop.
fn check_expr(expr: &Expr, tail: Option<(Name, usize)>) -> Result<(), InvalidIr> {
    match expr {
        Expr::VarLocal(_)
        | Expr::VarGlobal(_)
        | Expr::Literal(_)
        | Expr::Cmd(_)
        | Expr::Sub(_)
        | Expr::OutgoingPort(..)
        | Expr::IncomingPort(..)
        | Expr::GlShader(_) => Ok(()),

        Expr::Access(record, _) => check_expr(record, tail),

        Expr::Update(record, fields) => {
            check_unique_fields(fields)?;
            check_expr(record, tail)?;
            for (_, value) in fields {
                check_expr(value, tail)?;
            }
            Ok(())
        }

        Expr::Record(fields) => {
            check_unique_fields(fields)?;
            for (_, value) in fields {
                check_expr(value, tail)?;
            }
            Ok(())
        }

        Expr::Binop(_, left, right) => {
            check_expr(left, tail)?;
            check_expr(right, tail)
        }

        Expr::Function(args, body) => {
            if args.is_empty() {
                return Err(InvalidIr::ZeroArityFunction);
            }
            check_expr(body, None)
        }

        Expr::Call(func, args) => {
            check_expr(func, tail)?;
            for arg in args {
                check_expr(arg, tail)?;
            }
            Ok(())
        }

        Expr::TailCall(name, args) => {
            let Some((expected, arity)) = tail else {
                return Err(InvalidIr::StrayTailCall {
                    name: resolve_or_empty(*name),
                });
            };
            if *name != expected {
                return Err(InvalidIr::TailCallTarget {
                    expected: resolve_or_empty(expected),
                    found: resolve_or_empty(*name),
                });
            }
            if args.is_empty() {
                return Err(InvalidIr::EmptyTailCall {
                    name: resolve_or_empty(*name),
                });
            }
            if args.len() != arity {
                return Err(InvalidIr::TailCallArity {
                    name: resolve_or_empty(*name),
                    expected: arity,
                    found: args.len(),
                });
            }
            for (_, arg) in args {
                check_expr(arg, None)?;
            }
            Ok(())
        }

        Expr::Let(defs, body) => {
            for (def_name, def) in defs {
                check_def(*def_name, def)?;
            }
            check_expr(body, tail)
        }

        Expr::If(branches, final_) => {
            for (cond, branch) in branches {
                check_expr(cond, tail)?;
                check_expr(branch, tail)?;
            }
            check_expr(final_, tail)
        }

        Expr::Case(_, decider, jumps) => {
            let mut labels = Vec::with_capacity(jumps.len());
            for (label, _) in jumps {
                if labels.contains(label) {
                    return Err(InvalidIr::DuplicateJumpLabel { label: *label });
                }
                labels.push(*label);
            }
            check_decider(decider, &labels, tail)?;
            for (_, branch) in jumps {
                check_expr(branch, tail)?;
            }
            Ok(())
        }

        Expr::List(entries) | Expr::Ctor(_, entries) => {
            for entry in entries {
                check_expr(entry, tail)?;
            }
            Ok(())
        }

        Expr::CtorAccess(value, _) => check_expr(value, tail),

        Expr::Program(_, body) => check_expr(body, tail),

        Expr::Crash { unhandled, .. } => match unhandled {
            Some(value) => check_expr(value, tail),
            None => Ok(()),
        },
    }
}

fn check_decider(
    decider: &Decider,
    labels: &[u32],
    tail: Option<(Name, usize)>,
) -> Result<(), InvalidIr> {
    match decider {
        Decider::Leaf(Choice::Inline(expr)) => check_expr(expr, tail),
        Decider::Leaf(Choice::Jump(target)) => {
            if labels.contains(target) {
                Ok(())
            } else {
                Err(InvalidIr::UnboundJump { label: *target })
            }
        }
        Decider::Chain {
            success, failure, ..
        } => {
            check_decider(success, labels, tail)?;
            check_decider(failure, labels, tail)
        }
        Decider::FanOut {
            tests, fallback, ..
        } => {
            for (_, subtree) in tests {
                check_decider(subtree, labels, tail)?;
            }
            check_decider(fallback, labels, tail)
        }
    }
}

fn check_unique_fields(fields: &[(Name, Expr)]) -> Result<(), InvalidIr> {
    for (i, (field, _)) in fields.iter().enumerate() {
        if fields[i + 1..].iter().any(|(other, _)| other == field) {
            return Err(InvalidIr::DuplicateField {
                field: resolve_or_empty(*field),
            });
        }
    }
    Ok(())
}
