//! Global string interner.
//!
//! Every name in the IR (locals, globals, module names, fields, constructor
//! tags) is an interned [`Symbol`]; the code generator resolves them back to
//! strings only at the point where an identifier is actually emitted.

use std::sync::{LazyLock, Mutex};

use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

pub type Symbol = DefaultSymbol;

static INTERNER: LazyLock<Mutex<StringInterner<DefaultBackend>>> =
    LazyLock::new(|| Mutex::new(StringInterner::new()));

/// Intern a string and return its symbol.
pub fn intern(s: &str) -> Symbol {
    let mut interner = INTERNER.lock().unwrap_or_else(|e| e.into_inner());
    interner.get_or_intern(s)
}

/// Resolve a symbol back to its string.
pub fn resolve(sym: Symbol) -> Option<String> {
    let interner = INTERNER.lock().unwrap_or_else(|e| e.into_inner());
    interner.resolve(sym).map(|s| s.to_string())
}

/// Resolve a symbol, falling back to the empty string.
///
/// Symbols only come from [`intern`], so the fallback is unreachable in
/// practice; it keeps the codegen paths total.
pub fn resolve_or_empty(sym: Symbol) -> String {
    resolve(sym).unwrap_or_default()
}
