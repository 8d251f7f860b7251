//! Built-in macros.
//!
//! A macro is a named token rewrite with a fixed operand-kind signature.
//! Several entries may share a name; they are tried in registration order.
//! See [`crate::preprocess`] for how the registry is applied.

mod constant;
mod context;
mod flow;
mod load;
mod memory;

pub use context::{Allocation, Allocator, Context, MEMORY_RESERVE, MEMORY_SIZE};

use crate::token::Token;
use arch::TokenKind;

pub type Expand = fn(&[Token], &mut Context) -> Vec<Token>;

#[derive(Clone)]
pub struct Macro {
    pub name: &'static str,
    pub operands: Vec<TokenKind>,
    expand: Expand,
}

impl Macro {
    pub fn new(name: &'static str, operands: &[TokenKind], expand: Expand) -> Self {
        Macro {
            name,
            operands: operands.to_vec(),
            expand,
        }
    }

    /// Number of tokens a call consumes, name included.
    pub fn len(&self) -> usize {
        1 + self.operands.len()
    }

    /// Whether `tokens` starts with a call to this macro.
    pub fn matches(&self, tokens: &[Token]) -> bool {
        tokens.len() >= self.len()
            && tokens[0].is_command(self.name)
            && tokens[1..]
                .iter()
                .zip(&self.operands)
                .all(|(token, kind)| token.kind == *kind)
    }

    pub fn expand(&self, call: &[Token], ctx: &mut Context) -> Vec<Token> {
        (self.expand)(call, ctx)
    }

    /// `[Label, Binary Number]`
    pub fn signature(&self) -> String {
        let kinds: Vec<String> = self.operands.iter().map(|k| k.to_string()).collect();
        format!("[{}]", kinds.join(", "))
    }
}

impl std::fmt::Debug for Macro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Macro({} {})", self.name, self.signature())
    }
}

/// Ordered macro list.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    macros: Vec<Macro>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { macros: Vec::new() }
    }

    pub fn register(&mut self, mac: Macro) {
        self.macros.push(mac);
    }

    /// The 1bpc macros, in expansion order.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        constant::register(&mut registry);
        memory::register(&mut registry);
        load::register(&mut registry);
        flow::register(&mut registry);
        registry
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.iter().any(|mac| mac.name == name)
    }

    /// Diagnostic for a call no signature of `name` matched.
    pub fn usage(&self, name: &str) -> String {
        let options: Vec<String> = self
            .macros
            .iter()
            .filter(|mac| mac.name == name)
            .map(Macro::signature)
            .collect();
        format!(
            "Macro `{}` usage is incorrect. The argument options are: {}.",
            name,
            options.join(", or ")
        )
    }
}

/// Single error token standing in for a whole macro call.
pub(crate) fn fail(msg: impl Into<String>, line: usize, call: &[Token]) -> Vec<Token> {
    vec![Token::error(msg, line, crate::token::join_src(call))]
}
