//! Assembler for the 1bpc architecture.
//!
//! Source text goes through five stages, each consuming the previous one's
//! output in full:
//!
//! 1. [`lexer`] splits lines into tokens
//! 2. [`preprocess`] expands macros
//! 3. [`normalize`] rewrites decimal and hexadecimal literals as binary
//! 4. [`mapper`] assigns addresses and binds labels
//! 5. [`encoder`] turns every address into a 10-bit word
//!
//! No stage aborts. Problems are recorded as [`note::Note`]s next to a
//! placeholder value, so a single compile reports everything it can.

pub mod encoder;
pub mod error;
pub mod export;
pub mod lexer;
pub mod macros;
pub mod mapper;
pub mod memory;
pub mod normalize;
pub mod note;
pub mod preprocess;
pub mod report;
pub mod token;

pub use arch::{InstructionSet, TokenKind, WORD_WIDTH};
pub use error::Error;
pub use memory::MemoryMap;
pub use note::{Note, Notes, Severity};
pub use token::Token;

use lexer::Lexer;
use macros::Registry;

/// Compiles source text into a memory map.
pub fn compile(source: &str, set: &InstructionSet) -> MemoryMap {
    tracing::debug!("tokenizing source");
    let tokens = Lexer::new(source).parse();
    tracing::debug!("expanding macros");
    let tokens = preprocess::preprocess(tokens, &Registry::builtin());
    tracing::debug!("converting numbers to binary");
    let tokens = normalize::normalize(tokens);
    tracing::debug!("mapping memory");
    let map = MemoryMap::build(tokens, set);
    tracing::info!(
        words = map.len(),
        errors = map.errors(),
        warnings = map.warnings(),
        "compiled"
    );
    map
}
