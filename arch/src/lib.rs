//! Instruction set description for the 1bpc architecture.
//!
//! A 1bpc program is a flat image of 10-bit words. This crate holds the
//! reference data the assembler consults: the token kinds operands are
//! expressed in, the instruction table, and the loop conditions understood
//! by the `while`/`until` macros.

pub mod cond;
pub mod inst;
pub mod kind;

pub use cond::Loop;
pub use inst::{Instruction, InstructionSet, WORD_WIDTH};
pub use kind::TokenKind;
