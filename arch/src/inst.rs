use crate::kind::TokenKind;

use color_print::cformat;
use std::collections::HashMap;

/// Width of one memory word in bits.
pub const WORD_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: String,
    pub names: Vec<String>,
    /// `None` when the instruction takes no operand. Otherwise a single operand
    /// of any of the listed kinds is accepted.
    pub operands: Option<Vec<TokenKind>>,
}

impl Instruction {
    pub fn new(opcode: &str, names: &[&str], operands: Option<&[TokenKind]>) -> Self {
        Instruction {
            opcode: opcode.to_string(),
            names: names.iter().map(|name| name.to_string()).collect(),
            operands: operands.map(|kinds| kinds.to_vec()),
        }
    }

    /// Primary name, the first alias.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    pub fn takes_operand(&self) -> bool {
        self.operands.is_some()
    }

    pub fn accepts(&self, kind: TokenKind) -> bool {
        self.operands
            .as_ref()
            .map_or(false, |kinds| kinds.contains(&kind))
    }

    /// Label reference operands are placed in the word after the opcode.
    pub fn expects_label_ref(&self) -> bool {
        self.accepts(TokenKind::LabelRef)
    }

    /// `halt` and `jump` never fall through to the next word.
    pub fn transfers_control(&self) -> bool {
        matches!(self.name(), "halt" | "jump")
    }

    /// Bits left for an operand sharing the opcode's word.
    pub fn operand_width(&self) -> usize {
        WORD_WIDTH.saturating_sub(self.opcode.chars().count())
    }

    pub fn cformat(&self) -> String {
        let operands = match &self.operands {
            None => String::new(),
            Some(kinds) => kinds
                .iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
        };
        cformat!(
            "<y>{:>10}</> <r>{:<18}</><b>{}</>",
            self.opcode,
            self.names.join(" "),
            operands
        )
    }
}

/// Immutable instruction table with a precomputed alias index.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    list: Vec<Instruction>,
    index: HashMap<String, usize>,
}

impl InstructionSet {
    pub fn new(list: Vec<Instruction>) -> Self {
        let mut index = HashMap::new();
        for (idx, inst) in list.iter().enumerate() {
            for name in &inst.names {
                // First registration of an alias wins
                index.entry(name.clone()).or_insert(idx);
            }
        }
        InstructionSet { list, index }
    }

    pub fn get(&self, alias: &str) -> Option<&Instruction> {
        self.index.get(alias).map(|&idx| &self.list[idx])
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.index.contains_key(alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The 1bpc instruction table.
    pub fn onebpc() -> Self {
        use TokenKind::*;

        macro_rules! inst {
            ($opcode:expr, [$($name:expr),+]) => {
                Instruction::new($opcode, &[$($name),+], None)
            };
            ($opcode:expr, [$($name:expr),+], $operands:expr) => {
                Instruction::new($opcode, &[$($name),+], Some($operands))
            };
        }

        let number: &[TokenKind] = &[BinaryLiteral, DecimalLiteral, HexLiteral];
        let label: &[TokenKind] = &[LabelRef];

        InstructionSet::new(vec![
            // Control
            inst!("0000000000", ["halt"]),
            inst!("0000000001", ["jump", "ji"], label),
            inst!("0000000010", ["jump_if_triggered", "jt"], label),
            inst!("0000000011", ["jump_if_a_0", "ja0"], label),
            inst!("0000000100", ["jump_if_a_1", "ja1"], label),
            inst!("0000000101", ["jump_if_carry_0", "jc0"], label),
            inst!("0000000110", ["jump_if_carry_1", "jc1"], label),
            // Nibble load
            inst!("000001", ["load", "l"], number),
            // Bit-serial operations, operand is length - 1
            inst!("000100", ["add", "+"], number),
            inst!("000101", ["subtract", "-"], number),
            inst!("000110", ["and", "ba"], number),
            inst!("000111", ["or", "bo"], number),
            inst!("001000", ["xor", "bx"], number),
            inst!("001001", ["nand", "bna"], number),
            inst!("001010", ["nor", "bno"], number),
            inst!("001011", ["nxor", "bnx"], number),
            inst!("001100", ["move_data", "md"], number),
            inst!("001101", ["invert", "bi"], number),
            inst!("001110", ["checksum", "bc"], number),
            // Data pointers
            inst!("01", ["set_a"], number),
            inst!("10", ["set_b"], number),
            inst!("11", ["set_c"], number),
        ])
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        InstructionSet::onebpc()
    }
}
