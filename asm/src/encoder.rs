use crate::note::Notes;
use crate::token::Token;
use arch::{InstructionSet, TokenKind, WORD_WIDTH};
use indexmap::IndexMap;

/// One `WORD_WIDTH`-bit string per address.
pub fn encode(
    words: &[Vec<Token>],
    labels: &IndexMap<String, usize>,
    set: &InstructionSet,
    notes: &mut Notes,
) -> Vec<String> {
    let mut encoder = Encoder { labels, set, notes };
    let binary: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(address, group)| encoder.word(address, group))
        .collect();
    tracing::debug!("encoded {} words", binary.len());
    binary
}

fn zeros() -> String {
    "0".repeat(WORD_WIDTH)
}

/// Left-pads `bits` to `width`, or keeps the first `width` bits.
fn fit(bits: &str, width: usize) -> Result<String, String> {
    if bits.chars().count() > width {
        Err(bits.chars().take(width).collect())
    } else {
        Ok(format!("{:0>width$}", bits, width = width))
    }
}

struct Encoder<'a> {
    labels: &'a IndexMap<String, usize>,
    set: &'a InstructionSet,
    notes: &'a mut Notes,
}

impl<'a> Encoder<'a> {
    fn word(&mut self, address: usize, group: &[Token]) -> String {
        let Some(first) = group.first() else {
            return zeros();
        };
        if group.len() > 2 {
            self.notes.error(
                address,
                first.line,
                "Internal error: Too many tokens to fit in one memory word.",
            );
            return zeros();
        }
        match first.kind {
            TokenKind::Error => zeros(),
            TokenKind::BinaryLiteral => self.data(address, group),
            TokenKind::LabelRef => self.label_ref(address, first),
            TokenKind::Command => self.instruction(address, group),
            kind => {
                self.notes.error(
                    address,
                    first.line,
                    format!(
                        "Internal error: Unexpected {} `{}` during binary conversion.",
                        kind, first.src
                    ),
                );
                zeros()
            }
        }
    }

    fn data(&mut self, address: usize, group: &[Token]) -> String {
        let token = &group[0];
        if group.len() > 1 {
            self.notes.error(
                address,
                token.line,
                "Internal error: Extra tokens found after binary data.",
            );
        }
        fit(&token.value, WORD_WIDTH).unwrap_or_else(|cut| {
            self.notes.error(
                address,
                token.line,
                format!(
                    "Binary value `{}` exceeds word width of {} bits.",
                    token.value, WORD_WIDTH
                ),
            );
            cut
        })
    }

    fn label_ref(&mut self, address: usize, token: &Token) -> String {
        let Some(&target) = self.labels.get(&token.value) else {
            self.notes.error(
                address,
                token.line,
                format!("Undefined label `{}`.", token.value),
            );
            return zeros();
        };
        self.notes.info(
            address,
            token.line,
            format!("Points to label `{}`", token.value),
        );
        fit(&format!("{:b}", target), WORD_WIDTH).unwrap_or_else(|cut| {
            self.notes.error(
                address,
                token.line,
                format!(
                    "Address {} of label `{}` exceeds word width of {} bits.",
                    target, token.value, WORD_WIDTH
                ),
            );
            cut
        })
    }

    fn instruction(&mut self, address: usize, group: &[Token]) -> String {
        let token = &group[0];
        let Some(inst) = self.set.get(&token.value) else {
            self.notes.error(
                address,
                token.line,
                format!(
                    "Internal error: Unknown instruction `{}` during binary conversion.",
                    token.value
                ),
            );
            return zeros();
        };

        let Some(operand) = group.get(1) else {
            return fit(&inst.opcode, WORD_WIDTH).unwrap_or_else(|cut| {
                self.notes.error(
                    address,
                    token.line,
                    format!(
                        "Opcode `{}` of `{}` exceeds word width of {} bits.",
                        inst.opcode, token.value, WORD_WIDTH
                    ),
                );
                cut
            });
        };

        let bits = if operand.is(TokenKind::BinaryLiteral) {
            operand.value.as_str()
        } else {
            self.notes.error(
                address,
                operand.line,
                format!(
                    "Internal error: Unexpected operand {} `{}` during binary conversion.",
                    operand.kind, operand.src
                ),
            );
            ""
        };
        let width = inst.operand_width();
        let word = format!("{}{:0>width$}", inst.opcode, bits, width = width);
        fit(&word, WORD_WIDTH).unwrap_or_else(|cut| {
            self.notes.error(
                address,
                operand.line,
                format!(
                    "Operand `{}` of `{}` does not fit in {} bits.",
                    operand.src, token.value, width
                ),
            );
            cut
        })
    }
}
