use crate::note::Notes;
use crate::token::Token;
use arch::{Instruction, InstructionSet, TokenKind};
use indexmap::IndexMap;

/// Token groups per address, and where each label points.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub words: Vec<Vec<Token>>,
    pub labels: IndexMap<String, usize>,
}

/// Assigns addresses to a macro-expanded, normalized token stream.
pub fn map(tokens: Vec<Token>, set: &InstructionSet, notes: &mut Notes) -> Layout {
    let mut mapper = Mapper {
        set,
        notes,
        layout: Layout::default(),
        reachable: true,
    };
    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Comment => {
                let addr = mapper.prev_addr();
                mapper.notes.comment(addr, token.line, token.value);
            }
            TokenKind::Info => {
                let addr = mapper.prev_addr();
                mapper.notes.info(addr, token.line, token.value);
            }
            TokenKind::Error => mapper.error(token),
            TokenKind::Label => mapper.label(token),
            TokenKind::BinaryLiteral => mapper.data(token),
            TokenKind::Command => mapper.command(token, &mut tokens),
            TokenKind::DecimalLiteral | TokenKind::HexLiteral | TokenKind::LabelRef => {
                let addr = mapper.prev_addr();
                mapper.notes.error(
                    addr,
                    token.line,
                    format!(
                        "Internal error: Unexpected {} `{}` outside an instruction.",
                        token.kind, token.src
                    ),
                );
            }
        }
    }
    tracing::debug!(
        "mapped {} words, {} labels",
        mapper.layout.words.len(),
        mapper.layout.labels.len()
    );
    mapper.layout
}

struct Mapper<'a> {
    set: &'a InstructionSet,
    notes: &'a mut Notes,
    layout: Layout,
    /// False after an unconditional transfer until the next label
    reachable: bool,
}

impl<'a> Mapper<'a> {
    fn next_addr(&self) -> usize {
        self.layout.words.len()
    }

    fn prev_addr(&self) -> usize {
        self.layout.words.len().saturating_sub(1)
    }

    fn push(&mut self, group: Vec<Token>) {
        self.layout.words.push(group);
    }

    // An error occupies one word as a halt
    fn error(&mut self, token: Token) {
        let addr = self.next_addr();
        self.notes.error(
            addr,
            token.line,
            format!("{}{}", token.value, token.note_suffix()),
        );
        let mut halt = Token::command("halt", token.line).with_note("placeholder for an error");
        halt.src = token.src;
        self.push(vec![halt]);
    }

    fn label(&mut self, token: Token) {
        let addr = self.next_addr();
        if let Some(prev) = self.layout.labels.get(&token.value) {
            self.notes.error(
                addr,
                token.line,
                format!(
                    "Duplicate label `{}`, already defined at address {}.",
                    token.value, prev
                ),
            );
        } else {
            self.layout.labels.insert(token.value, addr);
        }
        self.reachable = true;
    }

    fn data(&mut self, token: Token) {
        let addr = self.next_addr();
        if self.reachable {
            self.notes.warn(
                addr,
                token.line,
                "You put raw data where it might be read as instructions. Place it after a `halt` or `jump` so it is not executed.",
            );
        }
        self.push(vec![token]);
    }

    fn command(&mut self, token: Token, rest: &mut impl Iterator<Item = Token>) {
        let addr = self.next_addr();
        let set = self.set;
        let Some(inst) = set.get(&token.value) else {
            let msg = format!("Unknown instruction `{}`.", token.value);
            self.notes.error(addr, token.line, msg.clone());
            self.push(vec![Token::error(msg, token.line, token.src)]);
            return;
        };

        if !self.reachable {
            self.notes.warn(
                addr,
                token.line,
                "Unreachable code: nothing jumps here. Add a label to make it a jump target.",
            );
            self.reachable = true;
        }
        if inst.transfers_control() {
            self.reachable = false;
        }

        if !inst.takes_operand() {
            self.push(vec![token]);
            return;
        }
        let Some(operand) = rest.next() else {
            self.notes.error(
                addr,
                token.line,
                format!(
                    "Instruction `{}` expects an operand, but reached the end of the file.",
                    token.value
                ),
            );
            self.push(vec![token]);
            return;
        };
        self.operand(inst, token, operand);
    }

    fn operand(&mut self, inst: &Instruction, token: Token, mut operand: Token) {
        let addr = self.next_addr();

        if operand.is(TokenKind::Error) {
            self.notes.error(
                addr,
                operand.line,
                format!(
                    "Operand for instruction `{}` has an error: {}{}",
                    token.value,
                    operand.value,
                    operand.note_suffix()
                ),
            );
            if inst.expects_label_ref() {
                // No placeholder address for label references
                self.push(vec![token]);
                return;
            }
            operand = Token::binary("0", operand.line, operand.src)
                .with_note("placeholder for an operand with an error");
        }

        let own_word = if inst.accepts(operand.kind) {
            operand.is(TokenKind::LabelRef)
        } else {
            let expected: Vec<String> = inst
                .operands
                .iter()
                .flatten()
                .map(|kind| format!("`{}`", kind))
                .collect();
            self.notes.error(
                addr,
                operand.line,
                format!(
                    "Invalid operand for instruction `{}`: \
                     expected one of [{}], got `{}` with value `{}`.{}",
                    token.value,
                    expected.join(", "),
                    operand.kind,
                    operand.value,
                    operand.note_suffix()
                ),
            );
            inst.expects_label_ref()
        };

        if own_word {
            self.push(vec![token]);
            self.push(vec![operand]);
        } else {
            self.push(vec![token, operand]);
        }
    }
}
