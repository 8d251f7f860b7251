use strum::Display;

/// Kind of a source token.
///
/// Instruction operand sets are expressed in these kinds, so the vocabulary
/// lives next to the instruction table rather than in the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum TokenKind {
    #[strum(to_string = "Instruction")]
    Command,
    #[strum(to_string = "Binary Number")]
    BinaryLiteral,
    #[strum(to_string = "Decimal Number")]
    DecimalLiteral,
    #[strum(to_string = "Hexadecimal Number")]
    HexLiteral,
    #[strum(to_string = "Label")]
    Label,
    #[strum(to_string = "Label Reference")]
    LabelRef,
    #[strum(to_string = "Comment")]
    Comment,
    #[strum(to_string = "Error")]
    Error,
    #[strum(to_string = "Info")]
    Info,
}

impl TokenKind {
    /// Binary, decimal and hexadecimal literals.
    pub const NUMBERS: [TokenKind; 3] = [
        TokenKind::BinaryLiteral,
        TokenKind::DecimalLiteral,
        TokenKind::HexLiteral,
    ];

    pub fn is_number(&self) -> bool {
        Self::NUMBERS.contains(self)
    }
}
