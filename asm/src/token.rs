use arch::TokenKind;
use color_print::cformat;
use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// 1-based source line
    pub line: usize,
    /// Source text as written
    pub src: String,
    pub note: Option<String>,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        value: impl Into<String>,
        line: usize,
        src: impl Into<String>,
    ) -> Self {
        Token {
            kind,
            value: value.into(),
            line,
            src: src.into(),
            note: None,
        }
    }

    pub fn command(name: &str, line: usize) -> Self {
        Token::new(TokenKind::Command, name, line, name)
    }

    pub fn binary(bits: impl Into<String>, line: usize, src: impl Into<String>) -> Self {
        Token::new(TokenKind::BinaryLiteral, bits, line, src)
    }

    pub fn error(msg: impl Into<String>, line: usize, src: impl Into<String>) -> Self {
        Token::new(TokenKind::Error, msg, line, src)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Replaces the note, dropping an empty one.
    pub fn with_note_opt(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.is_empty());
        self
    }

    /// Appends to the existing note.
    pub fn annotate(&mut self, note: &str) {
        self.note = Some(match self.note.take() {
            Some(prev) if !prev.is_empty() => format!("{}, {}", prev, note),
            _ => note.to_string(),
        });
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_command(&self, name: &str) -> bool {
        self.kind == TokenKind::Command && self.value == name
    }

    fn radix(&self) -> Option<u32> {
        match self.kind {
            TokenKind::BinaryLiteral => Some(2),
            TokenKind::DecimalLiteral => Some(10),
            TokenKind::HexLiteral => Some(16),
            _ => None,
        }
    }

    /// Numeric value of a binary, decimal or hexadecimal literal.
    ///
    /// `None` for other kinds and for values that do not fit in 64 bits.
    pub fn number(&self) -> Option<u64> {
        u64::from_str_radix(&self.value, self.radix()?).ok()
    }

    /// Binary digits of a numeric literal, without leading zeros and of any
    /// length.
    pub fn bits(&self) -> Option<String> {
        BigUint::parse_bytes(self.value.as_bytes(), self.radix()?).map(|n| n.to_str_radix(2))
    }

    /// " Note: ..." suffix for diagnostics, empty without a note.
    pub fn note_suffix(&self) -> String {
        match &self.note {
            Some(note) if !note.is_empty() => format!(" Note: {}", note),
            _ => String::new(),
        }
    }

    pub fn cformat(&self) -> String {
        match self.kind {
            TokenKind::Command => cformat!("<r>{}</>", self.src),
            TokenKind::BinaryLiteral | TokenKind::DecimalLiteral | TokenKind::HexLiteral => {
                cformat!("<y>{}</>", self.src)
            }
            TokenKind::Label | TokenKind::LabelRef => cformat!("<g>{}</>", self.src),
            TokenKind::Error => cformat!("<r,bold>{}</>", self.src),
            TokenKind::Comment | TokenKind::Info => cformat!("<dim>{}</>", self.src),
        }
    }
}

/// Source text of a macro call, for diagnostics.
pub fn join_src(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.src.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
