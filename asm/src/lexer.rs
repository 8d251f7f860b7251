use crate::token::Token;
use arch::TokenKind;

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    pub fn parse(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (idx, line) in self.code.lines().enumerate() {
            tokens.extend(LineLexer::new(line, idx + 1).parse());
        }
        tracing::debug!("lexed {} tokens", tokens.len());
        tokens
    }
}

/// Splits one source line. Lines never share state.
pub struct LineLexer<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(code: &'a str, line: usize) -> Self {
        Self { rest: code, line }
    }

    pub fn parse(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn next_token(&mut self) -> Option<Token> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }

        // Comment: the rest of the line
        if let Some(body) = ["//", ";", "#"]
            .iter()
            .find_map(|marker| rest.strip_prefix(*marker))
        {
            self.rest = "";
            return Some(Token::new(TokenKind::Comment, body.trim(), self.line, rest));
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (text, remainder) = rest.split_at(end);
        self.rest = remainder;
        Some(classify(text, self.line))
    }
}

// ----------------------------------------------------------------------------
// Classification

fn classify(text: &str, line: usize) -> Token {
    let (kind, value) = if is_command(text) {
        (TokenKind::Command, text)
    } else if let Some(bits) = text.strip_prefix('%').filter(|s| is_all(s, is_bit)) {
        (TokenKind::BinaryLiteral, bits)
    } else if is_all(text, |c| c.is_ascii_digit()) {
        (TokenKind::DecimalLiteral, text)
    } else if let Some(hex) = text.strip_prefix("0x").filter(|s| is_all(s, is_hex)) {
        (TokenKind::HexLiteral, hex)
    } else if let Some(name) = text.strip_suffix(':').filter(|s| is_ident(s)) {
        (TokenKind::Label, name)
    } else if let Some(name) = text.strip_prefix(':').filter(|s| is_ident(s)) {
        (TokenKind::LabelRef, name)
    } else {
        return Token::error(format!("Syntax error: Cannot understand `{}`", text), line, text);
    };
    Token::new(kind, value, line, text)
}

fn is_all(s: &str, pred: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(pred)
}

fn is_bit(c: char) -> bool {
    c == '0' || c == '1'
}

fn is_hex(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f' | 'A'..='F')
}

// Commands: `add`, `jump_if_a_0`, `+`, `-`
fn is_command(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if matches!(c, 'a'..='z' | '+' | '-' | '_') => {
            chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '+' | '-' | '_'))
        }
        _ => false,
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if matches!(c, 'a'..='z' | '_') => {
            chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        }
        _ => false,
    }
}
