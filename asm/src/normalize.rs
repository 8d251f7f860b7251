use crate::token::Token;
use arch::TokenKind;

/// Rewrites decimal and hexadecimal literals as binary ones.
pub fn normalize(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().map(to_binary).collect()
}

pub fn to_binary(token: Token) -> Token {
    let origin = match token.kind {
        TokenKind::DecimalLiteral => format!("converted from decimal: {}", token.value),
        TokenKind::HexLiteral => format!("converted from hex: 0x{}", token.value),
        _ => return token,
    };
    match token.bits() {
        Some(value) => {
            let mut bin = Token {
                kind: TokenKind::BinaryLiteral,
                value,
                ..token
            };
            bin.annotate(&origin);
            bin
        }
        None => Token::error(
            format!("Cannot convert number `{}`.", token.src),
            token.line,
            token.src,
        )
        .with_note_opt(token.note),
    }
}
