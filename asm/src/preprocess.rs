use crate::macros::{Context, Registry};
use crate::token::Token;
use arch::TokenKind;

/// Expands every macro call with a fresh [`Context`].
pub fn preprocess(tokens: Vec<Token>, registry: &Registry) -> Vec<Token> {
    preprocess_with(tokens, registry, &mut Context::new())
}

/// One left-to-right pass per registered macro, in registration order.
///
/// An expansion is spliced in place and the scan resumes at the same
/// position, so the spliced tokens are seen by the rest of the current pass
/// and by every later pass, never by earlier ones. Calls that match no
/// signature are turned into errors afterwards.
pub fn preprocess_with(
    mut tokens: Vec<Token>,
    registry: &Registry,
    ctx: &mut Context,
) -> Vec<Token> {
    for (pass, mac) in registry.iter().enumerate() {
        let mut idx = 0;
        while idx < tokens.len() {
            if !mac.matches(&tokens[idx..]) {
                idx += 1;
                continue;
            }
            let end = idx + mac.len();
            let output = mac.expand(&tokens[idx..end], ctx);
            tracing::trace!(
                pass,
                name = mac.name,
                line = tokens[idx].line,
                "expanded into {} tokens",
                output.len()
            );
            tokens.splice(idx..end, output);
        }
    }

    for token in tokens.iter_mut() {
        if token.kind == TokenKind::Command && registry.is_macro(&token.value) {
            token.kind = TokenKind::Error;
            token.value = registry.usage(&token.value);
        }
    }
    tracing::debug!("{} tokens after macro expansion", tokens.len());
    tokens
}
