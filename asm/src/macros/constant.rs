use super::{fail, Context, Macro, Registry};
use crate::token::{join_src, Token};
use arch::TokenKind::*;

pub(super) fn register(registry: &mut Registry) {
    for name in [Label, Command] {
        for value in [BinaryLiteral, DecimalLiteral, HexLiteral, Command] {
            registry.register(Macro::new("define", &[name, value], define));
        }
    }
    registry.register(Macro::new("use", &[LabelRef], use_define));
}

// define name: value
fn define(call: &[Token], ctx: &mut Context) -> Vec<Token> {
    let (name, value) = (&call[1], &call[2]);
    if ctx.defines.contains_key(&name.value) {
        return fail(
            format!("Macro `{}` is already defined.", name.value),
            name.line,
            call,
        );
    }
    ctx.defines.insert(name.value.clone(), value.clone());
    tracing::trace!(name = %name.value, value = %value.value, "define");
    Vec::new()
}

// use :name
fn use_define(call: &[Token], ctx: &mut Context) -> Vec<Token> {
    let name = &call[1];
    match ctx.defines.get(&name.value) {
        Some(value) => vec![Token::new(value.kind, value.value.clone(), name.line, join_src(call))
            .with_note(format!("from `define {}`", name.value))],
        None => fail(
            format!("Macro `{}` is not defined.", name.value),
            name.line,
            call,
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::macros::Registry;
    use crate::preprocess::preprocess;
    use arch::TokenKind::*;

    fn expand(code: &str) -> Vec<crate::token::Token> {
        preprocess(Lexer::new(code).parse(), &Registry::builtin())
    }

    #[test]
    fn define_then_use() {
        let tokens = expand("define speed: %101\nload use :speed");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, BinaryLiteral);
        assert_eq!(tokens[1].value, "101");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].src, "use :speed");
    }

    #[test]
    fn define_command() {
        let tokens = expand("define stop halt\nuse :stop");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_command("halt"));
    }

    #[test]
    fn redefinition() {
        let tokens = expand("define x: 1\ndefine x: 2\nuse :x");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, Error);
        assert_eq!(tokens[0].value, "Macro `x` is already defined.");
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].value, "1");
    }

    #[test]
    fn undefined() {
        let tokens = expand("use :nothing");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, Error);
        assert_eq!(tokens[0].value, "Macro `nothing` is not defined.");
    }
}
