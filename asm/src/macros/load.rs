use super::{fail, Context, Macro, Registry};
use crate::token::Token;
use arch::TokenKind;

pub(super) fn register(registry: &mut Registry) {
    for name in ["load_byte", "lb"] {
        for kind in TokenKind::NUMBERS {
            registry.register(Macro::new(name, &[kind], load_byte));
        }
    }
    for name in ["load_double", "ld"] {
        for kind in TokenKind::NUMBERS {
            registry.register(Macro::new(name, &[kind], load_double));
        }
    }
}

fn load_byte(call: &[Token], _: &mut Context) -> Vec<Token> {
    load_nibbles(call, 2, |idx, src| {
        let half = if idx == 0 { "upper" } else { "lower" };
        format!("{} 4 bits of byte {}", half, src)
    })
}

fn load_double(call: &[Token], _: &mut Context) -> Vec<Token> {
    load_nibbles(call, 4, |idx, src| {
        format!("bits {}-{} of double byte {}", 15 - idx * 4, 12 - idx * 4, src)
    })
}

/// `load` per nibble, most significant first. The alias follows the call:
/// `load_byte` loads with `load`, `lb` with `l`.
fn load_nibbles(call: &[Token], nibbles: usize, describe: fn(usize, &str) -> String) -> Vec<Token> {
    let (head, value) = (&call[0], &call[1]);
    let max = (1u64 << (nibbles * 4)) - 1;
    let number = match value.number() {
        Some(n) if n <= max => n,
        found => {
            let shown = found.map_or(value.src.clone(), |n| n.to_string());
            let what = if nibbles == 2 { "Byte" } else { "Double byte" };
            return fail(
                format!("{} value {} out of range (0-{}).", what, shown, max),
                value.line,
                call,
            );
        }
    };
    let load = if head.src.contains('_') { "load" } else { "l" };

    let mut out = Vec::with_capacity(nibbles * 2);
    for idx in 0..nibbles {
        let shift = (nibbles - 1 - idx) * 4;
        let line = if idx == 0 { head.line } else { value.line };
        out.push(Token::command(load, line).with_note_opt(if idx == 0 {
            head.note.clone()
        } else {
            None
        }));
        out.push(
            Token::binary(format!("{:04b}", (number >> shift) & 0xf), value.line, value.src.clone())
                .with_note(describe(idx, &value.src)),
        );
    }
    out
}
