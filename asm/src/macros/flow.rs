use super::{fail, Context, Macro, Registry};
use crate::token::Token;
use arch::{Loop, TokenKind::*};

pub(super) fn register(registry: &mut Registry) {
    // Marks the loop head for readability only
    registry.register(Macro::new("do", &[], |_, _| Vec::new()));
    registry.register(Macro::new("while", &[Command, LabelRef], do_while));
    registry.register(Macro::new("until", &[Command, LabelRef], do_until));
}

fn unknown_condition(kind: Loop, call: &[Token]) -> Vec<Token> {
    let (head, cond) = (&call[0], &call[1]);
    fail(
        format!(
            "Unknown condition `{}` in `{}` macro. Please use one of: {}",
            cond.value,
            head.value,
            kind.conditions().join(", ")
        ),
        cond.line,
        call,
    )
}

// while <cond> :label
fn do_while(call: &[Token], _: &mut Context) -> Vec<Token> {
    let (head, cond, label) = (&call[0], &call[1], &call[2]);
    let Some(jump) = Loop::While.jump(&cond.value) else {
        return unknown_condition(Loop::While, call);
    };
    vec![
        Token::new(Command, jump, head.line, format!("{} {}", head.src, cond.src))
            .with_note_opt(head.note.clone()),
        label.clone(),
    ]
}

// until <cond> :label
//
//     jt :__label_end
//     jump :label
//   __label_end:
fn do_until(call: &[Token], _: &mut Context) -> Vec<Token> {
    let (head, cond, label) = (&call[0], &call[1], &call[2]);
    let Some(jump) = Loop::Until.jump(&cond.value) else {
        return unknown_condition(Loop::Until, call);
    };
    let end = format!("__{}_end", label.value);
    let note = format!("end of `until` loop `{}`", label.value);
    vec![
        Token::new(Command, jump, head.line, format!("{} {}", head.src, cond.src))
            .with_note_opt(head.note.clone()),
        Token::new(LabelRef, &end, head.line, format!(":{}", end)).with_note(note.clone()),
        Token::new(Command, Loop::back_jump(&cond.value), label.line, "until")
            .with_note(format!("back to `{}`", label.value)),
        label.clone(),
        Token::new(Label, &end, label.line, format!("{}:", end)).with_note(note),
    ]
}
