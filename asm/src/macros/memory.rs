use super::{fail, Allocator, Context, Macro, Registry, MEMORY_SIZE};
use crate::token::{join_src, Token};
use arch::TokenKind::{self, *};

/// Widest length the 4-bit length operand can express.
const CHUNK: usize = 16;

pub(super) fn register(registry: &mut Registry) {
    for name in [Label, Command] {
        for size in TokenKind::NUMBERS {
            registry.register(Macro::new("malloc", &[name, size], malloc));
        }
    }
    for count in [3, 2, 1] {
        let mut operands = vec![Command];
        operands.extend(std::iter::repeat(LabelRef).take(count));
        for length in TokenKind::NUMBERS {
            let mut explicit = operands.clone();
            explicit.push(length);
            registry.register(Macro::new("at", &explicit, at_math));
        }
        registry.register(Macro::new("at", &operands, at_math));
    }
    registry.register(Macro::new("at", &[LabelRef], at_address));
}

// malloc name size
fn malloc(call: &[Token], ctx: &mut Context) -> Vec<Token> {
    let (name, size) = (&call[1], &call[2]);
    let units = match size.number() {
        Some(0) => {
            return fail(
                format!("Cannot allocate 0 bits for `{}`.", name.value),
                size.line,
                call,
            )
        }
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => usize::MAX,
    };
    let alloc = ctx.allocator.allocate(&name.value, units);
    tracing::trace!(name = %name.value, address = alloc.address, size = units, "malloc");
    if ctx.allocator.is_exhausted() {
        return fail(
            format!(
                "Not enough memory to allocate {} bits for `{}`.",
                size.src, name.value
            ),
            size.line,
            call,
        );
    }
    vec![Token::new(
        Info,
        format!(
            "`{}` is allocated to [{}: {}] ({} bits)",
            name.value,
            alloc.address,
            alloc.end(),
            units
        ),
        call[0].line,
        join_src(call),
    )]
}

// at :name
fn at_address(call: &[Token], ctx: &mut Context) -> Vec<Token> {
    let name = &call[1];
    match ctx.allocator.get(&name.value) {
        Some(alloc) => vec![Token::binary(format!("{:b}", alloc.address), name.line, join_src(call))
            .with_note(format!("address of `{}`", name.value))],
        None => fail(
            format!("Memory label `{}` is not allocated.", name.value),
            name.line,
            call,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// source only
    Read,
    /// optional source, destination
    Unary,
    /// two sources, optional destination
    Binary,
}

fn shape(op: &str) -> Option<Shape> {
    match op {
        "checksum" | "bc" => Some(Shape::Read),
        "move_data" | "md" | "invert" | "bi" => Some(Shape::Unary),
        "add" | "+" | "subtract" | "-" | "and" | "ba" | "or" | "bo" | "xor" | "bx" | "nand"
        | "bna" | "nor" | "bno" | "nxor" | "bnx" => Some(Shape::Binary),
        _ => None,
    }
}

// at <op> :x [:y [:z]] [length]
fn at_math(call: &[Token], ctx: &mut Context) -> Vec<Token> {
    let head = &call[0];
    let op = &call[1];
    let (refs, explicit) = match call.last() {
        Some(last) if !last.is(LabelRef) => (&call[2..call.len() - 1], Some(last)),
        _ => (&call[2..], None),
    };

    // Operation length, stored as length - 1
    let length = match explicit {
        Some(token) => match token.number() {
            Some(0) => {
                return fail(
                    "Operation length in `at <math>` macro must be at least 1.",
                    token.line,
                    call,
                )
            }
            Some(n) if n <= MEMORY_SIZE as u64 => n as usize - 1,
            _ => {
                return fail(
                    format!(
                        "Operation length `{}` in `at <math>` macro exceeds memory size of {}.",
                        token.src, MEMORY_SIZE
                    ),
                    token.line,
                    call,
                )
            }
        },
        None => match infer_length(refs, &ctx.allocator) {
            Ok(size) if size <= MEMORY_SIZE => size - 1,
            Ok(size) => {
                return fail(
                    format!(
                        "Operation length {} in `at <math>` macro exceeds memory size of {}.",
                        size, MEMORY_SIZE
                    ),
                    head.line,
                    call,
                )
            }
            Err((msg, line)) => return fail(msg, line, call),
        },
    };

    let mut out = Vec::new();
    match (shape(&op.value), refs.len()) {
        (Some(Shape::Read), 1) => select(&mut out, "set_a", &refs[0], head.line),
        (Some(Shape::Read), _) => {
            return fail(
                format!(
                    "Incorrect number of operands for `{}` in `at <math>` macro. This operation only reads one input, so provide only the source label.",
                    op.value
                ),
                op.line,
                call,
            )
        }
        (Some(Shape::Unary), n) if n <= 2 => {
            if n == 2 {
                select(&mut out, "set_a", &refs[0], head.line);
            }
            select(&mut out, "set_c", &refs[n - 1], head.line);
        }
        (Some(Shape::Unary), _) => {
            return fail(
                format!(
                    "Incorrect number of operands for `{}` in `at <math>` macro. Provide a destination label, optionally preceded by a source label.",
                    op.value
                ),
                op.line,
                call,
            )
        }
        (Some(Shape::Binary), n) => {
            if n >= 2 {
                select(&mut out, "set_a", &refs[0], head.line);
                select(&mut out, "set_b", &refs[1], head.line);
            }
            if n != 2 {
                select(&mut out, "set_c", &refs[n - 1], head.line);
            }
        }
        (None, _) => {
            return fail(
                format!("Unknown math operation `{}` in `at <math>` macro.", op.value),
                op.line,
                call,
            )
        }
    }

    let mut remaining = length;
    while remaining >= CHUNK {
        out.push(op.clone());
        out.push(
            Token::binary("1111", op.line, "15")
                .with_note("split operation length from `at <math>` macro"),
        );
        remaining -= CHUNK;
    }
    out.push(op.clone());
    let mut tail = match explicit {
        Some(token) => Token::binary(format!("{:b}", remaining), token.line, token.src.clone())
            .with_note(format!("operation length {} encoded as length - 1", token.src)),
        None => Token::binary(format!("{:b}", remaining), op.line, (length + 1).to_string())
            .with_note("operation length inferred from allocation sizes"),
    };
    if length >= CHUNK {
        tail.annotate("split operation length from `at <math>` macro");
    }
    out.push(tail);
    tracing::trace!(op = %op.value, operands = refs.len(), length = length + 1, "at <math>");
    out
}

/// Common allocation size of the allocated operands.
fn infer_length(refs: &[Token], allocator: &Allocator) -> Result<usize, (String, usize)> {
    let mut found: Option<(usize, &Token)> = None;
    for token in refs {
        let Some(alloc) = allocator.get(&token.value) else {
            continue;
        };
        match found {
            None => found = Some((alloc.size, token)),
            Some((size, first)) if size != alloc.size => {
                return Err((
                    format!(
                        "Operation length mismatch in `at <math>` macro: `{}` has {} bits but `{}` has {} bits. Specify the length explicitly.",
                        first.value, size, token.value, alloc.size
                    ),
                    token.line,
                ))
            }
            Some(_) => {}
        }
    }
    match found {
        Some((size, _)) => Ok(size),
        None => Err((
            "Cannot infer operation length in `at <math>` macro: none of the labels are allocated. Specify the length explicitly.".to_string(),
            refs.first().map_or(0, |t| t.line),
        )),
    }
}

// set_x at :name
fn select(out: &mut Vec<Token>, register: &str, target: &Token, line: usize) {
    out.push(Token::command(register, line));
    out.push(Token::command("at", line).with_note("from `at <math>` macro"));
    let mut target = target.clone();
    target.line = line;
    out.push(target);
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::macros::Registry;
    use crate::preprocess::preprocess;
    use crate::token::Token;
    use arch::TokenKind::*;

    fn expand(code: &str) -> Vec<Token> {
        preprocess(Lexer::new(code).parse(), &Registry::builtin())
    }

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn malloc_and_at() {
        let tokens = expand("malloc a 4\nmalloc b: 4\nat :a\nat :b");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, Info);
        assert_eq!(tokens[0].value, "`a` is allocated to [0: 3] (4 bits)");
        assert_eq!(tokens[1].value, "`b` is allocated to [4: 7] (4 bits)");
        assert_eq!(tokens[2].kind, BinaryLiteral);
        assert_eq!(tokens[2].value, "0");
        assert_eq!(tokens[3].value, "100");
        assert_eq!(tokens[3].line, 4);
    }

    #[test]
    fn malloc_near_ceiling() {
        let tokens = expand("malloc a 4\nmalloc b 4\nmalloc c 252");
        assert_eq!(tokens[2].kind, Error);
        assert_eq!(tokens[2].value, "Not enough memory to allocate 252 bits for `c`.");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn malloc_zero() {
        let tokens = expand("malloc a 0");
        assert_eq!(tokens[0].kind, Error);
    }

    #[test]
    fn at_unallocated() {
        let tokens = expand("at :ghost");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, Error);
        assert_eq!(tokens[0].value, "Memory label `ghost` is not allocated.");
    }

    #[test]
    fn math_two_inputs() {
        let tokens = expand("malloc x 4\nmalloc y 4\nmalloc z 4\nat add :x :y :z");
        let tokens = &tokens[3..];
        assert_eq!(
            values(tokens),
            vec![
                "set_a", "0", "set_b", "100", "set_c", "1000", "add", "11"
            ]
        );
        assert!(tokens.iter().all(|t| t.line == 4));
    }

    #[test]
    fn math_in_place() {
        let tokens = expand("malloc x 8\nmalloc y 8\nat xor :x :y");
        assert_eq!(
            values(&tokens[2..]),
            vec!["set_a", "0", "set_b", "1000", "xor", "111"]
        );
    }

    #[test]
    fn math_unary() {
        let tokens = expand("malloc x 2\nmalloc y 2\nat md :x :y\nat bi :y");
        assert_eq!(
            values(&tokens[2..]),
            vec!["set_a", "0", "set_c", "10", "md", "1", "set_c", "10", "bi", "1"]
        );
    }

    #[test]
    fn math_checksum_arity() {
        let tokens = expand("malloc x 2\nmalloc y 2\nat bc :x :y");
        assert_eq!(tokens[2].kind, Error);
        assert!(tokens[2].value.starts_with("Incorrect number of operands for `bc`"));
    }

    #[test]
    fn math_split() {
        let tokens = expand("malloc x 40\nat bi :x");
        assert_eq!(
            values(&tokens[1..]),
            vec!["set_c", "0", "bi", "1111", "bi", "1111", "bi", "111"]
        );
    }

    #[test]
    fn math_explicit_length() {
        let tokens = expand("malloc p 4\nmalloc q 8\nat + :p :q 16");
        assert_eq!(
            values(&tokens[2..]),
            vec!["set_a", "0", "set_b", "100", "+", "1111"]
        );
        assert_eq!(tokens[7].src, "16");
        let tokens = expand("at + :p :q 0");
        assert_eq!(tokens[0].kind, Error);
    }

    #[test]
    fn math_length_mismatch() {
        let tokens = expand("malloc x 4\nmalloc y 8\nat add :x :y");
        assert_eq!(tokens[2].kind, Error);
        assert!(tokens[2].value.starts_with("Operation length mismatch"));
    }

    #[test]
    fn math_cannot_infer() {
        let tokens = expand("at add :x :y");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, Error);
    }

    #[test]
    fn math_unknown_op() {
        let tokens = expand("malloc x 4\nat frob :x");
        assert_eq!(tokens[1].kind, Error);
        assert_eq!(tokens[1].value, "Unknown math operation `frob` in `at <math>` macro.");
    }
}
