use onebpc::{compile, InstructionSet, MemoryMap, Severity, TokenKind, WORD_WIDTH};

fn build(code: &str) -> MemoryMap {
    let map = compile(code, &InstructionSet::onebpc());
    for (address, word) in map.binary.iter().enumerate() {
        let src: Vec<&str> = map.tokens[address].iter().map(|t| t.src.as_str()).collect();
        println!("{:04}: {} {}", address, word, src.join(" "));
    }
    for note in &map.notes {
        println!("{}", note);
    }
    map
}

fn errors_at(map: &MemoryMap) -> Vec<(usize, usize)> {
    map.notes
        .iter()
        .filter(|n| n.severity == Severity::Error)
        .map(|n| (n.address, n.line))
        .collect()
}

macro_rules! test_words {
    ($name:ident, $code:expr, [$($word:expr),*]) => {
        #[test]
        fn $name() {
            let map = build($code);
            assert_eq!(map.binary, vec![$($word.to_string()),*]);
            assert_eq!(map.errors(), 0);
        }
    };
}

test_words!(
    straight_line,
    "load 5\nset_a 0x10\nadd %11\nhalt",
    ["0000010101", "0100010000", "0001000011", "0000000000"]
);
test_words!(
    load_byte_ff,
    "load_byte 0xff\nhalt",
    ["0000011111", "0000011111", "0000000000"]
);
test_words!(
    load_byte_ff_upper,
    "load_byte 0xFF\nhalt",
    ["0000011111", "0000011111", "0000000000"]
);
test_words!(
    load_double_msb_first,
    "ld 0xa5c3\nhalt",
    ["0000011010", "0000010101", "0000011100", "0000010011", "0000000000"]
);
test_words!(
    while_loop,
    "top: do\nload 1\nwhile a0 :top\nhalt",
    ["0000010001", "0000000011", "0000000000", "0000000000"]
);

#[test]
fn words_always_fill_the_width() {
    let sources = [
        "",
        "halt",
        "%11111111111111\nload 99999\njump :missing",
        "frobnicate :x 12 0x\n; only a comment\nx: x: halt",
        "at :nothing\nlb 300\nwhile q :x\nuntil a0 :x\nmalloc",
        "load\n",
    ];
    for code in sources {
        let map = build(code);
        assert_eq!(map.binary.len(), map.tokens.len());
        for word in &map.binary {
            assert_eq!(word.len(), WORD_WIDTH, "{:?}", code);
            assert!(word.chars().all(|c| c == '0' || c == '1'));
        }
    }
}

#[test]
fn label_refs_resolve() {
    let map = build("start: load 1\nnext: jump :next\njt :start\nji :end\nend: halt");
    assert_eq!(map.labels.get("start"), Some(&0));
    assert_eq!(map.labels.get("next"), Some(&1));
    assert_eq!(map.labels.get("end"), Some(&7));
    assert_eq!(map.binary[2], "0000000001");
    assert_eq!(map.binary[4], "0000000000");
    assert_eq!(map.binary[6], "0000000111");
    assert_eq!(map.errors(), 0);
}

#[test]
fn duplicate_label() {
    let map = build("a: load 1\na: load 2\njump :a");
    assert_eq!(map.labels.get("a"), Some(&0));
    assert_eq!(errors_at(&map), vec![(1, 2)]);
    assert_eq!(map.binary[3], "0000000000");
}

#[test]
fn raw_binary_round_trip() {
    let words = ["1", "0", "1010101010", "111", "0000000001"];
    let code: Vec<String> = words.iter().map(|w| format!("%{}", w)).collect();
    let map = build(&code.join("\n"));
    assert_eq!(map.len(), words.len());
    for (word, bits) in map.binary.iter().zip(words) {
        assert_eq!(word, &format!("{:0>10}", bits));
    }
    assert_eq!(map.errors(), 0);
}

#[test]
fn oversized_literals_are_truncated() {
    let map = build("halt\n1180591620717411303424\n0x400000000000000000");
    assert_eq!(map.len(), 3);
    assert_eq!(map.binary[1], "1000000000");
    assert_eq!(map.binary[2], "1000000000");
    assert!(map.tokens[1][0].is(TokenKind::BinaryLiteral));
    assert_eq!(errors_at(&map), vec![(1, 2), (2, 3)]);
    let note = map.notes.iter().find(|n| n.severity == Severity::Error).unwrap();
    assert!(note.message.starts_with("Binary value `1000"), "{}", note.message);
}

#[test]
fn malloc_exhaustion() {
    let map = build("malloc a 4\nmalloc b 4\nset_a at :a\nset_b at :b\nmalloc c 252");
    assert_eq!(map.binary[0], "0100000000");
    assert_eq!(map.binary[1], "1000000100");
    let errors: Vec<_> = map
        .notes
        .iter()
        .filter(|n| n.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 5);
    assert_eq!(errors[0].message, "Not enough memory to allocate 252 bits for `c`.");
}

#[test]
fn malloc_info_notes() {
    let map = build("malloc buf 8\nhalt");
    let info: Vec<&str> = map
        .notes
        .iter()
        .filter(|n| n.severity == Severity::Info)
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(info, vec!["`buf` is allocated to [0: 7] (8 bits)"]);
}

#[test]
fn at_math_program() {
    let map = build("malloc x 4\nmalloc y 4\nat add :x :y\nhalt");
    assert_eq!(
        map.binary,
        vec!["0100000000", "1000000100", "0001000011", "0000000000"]
    );
    assert_eq!(map.errors(), 0);
}

#[test]
fn until_loop() {
    let map = build("loop: do\nload 1\nuntil t :loop\nhalt");
    assert_eq!(map.labels.get("loop"), Some(&0));
    assert_eq!(map.labels.get("__loop_end"), Some(&5));
    assert_eq!(
        map.binary,
        vec![
            "0000010001",
            "0000000010",
            "0000000101",
            "0000000001",
            "0000000000",
            "0000000000"
        ]
    );
    let kinds: Vec<TokenKind> = map.tokens[1..5].iter().map(|g| g[0].kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Command,
            TokenKind::LabelRef,
            TokenKind::Command,
            TokenKind::LabelRef
        ]
    );
    assert_eq!(map.errors(), 0);
}

#[test]
fn until_end_label_can_collide() {
    let map = build("__loop_end: halt\nloop: do\nload 1\nuntil t :loop\nhalt");
    assert_eq!(map.labels.get("__loop_end"), Some(&0));
    assert_eq!(errors_at(&map).len(), 1);
    let dup = map.notes.iter().find(|n| n.severity == Severity::Error).unwrap();
    assert!(dup.message.starts_with("Duplicate label `__loop_end`"));
}

#[test]
fn unknown_instruction() {
    let map = build("load 1\n\nfrobnicate\nhalt");
    assert_eq!(map.len(), 3);
    assert_eq!(errors_at(&map), vec![(1, 3)]);
    assert_eq!(map.binary[1], "0000000000");
}

#[test]
fn malformed_macro_is_located() {
    let map = build("halt\nx: load_byte :x");
    let (address, line) = errors_at(&map)[0];
    assert_eq!((address, line), (1, 2));
    let note = map.notes.iter().find(|n| n.severity == Severity::Error).unwrap();
    assert!(note.message.starts_with("Macro `load_byte` usage is incorrect."));
}

#[test]
fn severity_filtering() {
    let map = build("// intro\n%1\nhalt\nload 1\nfrobnicate\njump :nowhere\nback: jump :back");
    let mut seen = [0usize; 4];
    for note in &map.notes {
        seen[u8::from(note.severity) as usize - 1] += 1;
    }
    assert!(seen.iter().all(|&n| n > 0), "{:?}", seen);

    let shown: Vec<_> = map.notes.filter(Severity::Warning).collect();
    assert_eq!(shown.len(), map.errors() + map.warnings());
    assert!(shown
        .iter()
        .all(|n| matches!(n.severity, Severity::Error | Severity::Warning)));
}

#[test]
fn only_errors() {
    let map = build("%2 %3\n???");
    assert_eq!(map.len(), 3);
    assert_eq!(map.errors(), 3);
    assert!(map.binary.iter().all(|w| w == "0000000000"));
}
