use bimap::BiMap;
use once_cell::sync::Lazy;

/// Conditions accepted by `while`, mapped to their conditional jump.
static WHILE_COND: Lazy<BiMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map: BiMap<&'static str, &'static str> = BiMap::new();
    map.insert("a0", "ja0");
    map.insert("a_0", "jump_if_a_0");
    map.insert("a1", "ja1");
    map.insert("a_1", "jump_if_a_1");
    map.insert("c0", "jc0");
    map.insert("c_0", "jump_if_carry_0");
    map.insert("c1", "jc1");
    map.insert("c_1", "jump_if_carry_1");
    map.insert("t", "jt");
    map.insert("triggered", "jump_if_triggered");
    map
});

/// Conditions accepted by `until`.
static UNTIL_COND: Lazy<BiMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map: BiMap<&'static str, &'static str> = BiMap::new();
    map.insert("t", "jt");
    map.insert("triggered", "jump_if_triggered");
    map
});

static WHILE_ORDER: [&str; 10] = [
    "a0",
    "a_0",
    "a1",
    "a_1",
    "c0",
    "c_0",
    "c1",
    "c_1",
    "t",
    "triggered",
];

static UNTIL_ORDER: [&str; 2] = ["t", "triggered"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loop {
    While,
    Until,
}

impl Loop {
    fn table(&self) -> &'static BiMap<&'static str, &'static str> {
        match self {
            Loop::While => &*WHILE_COND,
            Loop::Until => &*UNTIL_COND,
        }
    }

    /// Jump alias taken when `cond` holds.
    pub fn jump(&self, cond: &str) -> Option<&'static str> {
        self.table().get_by_left(cond).copied()
    }

    /// Condition spelling for a conditional jump alias.
    pub fn condition(&self, jump: &str) -> Option<&'static str> {
        self.table().get_by_right(jump).copied()
    }

    /// Accepted condition names, in documentation order.
    pub fn conditions(&self) -> &'static [&'static str] {
        match self {
            Loop::While => &WHILE_ORDER[..],
            Loop::Until => &UNTIL_ORDER[..],
        }
    }

    /// Unconditional jump alias closing an `until` loop; matches the
    /// short or long spelling of the condition.
    pub fn back_jump(cond: &str) -> &'static str {
        if cond.len() < 3 {
            "jump"
        } else {
            "ji"
        }
    }
}
