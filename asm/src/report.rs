use crate::memory::MemoryMap;
use crate::note::{Note, Severity};
use crate::token::Token;
use arch::{InstructionSet, Loop};
use color_print::cformat;
use std::collections::HashSet;

/// Listing layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub show_labels: bool,
    /// Notes at least this severe are listed, `None` lists none
    pub note_level: Option<Severity>,
    /// Put labels and notes on their own lines
    pub spread_notes: bool,
    pub word_wrap: Option<usize>,
    pub address_numbers: bool,
    pub token_src: bool,
    pub token_notes: bool,
    /// `#` for 1 and `-` for 0
    pub hashtags: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            show_labels: false,
            note_level: None,
            spread_notes: false,
            word_wrap: None,
            address_numbers: false,
            token_src: false,
            token_notes: false,
            hashtags: false,
        }
    }
}

/// The compiled listing, one word per line plus whatever the options add.
pub fn render(map: &MemoryMap, opts: &ReportOptions) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut last_line = 0;
    let mut emitted: HashSet<usize> = HashSet::new();

    for (address, word) in map.binary.iter().enumerate() {
        let tokens = &map.tokens[address];
        let current_line = tokens.first().map_or(last_line, |t| t.line);
        let labels = if opts.show_labels {
            map.labels_at(address)
        } else {
            Vec::new()
        };

        // Notes raised on source lines that produced no word
        let mut skipped: Vec<&Note> = Vec::new();
        if let (true, Some(level)) = (opts.spread_notes, opts.note_level) {
            for (idx, note) in map.notes.iter().enumerate() {
                if note.severity.within(level)
                    && note.line > last_line
                    && note.line < current_line
                    && emitted.insert(idx)
                {
                    skipped.push(note);
                }
            }
            skipped.sort_by_key(|n| n.severity);
            last_line = current_line;
        }

        let mut notes: Vec<(usize, Severity, String)> = Vec::new();
        if let Some(level) = opts.note_level {
            for (idx, note) in map.notes.iter().enumerate() {
                if note.address != address || !note.severity.within(level) {
                    continue;
                }
                if opts.spread_notes && (note.line < current_line || !emitted.insert(idx)) {
                    continue;
                }
                notes.push((note.line, note.severity, note.message.clone()));
            }
        }
        if opts.token_notes {
            for token in tokens {
                if let Some(note) = &token.note {
                    notes.push((token.line, Severity::Info, note.clone()));
                }
            }
        }
        notes.sort_by_key(|(_, severity, _)| *severity);

        let mut line = String::new();
        if opts.address_numbers {
            line.push_str(&format!("{:04}:  ", address));
        }
        if opts.hashtags {
            line.push_str(&word.replace('0', "-").replace('1', "#"));
        } else {
            line.push_str(word);
        }
        let line_len = line.len();
        let src: Vec<&str> = tokens.iter().map(|t| t.src.as_str()).collect();
        let mut note_texts: Vec<String> = notes
            .iter()
            .map(|(line, severity, text)| format!("{} line {}: {}", severity, line, text))
            .collect();

        if !opts.spread_notes {
            if !labels.is_empty() || opts.token_src || !note_texts.is_empty() {
                line.push(' ');
            }
            if !labels.is_empty() {
                line.push_str(&format!(" {}:", labels.join(": ")));
            }
            if opts.token_src {
                line.push_str(&format!(" {}", src.join(" ")));
            }
            if !note_texts.is_empty() {
                let bracketed: Vec<String> =
                    note_texts.iter().map(|t| format!("[{}]", t)).collect();
                line.push_str(&format!(" {}", bracketed.join(" ")));
            }
            output.push(line);
            continue;
        }

        if opts.token_src {
            line.push_str(&format!("  {}", src.join(" ")));
        }
        let pad = " ".repeat(line_len + 2);
        let mut skipped_texts: Vec<String> = skipped
            .iter()
            .map(|n| format!("{} line {}: {}", n.severity, n.line, n.message))
            .collect();
        if let Some(limit) = opts.word_wrap {
            let width = limit.saturating_sub(line_len + 2);
            note_texts = wrap_all(&note_texts, width);
            skipped_texts = wrap_all(&skipped_texts, width);
        }

        for text in skipped_texts {
            output.push(format!("{}{}", pad, text));
        }
        for label in &labels {
            if opts.address_numbers {
                output.push(format!("      {}:", label));
            } else {
                output.push(format!("{}:", label));
            }
        }
        let mut texts = note_texts.into_iter();
        if opts.token_src {
            output.push(line);
        } else {
            match texts.next() {
                Some(first) => output.push(format!("{}  {}", line, first)),
                None => output.push(line),
            }
        }
        for text in texts {
            output.push(format!("{}{}", pad, text));
        }
    }
    output.join("\n")
}

fn wrap_all(texts: &[String], width: usize) -> Vec<String> {
    texts
        .iter()
        .flat_map(|t| {
            word_wrap(t, width, 4)
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Greedy wrap on spaces. Continuation lines start with `indent` spaces.
/// A single word longer than `width` keeps its own line.
pub fn word_wrap(text: &str, width: usize, indent: usize) -> String {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or("").to_string();
    for word in words {
        if current.len() + word.len() + 1 <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(current);
            }
            current = format!("{}{}", " ".repeat(indent), word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Colored view of the tokens behind every word.
pub fn dump(map: &MemoryMap) -> String {
    let mut lines = Vec::with_capacity(map.len());
    for (address, word) in map.binary.iter().enumerate() {
        let labels: Vec<String> = map
            .labels_at(address)
            .iter()
            .map(|label| cformat!("<g,bold>{}:</>", label))
            .collect();
        let tokens: Vec<String> = map.tokens[address].iter().map(Token::cformat).collect();
        lines.push(cformat!(
            "<dim>{:04}</> {} {} {}",
            address,
            word,
            labels.join(" "),
            tokens.join(" ")
        ));
    }
    lines.join("\n")
}

/// One row per instruction. Conditional jumps also show the `while`
/// conditions that select them.
pub fn instruction_table(set: &InstructionSet) -> String {
    set.iter()
        .map(|inst| {
            let conds: Vec<&str> = inst
                .names
                .iter()
                .filter_map(|name| Loop::While.condition(name))
                .collect();
            if conds.is_empty() {
                inst.cformat()
            } else {
                cformat!("{} <dim>(while {})</>", inst.cformat(), conds.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notes ranked by severity then address, up to `level` (warnings by
/// default), then the error and warning counts.
pub fn summary(map: &MemoryMap, level: Option<Severity>) -> String {
    summarize(map, level, |note| vec![note.to_string()], counts(map))
}

/// [`summary`] with each note wrapped to `width`.
pub fn summary_wrapped(map: &MemoryMap, level: Option<Severity>, width: usize) -> String {
    let wrap = |note: &Note| -> Vec<String> {
        word_wrap(&note.to_string(), width, 4)
            .lines()
            .map(str::to_string)
            .collect()
    };
    summarize(map, level, wrap, counts(map))
}

/// [`summary`] for the terminal.
pub fn csummary(map: &MemoryMap, level: Option<Severity>) -> String {
    let footer = cformat!(
        "<red,bold>Errors</>: {}, <yellow,bold>Warnings</>: {}",
        map.errors(),
        map.warnings()
    );
    summarize(map, level, |note| vec![note.cformat()], footer)
}

fn counts(map: &MemoryMap) -> String {
    format!("Errors: {}, Warnings: {}", map.errors(), map.warnings())
}

fn summarize(
    map: &MemoryMap,
    level: Option<Severity>,
    lines: impl Fn(&Note) -> Vec<String>,
    footer: String,
) -> String {
    let level = level.unwrap_or(Severity::Warning);
    let mut output = Vec::new();
    let mut last: Option<Severity> = None;
    for note in map.notes.sorted() {
        if !note.severity.within(level) {
            continue;
        }
        if last.is_some_and(|s| s != note.severity) {
            output.push(String::new());
        }
        last = Some(note.severity);
        output.extend(lines(note));
    }
    if last.is_some() {
        output.push(String::new());
    }
    output.push(footer);
    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    fn build(code: &str) -> MemoryMap {
        compile(code, &InstructionSet::onebpc())
    }

    #[test]
    fn plain_listing() {
        let map = build("load %1\nhalt");
        assert_eq!(render(&map, &ReportOptions::default()), "0000010001\n0000000000");
    }

    #[test]
    fn hashtags_and_addresses() {
        let map = build("load %1");
        let opts = ReportOptions {
            hashtags: true,
            address_numbers: true,
            ..Default::default()
        };
        assert_eq!(render(&map, &opts), "0000:  -----#---#");
    }

    #[test]
    fn inline_labels_and_src() {
        let map = build("top: load 3\njump :top");
        let opts = ReportOptions {
            show_labels: true,
            token_src: true,
            ..Default::default()
        };
        let listing = render(&map, &opts);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "0000010011  top: load 3");
        assert_eq!(lines[1], "0000000001  jump");
        assert_eq!(lines[2], "0000000000  :top");
    }

    #[test]
    fn inline_notes_filtered() {
        let map = build("jump :nowhere");
        let opts = ReportOptions {
            note_level: Some(Severity::Error),
            ..Default::default()
        };
        let listing = render(&map, &opts);
        assert_eq!(
            listing,
            "0000000001\n0000000000  [ERROR line 1: Undefined label `nowhere`.]"
        );
    }

    #[test]
    fn spread_layout() {
        let map = build("// head\nstart: halt\n\n// gap\nfrobnicate");
        let opts = ReportOptions {
            show_labels: true,
            note_level: Some(Severity::Info),
            spread_notes: true,
            ..Default::default()
        };
        let listing = render(&map, &opts);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "            COMMENT line 1: head",
                "start:",
                "0000000000  COMMENT line 4: gap",
                "0000000000  ERROR line 5: Unknown instruction `frobnicate`.",
            ]
        );
    }

    #[test]
    fn wrap() {
        assert_eq!(word_wrap("aa bb cc", 5, 2), "aa bb\n  cc");
        assert_eq!(word_wrap("short", 40, 4), "short");
        assert_eq!(word_wrap("averyveryverylongword x", 5, 1), "averyveryverylongword\n x");
        assert_eq!(word_wrap("", 10, 4), "");
    }

    #[test]
    fn summary_groups_and_counts() {
        let map = build("frobnicate\nhalt\nload 1\nnope");
        let text = summary(&map, None);
        assert_eq!(
            text,
            "Address 0000, Line 1, ERROR: Unknown instruction `frobnicate`.\n\
             Address 0003, Line 4, ERROR: Unknown instruction `nope`.\n\
             \n\
             Address 0002, Line 3, WARNING: Unreachable code: nothing jumps here. Add a label to make it a jump target.\n\
             \n\
             Errors: 2, Warnings: 1"
        );
        let errors_only = summary(&map, Some(Severity::Error));
        assert!(errors_only.ends_with("\n\nErrors: 2, Warnings: 1"));
        assert!(!errors_only.contains("WARNING"));
    }

    #[test]
    fn dump_lines() {
        let map = build("top: load 1\nhalt");
        let text = dump(&map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("0000010001"));
        assert!(lines[0].contains("top:"));
        assert!(lines[1].contains("halt"));
    }

    #[test]
    fn table_lists_every_instruction() {
        let set = InstructionSet::onebpc();
        let table = instruction_table(&set);
        assert_eq!(table.lines().count(), set.len());
        assert!(table.contains("jump_if_carry_0 jc0"));
        let row = table.lines().find(|l| l.contains("jc0")).unwrap();
        assert!(row.contains("c_0, c0") || row.contains("c0, c_0"), "{}", row);
        let halt = table.lines().find(|l| l.contains("halt")).unwrap();
        assert!(!halt.contains("while"));
    }

    #[test]
    fn summary_without_notes() {
        let map = build("");
        assert_eq!(summary(&map, None), "Errors: 0, Warnings: 0");
    }
}
