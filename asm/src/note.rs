use color_print::cformat;
use num_enum::IntoPrimitive;
use strum::{Display, EnumString};

/// Diagnostic severity. Lower is more severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, IntoPrimitive,
)]
#[repr(u8)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Comment = 3,
    Info = 4,
}

impl Severity {
    /// At least as severe as `threshold`.
    pub fn within(self, threshold: Severity) -> bool {
        u8::from(self) <= u8::from(threshold)
    }

    pub fn cformat(self) -> String {
        match self {
            Severity::Error => cformat!("<red,bold>error</>"),
            Severity::Warning => cformat!("<yellow,bold>warning</>"),
            Severity::Comment => cformat!("<blue,bold>comment</>"),
            Severity::Info => cformat!("<green,bold>info</>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub address: usize,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl Note {
    pub fn cformat(&self) -> String {
        cformat!(
            "{}: {}\n  <blue>--></> address <bold>{:04}</>, line <bold>{}</>",
            self.severity.cformat(),
            self.message,
            self.address,
            self.line
        )
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Address {:04}, Line {}, {}: {}",
            self.address, self.line, self.severity, self.message
        )
    }
}

/// Diagnostics in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct Notes(Vec<Note>);

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        address: usize,
        line: usize,
        severity: Severity,
        message: impl Into<String>,
    ) {
        let note = Note {
            address,
            line,
            severity,
            message: message.into(),
        };
        tracing::trace!(%note, "note");
        self.0.push(note);
    }

    pub fn error(&mut self, address: usize, line: usize, message: impl Into<String>) {
        self.push(address, line, Severity::Error, message);
    }

    pub fn warn(&mut self, address: usize, line: usize, message: impl Into<String>) {
        self.push(address, line, Severity::Warning, message);
    }

    pub fn comment(&mut self, address: usize, line: usize, message: impl Into<String>) {
        self.push(address, line, Severity::Comment, message);
    }

    pub fn info(&mut self, address: usize, line: usize, message: impl Into<String>) {
        self.push(address, line, Severity::Info, message);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Notes at least as severe as `threshold`, in raised order.
    pub fn filter(&self, threshold: Severity) -> impl Iterator<Item = &Note> {
        self.0.iter().filter(move |n| n.severity.within(threshold))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.0.iter().filter(|n| n.severity == severity).count()
    }

    /// Ordered by severity, then address. Stable within ties.
    pub fn sorted(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.0.iter().collect();
        notes.sort_by_key(|n| (n.severity, n.address));
        notes
    }
}

impl<'a> IntoIterator for &'a Notes {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
