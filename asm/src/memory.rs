use crate::encoder::encode;
use crate::mapper::map;
use crate::note::{Notes, Severity};
use crate::token::Token;
use arch::InstructionSet;
use indexmap::IndexMap;

/// Result of one compilation. Always complete, even when every line failed.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    /// Tokens that produced each word
    pub tokens: Vec<Vec<Token>>,
    /// Encoded words, same length as `tokens`
    pub binary: Vec<String>,
    pub labels: IndexMap<String, usize>,
    pub notes: Notes,
}

impl MemoryMap {
    /// Lays out and encodes a macro-expanded, normalized token stream.
    pub fn build(tokens: Vec<Token>, set: &InstructionSet) -> Self {
        let mut notes = Notes::new();
        let layout = map(tokens, set, &mut notes);
        let binary = encode(&layout.words, &layout.labels, set, &mut notes);
        MemoryMap {
            tokens: layout.words,
            binary,
            labels: layout.labels,
            notes,
        }
    }

    pub fn len(&self) -> usize {
        self.binary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binary.is_empty()
    }

    /// Labels pointing at `address`, in definition order.
    pub fn labels_at(&self, address: usize) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, addr)| **addr == address)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.notes.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.notes.count(Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    #[test]
    fn build_keeps_lengths_aligned() {
        let tokens = Lexer::new("a: b: load %1\nadd %11\nc: jump :a").parse();
        let map = MemoryMap::build(tokens, &InstructionSet::onebpc());
        assert_eq!(map.len(), 4);
        assert_eq!(map.tokens.len(), map.binary.len());
        assert_eq!(map.labels_at(0), vec!["a", "b"]);
        assert_eq!(map.labels_at(2), vec!["c"]);
        assert!(map.labels_at(3).is_empty());
        assert_eq!(map.binary[3], "0000000000");
        assert_eq!(map.errors(), 0);
    }
}
