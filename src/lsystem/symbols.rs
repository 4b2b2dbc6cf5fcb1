//! Symbol tables and alphabets
//!
//!     An L-system works over two alphabets. The active alphabet holds the symbols productions
//!     can rewrite. The ignored alphabet holds turtle punctuation (turns, branch and polygon
//!     markers) that the tokenizer still recognizes and that context matching treats as
//!     transparent, but that can never own a production.
//!
//!     Symbols are strings rather than chars: a symbol may be several characters long, the
//!     tokenizer grows a candidate until it matches a member of either alphabet.

use crate::lsystem::error::AlphabetError;
use std::collections::HashSet;

/// Branch open/close markers
pub const BRANCH_SYMBOLS: [&str; 2] = ["[", "]"];

/// Parametric group open/close markers
pub const PARAMETRIC_SYMBOLS: [&str; 2] = ["(", ")"];

pub const PARAMETRIC_OPEN: char = '(';
pub const PARAMETRIC_CLOSE: char = ')';

/// Default active alphabet, the uppercase latin letters
pub const DEFAULT_SYMBOLS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Default ignored alphabet: orientation, branch, polygon and parametric markers
pub const IGNORED_SYMBOLS: [&str; 15] = [
    "+", "-", "&", "^", "/", "|", "\\", "!", ".", "{", "}", "[", "]", "(", ")",
];

/// An ordered, duplicate-free set of symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<String>,
    lookup: HashSet<String>,
}

impl Alphabet {
    /// Build an active alphabet
    ///
    /// Active symbols cannot be empty, contain whitespace, or contain the parametric markers
    /// (the tokenizer would never be able to produce them).
    pub fn new<I, S>(symbols: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alphabet = Self::collect(symbols, true)?;
        if alphabet.symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }
        Ok(alphabet)
    }

    /// Build an ignored alphabet. It may be empty and may contain the parametric markers.
    pub fn ignored<I, S>(symbols: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::collect(symbols, false)
    }

    /// The uppercase latin letters
    pub fn default_symbols() -> Self {
        Self::from_static(&DEFAULT_SYMBOLS)
    }

    /// The standard ignored punctuation
    pub fn default_ignored() -> Self {
        Self::from_static(&IGNORED_SYMBOLS)
    }

    fn from_static(symbols: &[&str]) -> Self {
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            lookup: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn collect<I, S>(symbols: I, active: bool) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if symbol.is_empty() {
                return Err(AlphabetError::EmptySymbol);
            }
            let has_markers = symbol.contains(PARAMETRIC_OPEN) || symbol.contains(PARAMETRIC_CLOSE);
            let has_whitespace = symbol.chars().any(char::is_whitespace);
            // The bare markers are legal ignored symbols, anything else mixing them is not
            let bare_marker = !active && PARAMETRIC_SYMBOLS.contains(&symbol.as_str());
            if has_whitespace || (has_markers && !bare_marker) {
                return Err(AlphabetError::InvalidSymbol(symbol));
            }
            if !lookup.insert(symbol.clone()) {
                return Err(AlphabetError::Duplicate(symbol));
            }
            ordered.push(symbol);
        }
        Ok(Self {
            symbols: ordered,
            lookup,
        })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Fails if any symbol is present in both alphabets
    pub fn ensure_disjoint(&self, other: &Alphabet) -> Result<(), AlphabetError> {
        match self.iter().find(|symbol| other.contains(symbol)) {
            Some(symbol) => Err(AlphabetError::Overlap(symbol.to_string())),
            None => Ok(()),
        }
    }
}

/// The pair of alphabets a phrase is tokenized against
#[derive(Debug, Clone, Copy)]
pub struct SymbolSet<'a> {
    pub active: &'a Alphabet,
    pub ignored: &'a Alphabet,
}

impl<'a> SymbolSet<'a> {
    pub fn new(active: &'a Alphabet, ignored: &'a Alphabet) -> Self {
        Self { active, ignored }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.active.contains(symbol) || self.ignored.contains(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_keeps_order() {
        let alphabet = Alphabet::new(["F", "X", "Y"]).unwrap();
        assert_eq!(alphabet.iter().collect::<Vec<_>>(), vec!["F", "X", "Y"]);
        assert!(alphabet.contains("X"));
        assert!(!alphabet.contains("Z"));
    }

    #[test]
    fn test_alphabet_rejects_empty() {
        let symbols: Vec<String> = vec![];
        assert_eq!(Alphabet::new(symbols), Err(AlphabetError::Empty));
        assert_eq!(Alphabet::new(["A", ""]), Err(AlphabetError::EmptySymbol));
    }

    #[test]
    fn test_alphabet_rejects_duplicates() {
        assert_eq!(
            Alphabet::new(["A", "B", "A"]),
            Err(AlphabetError::Duplicate("A".to_string()))
        );
    }

    #[test]
    fn test_alphabet_rejects_marker_symbols() {
        assert_eq!(
            Alphabet::new(["A(", "B"]),
            Err(AlphabetError::InvalidSymbol("A(".to_string()))
        );
        assert_eq!(
            Alphabet::new(["A B"]),
            Err(AlphabetError::InvalidSymbol("A B".to_string()))
        );
        // Active symbols cannot be the bare markers either
        assert!(Alphabet::new(["("]).is_err());
    }

    #[test]
    fn test_ignored_alphabet_allows_markers_and_empty() {
        let ignored = Alphabet::ignored(["[", "]", "(", ")"]).unwrap();
        assert!(ignored.contains("("));
        let none: Vec<&str> = vec![];
        assert!(Alphabet::ignored(none).unwrap().is_empty());
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(Alphabet::default_symbols().len(), 26);
        let ignored = Alphabet::default_ignored();
        for marker in BRANCH_SYMBOLS.iter().chain(PARAMETRIC_SYMBOLS.iter()) {
            assert!(ignored.contains(marker));
        }
        assert!(Alphabet::default_symbols()
            .ensure_disjoint(&ignored)
            .is_ok());
    }

    #[test]
    fn test_overlap_detected() {
        let active = Alphabet::new(["A", "+"]).unwrap();
        assert_eq!(
            active.ensure_disjoint(&Alphabet::default_ignored()),
            Err(AlphabetError::Overlap("+".to_string()))
        );
    }
}
