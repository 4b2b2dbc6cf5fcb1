//! Axiom data model
//!
//!     An axiom is the whole state of the system at one point in time: an ordered list of
//!     symbol occurrences, each carrying its numeric parameters. Parts are immutable once
//!     produced, a rewrite replaces them wholesale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One symbol occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxiomPart {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl AxiomPart {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(symbol: impl Into<String>, params: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            params,
        }
    }

    pub fn is_parametric(&self) -> bool {
        !self.params.is_empty()
    }
}

impl fmt::Display for AxiomPart {
    /// Renders the part in phrase syntax, e.g. `F(1,2.5)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if self.is_parametric() {
            let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", params.join(","))?;
        }
        Ok(())
    }
}

pub type Axiom = Vec<AxiomPart>;

/// Anything that can be normalized into an axiom
///
/// Phrases are tokenized, structural axioms and single parts are taken as they are (after
/// checking their symbols against the alphabets).
#[derive(Debug, Clone, PartialEq)]
pub enum AxiomSource {
    Phrase(String),
    Axiom(Axiom),
    Part(AxiomPart),
}

impl From<&str> for AxiomSource {
    fn from(phrase: &str) -> Self {
        AxiomSource::Phrase(phrase.to_string())
    }
}

impl From<String> for AxiomSource {
    fn from(phrase: String) -> Self {
        AxiomSource::Phrase(phrase)
    }
}

impl From<Axiom> for AxiomSource {
    fn from(axiom: Axiom) -> Self {
        AxiomSource::Axiom(axiom)
    }
}

impl From<AxiomPart> for AxiomSource {
    fn from(part: AxiomPart) -> Self {
        AxiomSource::Part(part)
    }
}

/// Concatenation of the symbols, parameters dropped
pub fn axiom_to_string(axiom: &[AxiomPart]) -> String {
    axiom.iter().map(|part| part.symbol.as_str()).collect()
}
