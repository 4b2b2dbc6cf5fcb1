//! Plain text formats

use super::registry::AxiomFormatter;
use crate::lsystem::axiom::{axiom_to_string, AxiomPart};
use crate::lsystem::error::FormatError;

pub struct SymbolsFormatter;

impl AxiomFormatter for SymbolsFormatter {
    fn name(&self) -> &str {
        "symbols"
    }

    fn serialize(&self, axiom: &[AxiomPart]) -> Result<String, FormatError> {
        Ok(axiom_to_string(axiom))
    }

    fn description(&self) -> &str {
        "Concatenated symbols, parameters dropped"
    }
}

/// Renders parts in phrase syntax, so the output can be tokenized again
pub struct ParametricFormatter;

impl AxiomFormatter for ParametricFormatter {
    fn name(&self) -> &str {
        "parametric"
    }

    fn serialize(&self, axiom: &[AxiomPart]) -> Result<String, FormatError> {
        Ok(axiom.iter().map(|part| part.to_string()).collect())
    }

    fn description(&self) -> &str {
        "Symbols with their parameters"
    }
}
