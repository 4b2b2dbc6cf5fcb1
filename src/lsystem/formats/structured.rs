//! Structured data formats
//!
//! Both emit the axiom as a list of `{symbol, params}` records, `params` omitted when empty.

use super::registry::AxiomFormatter;
use crate::lsystem::axiom::AxiomPart;
use crate::lsystem::error::FormatError;

pub struct JsonFormatter;

impl AxiomFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, axiom: &[AxiomPart]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(axiom).map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "JSON list of parts"
    }
}

pub struct YamlFormatter;

impl AxiomFormatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, axiom: &[AxiomPart]) -> Result<String, FormatError> {
        serde_yaml::to_string(axiom).map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML list of parts"
    }
}
