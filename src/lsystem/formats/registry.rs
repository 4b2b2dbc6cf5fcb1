//! Named axiom serializers
//!
//!     A [FormatRegistry] maps format names to [AxiomFormatter]s. [FormatRegistry::builtin]
//!     carries the formats shipped with the crate, and callers can add their own or shadow a
//!     built-in by registering under the same name. Names are kept ordered so listings are
//!     stable.

use crate::lsystem::axiom::AxiomPart;
use crate::lsystem::error::FormatError;
use std::collections::BTreeMap;

pub trait AxiomFormatter: Send + Sync {
    /// Lookup key, e.g. `symbols`
    fn name(&self) -> &str;

    /// One line for format listings
    fn description(&self) -> &str {
        ""
    }

    fn serialize(&self, axiom: &[AxiomPart]) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    by_name: BTreeMap<String, Box<dyn AxiomFormatter>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }

    /// `symbols`, `parametric`, `json` and `yaml`
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(super::SymbolsFormatter);
        registry.register(super::ParametricFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }

    /// Add a formatter. Returns the one it shadows, if any.
    pub fn register(
        &mut self,
        formatter: impl AxiomFormatter + 'static,
    ) -> Option<Box<dyn AxiomFormatter>> {
        let name = formatter.name().to_string();
        self.by_name.insert(name, Box::new(formatter))
    }

    pub fn get(&self, name: &str) -> Option<&dyn AxiomFormatter> {
        self.by_name.get(name).map(|formatter| formatter.as_ref())
    }

    /// Formatters ordered by name
    pub fn formats(&self) -> impl Iterator<Item = &dyn AxiomFormatter> {
        self.by_name.values().map(|formatter| formatter.as_ref())
    }

    pub fn serialize(&self, format: &str, axiom: &[AxiomPart]) -> Result<String, FormatError> {
        match self.get(format) {
            Some(formatter) => formatter.serialize(axiom),
            None => Err(FormatError::NotFound(format.to_string())),
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
