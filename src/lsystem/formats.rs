//! Output formats for axioms
//!
//! - symbols: concatenated symbols, parameters dropped
//! - parametric: phrase syntax with parameters, e.g. `F(1,5)+B`
//! - json / yaml: the list of parts as structured data

pub mod registry;
pub mod structured;
pub mod text;

pub use registry::{AxiomFormatter, FormatRegistry};
pub use structured::{JsonFormatter, YamlFormatter};
pub use text::{ParametricFormatter, SymbolsFormatter};
