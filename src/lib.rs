//! # lsystem
//!
//! A parametric, context-sensitive and stochastic L-system engine.
//!
//! ```text
//! let mut system = LSystem::builder()
//!     .alphabet(["A", "B"])
//!     .axiom("A")
//!     .production("A", "AB")
//!     .production("B", "A")
//!     .build()?;
//! system.iterate_n(4);
//! assert_eq!(system.axiom_string(), "ABAABABA");
//! ```
//!
//! See [lsystem::engine] for the rewrite semantics and [lsystem::config] for file based
//! definitions.

pub mod lsystem;

pub use lsystem::axiom::{axiom_to_string, Axiom, AxiomPart, AxiomSource};
pub use lsystem::config::LSystemConfig;
pub use lsystem::defines::Defines;
pub use lsystem::engine::{Command, CommandArgs, LSystem, LSystemBuilder, RewriteDiagnostic};
pub use lsystem::error::{
    AlphabetError, ConfigError, DefineError, ExpressionError, FormatError, LSystemError, ProductionError,
    RewriteError, SampleError, TokenizeError,
};
pub use lsystem::formats::{AxiomFormatter, FormatRegistry};
pub use lsystem::production::{Context, ContextPattern, Production, RuleArgs, Successor};
pub use lsystem::resolver::Resolution;
pub use lsystem::sampler::{Sampler, SeededSampler};
pub use lsystem::symbols::Alphabet;
