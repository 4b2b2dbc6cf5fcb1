//! Error taxonomy for the rewriting engine
//!
//!     Errors are split by the stage that raises them. Configuration errors (alphabets,
//!     production registration, malformed axioms, config files) fail fast at setup time.
//!     Rewrite errors are local to a single symbol occurrence: the engine records them as
//!     diagnostics and lets the occurrence pass through unchanged, so one broken production
//!     never aborts a whole iteration.
//!
//!     A production that simply does not apply is not an error, see
//!     [Resolution::NoMatch](crate::lsystem::resolver::Resolution::NoMatch).

use thiserror::Error;

/// Problems with the active or ignored alphabet
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlphabetError {
    #[error("alphabet must contain at least one symbol")]
    Empty,
    #[error("alphabet contains an empty symbol")]
    EmptySymbol,
    #[error("symbol '{0}' contains whitespace or parametric markers")]
    InvalidSymbol(String),
    #[error("symbol '{0}' is declared more than once")]
    Duplicate(String),
    #[error("symbol '{0}' is both an active and an ignored symbol")]
    Overlap(String),
}

/// Failures while evaluating an arithmetic parameter expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character at {position} in '{input}'")]
    Lexical { input: String, position: usize },
    #[error("invalid expression '{input}': {message}")]
    Syntax { input: String, message: String },
    #[error("unknown define '{0}'")]
    UnknownDefine(String),
    #[error("expression '{0}' does not evaluate to a finite number")]
    NonFinite(String),
}

/// Rejected define table entries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefineError {
    #[error("define name '{0}' is not an identifier")]
    InvalidName(String),
}

/// Failures while turning a phrase into an axiom
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unbalanced parametric group starting at {position} in '{phrase}'")]
    UnbalancedParams { phrase: String, position: usize },
    #[error("'{candidate}' in '{phrase}' is not a known symbol")]
    UnknownSymbol { phrase: String, candidate: String },
    #[error("parameter '{raw}' of '{symbol}': {source}")]
    Parameter {
        symbol: String,
        raw: String,
        #[source]
        source: ExpressionError,
    },
}

/// Registration-time problems with a production
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductionError {
    #[error("malformed production key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },
    #[error("production symbol '{0}' is not part of the active alphabet")]
    NotInAlphabet(String),
    #[error("stochastic production for '{0}' has no alternatives")]
    EmptyStochastic(String),
    #[error("stochastic production for '{symbol}' has invalid weight {weight}")]
    InvalidWeight { symbol: String, weight: f64 },
    #[error("stochastic production for '{symbol}' has non-positive total weight {total}")]
    NonPositiveTotal { symbol: String, total: f64 },
    #[error("invalid context for '{symbol}': {source}")]
    Context {
        symbol: String,
        #[source]
        source: TokenizeError,
    },
    #[error("invalid successor for '{symbol}': {source}")]
    Successor {
        symbol: String,
        #[source]
        source: TokenizeError,
    },
}

/// Failures of the seeded weighted sampler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("cannot sample from an empty weight list")]
    Empty,
    #[error("weight {0} is negative or not finite")]
    InvalidWeight(f64),
    #[error("weights sum to a non-positive total")]
    NonPositiveTotal,
    #[error("sampler picked index {index} out of {len} alternatives")]
    OutOfRange { index: usize, len: usize },
}

/// Occurrence-local failures raised while rewriting one symbol
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("'{symbol}' declares {expected} parameter(s) but the occurrence carries {found}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Sample(#[from] SampleError),
}

/// Problems loading a declarative configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
    #[error("invalid YAML: {0}")]
    Yaml(String),
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("unsupported configuration format for '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("iterations must be a non-negative finite number, got {0}")]
    InvalidIterations(f64),
    #[error("production '{0}' needs exactly one of `successor` or `stochastic`")]
    AmbiguousProduction(String),
}

/// Failures of the axiom serializers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Crate-level error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LSystemError {
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
    #[error(transparent)]
    Define(#[from] DefineError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Production(#[from] ProductionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
}
