//! Productions and their registration
//!
//!     A production is a rewrite rule bound to one symbol. Its successor is one of four kinds
//!     (see [Successor]): a phrase, a prebuilt axiom, a callback computing the result, or a
//!     weighted set of alternatives. It can additionally be gated by a context (neighboring
//!     symbols) and a condition (arbitrary predicate).
//!
//! Keys
//!
//!     Productions are registered under a key written in classic syntax. The key carries the
//!     symbol and may also carry the context and the declared parameter names:
//!
//!         A               plain symbol
//!         F(len,w)        parametric symbol, declares `len` and `w`
//!         B<A>C           context: preceded by B, followed by C
//!         B<A  /  A>C     one sided contexts
//!
//!     Keys are decomposed once, at registration, by [ProductionKey::parse]. Everything that can
//!     be checked without an axiom (symbol membership, context patterns, successor phrases,
//!     stochastic weights) is checked then, so a malformed production fails fast.

use crate::lsystem::axiom::{axiom_to_string, Axiom, AxiomPart};
use crate::lsystem::defines::is_identifier;
use crate::lsystem::error::{ProductionError, TokenizeError};
use crate::lsystem::lexing::{ensure_known, scan, symbols_of};
use crate::lsystem::resolver::Resolution;
use crate::lsystem::symbols::SymbolSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

static BEFORE_CONTEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)<(.+)$").unwrap());
static AFTER_CONTEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)>(.+)$").unwrap());
static PARAMETRIC_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^()]+)\(([^()]*)\)$").unwrap());

/// What conditions and dynamic successors get to look at
#[derive(Debug, Clone, Copy)]
pub struct RuleArgs<'a> {
    /// The axiom as it was before the current iteration started
    pub axiom: &'a [AxiomPart],
    pub index: usize,
    pub part: &'a AxiomPart,
    pub params: &'a [f64],
}

pub type Condition = Arc<dyn Fn(&RuleArgs<'_>) -> bool + Send + Sync>;
pub type SuccessorFn = Arc<dyn Fn(&RuleArgs<'_>) -> Resolution + Send + Sync>;

/// The replacement a production yields when it fires
#[derive(Clone)]
pub enum Successor {
    /// Tokenized at rewrite time, with declared parameters bound as defines
    Phrase(String),
    /// Used verbatim
    Axiom(Axiom),
    /// Computed at rewrite time, the callback may itself decline with [Resolution::NoMatch]
    Dynamic(SuccessorFn),
    /// One alternative is picked by seeded weighted sampling
    Stochastic(Vec<WeightedSuccessor>),
}

impl fmt::Debug for Successor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Successor::Phrase(phrase) => f.debug_tuple("Phrase").field(phrase).finish(),
            Successor::Axiom(axiom) => f.debug_tuple("Axiom").field(axiom).finish(),
            Successor::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
            Successor::Stochastic(items) => f.debug_tuple("Stochastic").field(items).finish(),
        }
    }
}

impl From<&str> for Successor {
    fn from(phrase: &str) -> Self {
        Successor::Phrase(phrase.to_string())
    }
}

impl From<String> for Successor {
    fn from(phrase: String) -> Self {
        Successor::Phrase(phrase)
    }
}

impl From<Axiom> for Successor {
    fn from(axiom: Axiom) -> Self {
        Successor::Axiom(axiom)
    }
}

#[derive(Debug, Clone)]
pub struct WeightedSuccessor {
    pub successor: Successor,
    pub weight: f64,
}

impl WeightedSuccessor {
    pub fn new(successor: impl Into<Successor>, weight: f64) -> Self {
        Self {
            successor: successor.into(),
            weight,
        }
    }
}

/// A context side, either a phrase to scan or literal symbols
#[derive(Debug, Clone, PartialEq)]
pub enum ContextPattern {
    Phrase(String),
    Symbols(Vec<String>),
}

impl From<&str> for ContextPattern {
    fn from(phrase: &str) -> Self {
        ContextPattern::Phrase(phrase.to_string())
    }
}

impl From<String> for ContextPattern {
    fn from(phrase: String) -> Self {
        ContextPattern::Phrase(phrase)
    }
}

impl From<Vec<String>> for ContextPattern {
    fn from(symbols: Vec<String>) -> Self {
        ContextPattern::Symbols(symbols)
    }
}

impl From<Vec<&str>> for ContextPattern {
    fn from(symbols: Vec<&str>) -> Self {
        ContextPattern::Symbols(symbols.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub before: Option<ContextPattern>,
    pub after: Option<ContextPattern>,
}

impl Context {
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// A production as supplied by the caller
#[derive(Clone)]
pub struct Production {
    pub successor: Successor,
    pub context: Option<Context>,
    pub condition: Option<Condition>,
    /// Declared parameter names, usually taken from the key
    pub params: Vec<String>,
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("successor", &self.successor)
            .field("context", &self.context)
            .field("condition", &self.condition.as_ref().map(|_| "<fn>"))
            .field("params", &self.params)
            .finish()
    }
}

impl Production {
    pub fn new(successor: impl Into<Successor>) -> Self {
        Self {
            successor: successor.into(),
            context: None,
            condition: None,
            params: Vec::new(),
        }
    }

    /// A production choosing among weighted alternatives
    pub fn stochastic<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<Successor>,
    {
        Self::new(Successor::Stochastic(
            alternatives
                .into_iter()
                .map(|(successor, weight)| WeightedSuccessor::new(successor, weight))
                .collect(),
        ))
    }

    /// A production whose result is computed by a callback
    pub fn dynamic<F>(successor: F) -> Self
    where
        F: Fn(&RuleArgs<'_>) -> Resolution + Send + Sync + 'static,
    {
        Self::new(Successor::Dynamic(Arc::new(successor)))
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn before(mut self, pattern: impl Into<ContextPattern>) -> Self {
        self.context.get_or_insert_with(Context::default).before = Some(pattern.into());
        self
    }

    pub fn after(mut self, pattern: impl Into<ContextPattern>) -> Self {
        self.context.get_or_insert_with(Context::default).after = Some(pattern.into());
        self
    }

    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&RuleArgs<'_>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn with_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = names.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for Production {
    fn from(phrase: &str) -> Self {
        Production::new(phrase)
    }
}

impl From<String> for Production {
    fn from(phrase: String) -> Self {
        Production::new(phrase)
    }
}

impl From<Axiom> for Production {
    fn from(axiom: Axiom) -> Self {
        Production::new(axiom)
    }
}

/// A decomposed classic-syntax key
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionKey {
    pub symbol: String,
    pub context: Context,
    pub params: Vec<String>,
}

impl ProductionKey {
    pub fn parse(key: &str) -> Result<Self, ProductionError> {
        let malformed = |reason: &str| ProductionError::MalformedKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = key.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(malformed("empty key"));
        }

        let mut symbol = compact.as_str();
        let mut context = Context::default();

        if let Some(captures) = BEFORE_CONTEXT.captures(symbol) {
            context.before = Some(ContextPattern::Phrase(captures[1].to_string()));
            symbol = captures.get(2).map_or("", |m| m.as_str());
        }
        if let Some(captures) = AFTER_CONTEXT.captures(symbol) {
            context.after = Some(ContextPattern::Phrase(captures[2].to_string()));
            symbol = captures.get(1).map_or("", |m| m.as_str());
        }
        if symbol.contains('<') || symbol.contains('>') {
            return Err(malformed("misplaced context marker"));
        }

        let mut params = Vec::new();
        if symbol.contains('(') || symbol.contains(')') {
            let captures = PARAMETRIC_KEY
                .captures(symbol)
                .ok_or_else(|| malformed("unbalanced parameter list"))?;
            let names = captures.get(2).map_or("", |m| m.as_str());
            if !names.is_empty() {
                for name in names.split(',') {
                    if !is_identifier(name) {
                        return Err(malformed(&format!("'{}' is not a parameter name", name)));
                    }
                    params.push(name.to_string());
                }
            }
            symbol = captures.get(1).map_or("", |m| m.as_str());
        }

        Ok(Self {
            symbol: symbol.to_string(),
            context,
            params,
        })
    }
}

/// Context patterns resolved to symbol sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledContext {
    pub before: Option<Vec<String>>,
    pub after: Option<Vec<String>>,
}

/// A validated production, ready for the resolver
#[derive(Clone)]
pub struct RegisteredProduction {
    pub successor: Successor,
    pub context: Option<CompiledContext>,
    pub condition: Option<Condition>,
    pub params: Vec<String>,
}

impl fmt::Debug for RegisteredProduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProduction")
            .field("successor", &self.successor)
            .field("context", &self.context)
            .field("condition", &self.condition.as_ref().map(|_| "<fn>"))
            .field("params", &self.params)
            .finish()
    }
}

/// Decompose a key and validate the production against the alphabets
///
/// An explicit context on the production wins over one written in the key. Parameter names
/// from the key win over names set on the production.
pub fn compile_production(
    key: &str,
    production: Production,
    symbols: SymbolSet<'_>,
) -> Result<(String, RegisteredProduction), ProductionError> {
    let parsed = ProductionKey::parse(key)?;
    let symbol = parsed.symbol;

    if !symbols.active.contains(&symbol) {
        return Err(ProductionError::NotInAlphabet(symbol));
    }

    let context = production.context.unwrap_or(parsed.context);
    let context = if context.is_empty() {
        None
    } else {
        let compile_side =
            |side: Option<ContextPattern>| -> Result<Option<Vec<String>>, TokenizeError> {
                match side {
                    None => Ok(None),
                    Some(ContextPattern::Phrase(phrase)) => {
                        symbols_of(&phrase, symbols).map(Some)
                    }
                    Some(ContextPattern::Symbols(list)) => {
                        ensure_known(list.iter().map(String::as_str), || list.concat(), symbols)?;
                        Ok(Some(list))
                    }
                }
            };
        let wrap = |source: TokenizeError| ProductionError::Context {
            symbol: symbol.clone(),
            source,
        };
        Some(CompiledContext {
            before: compile_side(context.before).map_err(wrap)?,
            after: compile_side(context.after).map_err(wrap)?,
        })
    };

    validate_successor(&symbol, &production.successor, symbols)?;

    let params = if parsed.params.is_empty() {
        production.params
    } else {
        parsed.params
    };

    Ok((
        symbol,
        RegisteredProduction {
            successor: production.successor,
            context,
            condition: production.condition,
            params,
        },
    ))
}

fn validate_successor(
    symbol: &str,
    successor: &Successor,
    symbols: SymbolSet<'_>,
) -> Result<(), ProductionError> {
    match successor {
        Successor::Phrase(phrase) => {
            scan(phrase, symbols).map_err(|source| ProductionError::Successor {
                symbol: symbol.to_string(),
                source,
            })?;
        }
        Successor::Axiom(axiom) => {
            ensure_known(
                axiom.iter().map(|part| part.symbol.as_str()),
                || axiom_to_string(axiom),
                symbols,
            )
            .map_err(|source| ProductionError::Successor {
                symbol: symbol.to_string(),
                source,
            })?;
        }
        // Checked when the callback's result is normalized
        Successor::Dynamic(_) => {}
        Successor::Stochastic(items) => {
            if items.is_empty() {
                return Err(ProductionError::EmptyStochastic(symbol.to_string()));
            }
            let mut total = 0.0;
            for item in items {
                if !item.weight.is_finite() || item.weight < 0.0 {
                    return Err(ProductionError::InvalidWeight {
                        symbol: symbol.to_string(),
                        weight: item.weight,
                    });
                }
                total += item.weight;
                validate_successor(symbol, &item.successor, symbols)?;
            }
            if total <= 0.0 {
                return Err(ProductionError::NonPositiveTotal {
                    symbol: symbol.to_string(),
                    total,
                });
            }
        }
    }
    Ok(())
}
