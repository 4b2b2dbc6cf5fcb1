//! Named numeric constants
//!
//!     Defines are substituted into parameter expressions before evaluation. The engine owns
//!     one global table. A single rewrite may bind a production's declared parameter names to
//!     the matched occurrence's values; those bindings live in a [ScopedDefines] overlay that
//!     shadows the global table for that rewrite only and is dropped afterwards.
//!
//!     Expressions refer to defines by identifier, so names that are not identifiers are
//!     refused when they are set.

use crate::lsystem::error::{DefineError, RewriteError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Whether `name` can be written in a parameter expression
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Read access to a define table
pub trait DefineLookup {
    fn lookup(&self, name: &str) -> Option<f64>;
}

/// The engine-wide define table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defines {
    values: BTreeMap<String, f64>,
}

impl Defines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs, failing on the first name that is not an identifier
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, DefineError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut defines = Defines::new();
        for (name, value) in pairs {
            defines.set(name, value)?;
        }
        Ok(defines)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) -> Result<(), DefineError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DefineError::InvalidName(name));
        }
        self.values.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}


impl DefineLookup for Defines {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

/// Global defines shadowed by per-rewrite bindings
#[derive(Debug)]
pub struct ScopedDefines<'a> {
    global: &'a Defines,
    local: HashMap<&'a str, f64>,
}

impl<'a> ScopedDefines<'a> {
    pub fn new(global: &'a Defines) -> Self {
        Self {
            global,
            local: HashMap::new(),
        }
    }

    /// Bind declared parameter names positionally to an occurrence's values
    ///
    /// No names means nothing to bind. Otherwise the counts must agree, a partial bind is
    /// never attempted.
    pub fn bind(
        global: &'a Defines,
        symbol: &str,
        names: &'a [String],
        values: &[f64],
    ) -> Result<Self, RewriteError> {
        let mut scope = Self::new(global);
        if names.is_empty() {
            return Ok(scope);
        }
        if names.len() != values.len() {
            return Err(RewriteError::ArityMismatch {
                symbol: symbol.to_string(),
                expected: names.len(),
                found: values.len(),
            });
        }
        for (name, value) in names.iter().zip(values) {
            scope.local.insert(name.as_str(), *value);
        }
        Ok(scope)
    }
}

impl DefineLookup for ScopedDefines<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.local
            .get(name)
            .copied()
            .or_else(|| self.global.lookup(name))
    }
}
