//! Production resolution
//!
//!     Given one symbol occurrence and the productions registered for its symbol, decide what
//!     the occurrence becomes. The checks run in a fixed order for every production:
//!
//!         1. condition, when declared, must hold
//!         2. context, when declared, must match on every declared side
//!         3. the successor is evaluated by kind:
//!            stochastic  pick an alternative by seeded sampling, then resolve it
//!            phrase      tokenize with the declared parameters bound over the defines
//!            dynamic     call back, the result is used as returned
//!            axiom       use as is
//!
//!     A failed gate yields [Resolution::NoMatch]. With several productions for one symbol
//!     they are tried in registration order and the first that does not decline wins. When
//!     all decline, the caller keeps the original occurrence.
//!
//!     All reads go to the axiom as it was before the iteration started, never to the axiom
//!     under construction.

use crate::lsystem::axiom::{Axiom, AxiomPart, AxiomSource};
use crate::lsystem::context::{matches_context, Direction};
use crate::lsystem::defines::{Defines, ScopedDefines};
use crate::lsystem::error::{RewriteError, SampleError};
use crate::lsystem::lexing::tokenize;
use crate::lsystem::production::{CompiledContext, RegisteredProduction, RuleArgs, Successor};
use crate::lsystem::sampler::{occurrence_seed, Sampler};
use crate::lsystem::symbols::SymbolSet;
use tracing::trace;

/// Outcome of resolving one occurrence
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The production does not apply, fall back to the original occurrence
    NoMatch,
    Replace(AxiomSource),
}

impl Resolution {
    pub fn phrase(phrase: impl Into<String>) -> Self {
        Resolution::Replace(AxiomSource::Phrase(phrase.into()))
    }

    pub fn axiom(axiom: Axiom) -> Self {
        Resolution::Replace(AxiomSource::Axiom(axiom))
    }

    pub fn part(part: AxiomPart) -> Self {
        Resolution::Replace(AxiomSource::Part(part))
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Resolution::NoMatch)
    }
}

/// Resolves occurrences against one snapshot of the axiom
pub struct Resolver<'a> {
    pub axiom: &'a [AxiomPart],
    pub symbols: SymbolSet<'a>,
    pub defines: &'a Defines,
    pub sampler: &'a dyn Sampler,
}

impl<'a> Resolver<'a> {
    /// Try the productions in order, the first one that applies wins
    pub fn resolve_all(
        &self,
        productions: &[RegisteredProduction],
        part: &AxiomPart,
        index: usize,
    ) -> Result<Resolution, RewriteError> {
        for production in productions {
            let resolution = self.resolve(production, part, index)?;
            if !resolution.is_no_match() {
                return Ok(resolution);
            }
        }
        Ok(Resolution::NoMatch)
    }

    pub fn resolve(
        &self,
        production: &RegisteredProduction,
        part: &AxiomPart,
        index: usize,
    ) -> Result<Resolution, RewriteError> {
        let args = RuleArgs {
            axiom: self.axiom,
            index,
            part,
            params: &part.params,
        };

        if let Some(condition) = &production.condition {
            if !condition(&args) {
                trace!(symbol = %part.symbol, index, "condition declined");
                return Ok(Resolution::NoMatch);
            }
        }

        if let Some(context) = &production.context {
            if !self.context_holds(context, index) {
                trace!(symbol = %part.symbol, index, "context declined");
                return Ok(Resolution::NoMatch);
            }
        }

        self.resolve_successor(&production.successor, &production.params, &args)
    }

    fn context_holds(&self, context: &CompiledContext, index: usize) -> bool {
        let side = |pattern: &Option<Vec<String>>, direction| match pattern {
            Some(pattern) => {
                matches_context(self.axiom, index, pattern, direction, self.symbols.ignored)
            }
            None => true,
        };
        side(&context.before, Direction::Before) && side(&context.after, Direction::After)
    }

    fn resolve_successor(
        &self,
        successor: &Successor,
        param_names: &[String],
        args: &RuleArgs<'_>,
    ) -> Result<Resolution, RewriteError> {
        let part = args.part;
        match successor {
            Successor::Stochastic(items) => {
                let weights: Vec<f64> = items.iter().map(|item| item.weight).collect();
                let seed = occurrence_seed(&part.symbol, args.index);
                let chosen = self.sampler.sample(&seed, &weights)?;
                let item = items.get(chosen).ok_or(SampleError::OutOfRange {
                    index: chosen,
                    len: items.len(),
                })?;
                trace!(symbol = %part.symbol, index = args.index, chosen, "stochastic pick");
                self.resolve_successor(&item.successor, param_names, args)
            }
            Successor::Phrase(phrase) => {
                let scope =
                    ScopedDefines::bind(self.defines, &part.symbol, param_names, &part.params)?;
                let axiom = tokenize(phrase, self.symbols, &scope)?;
                Ok(Resolution::axiom(axiom))
            }
            Successor::Dynamic(callback) => Ok(callback(args)),
            Successor::Axiom(axiom) => Ok(Resolution::axiom(axiom.clone())),
        }
    }
}
