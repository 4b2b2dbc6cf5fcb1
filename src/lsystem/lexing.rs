//! Tokenizer and normalizer
//!
//! This module turns phrases into axioms. It is used to seed the initial axiom, to
//! materialize textual successors during rewriting, and (in symbol-only mode) to read context
//! patterns.
//!
//! Scanning:
//!     Whitespace is stripped first. Characters are then accumulated into a candidate symbol
//!     until the candidate is a member of the active or ignored alphabet, at which point one
//!     part is emitted and the candidate resets. When the character right after the candidate
//!     is the parametric open marker, everything up to the balanced close marker is taken as
//!     the candidate's parameter list.
//!
//! Parameters:
//!     The parameter list is split on top-level commas and every item is evaluated by the
//!     [expression](crate::lsystem::expression) evaluator against the supplied defines.
//!
//! Failures:
//!     Unbalanced markers, trailing characters that never form a symbol, and parameters that
//!     do not evaluate to a finite number are all reported. Nothing is truncated silently.

use crate::lsystem::axiom::{Axiom, AxiomPart, AxiomSource};
use crate::lsystem::defines::DefineLookup;
use crate::lsystem::error::TokenizeError;
use crate::lsystem::expression::evaluate;
use crate::lsystem::symbols::{SymbolSet, PARAMETRIC_CLOSE, PARAMETRIC_OPEN};

/// A symbol found by the scanner, parameters still unevaluated
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedSymbol {
    pub symbol: String,
    /// Text between the parametric markers, `None` for a non-parametric occurrence
    pub raw_params: Option<String>,
}

/// Scan a phrase into symbols without evaluating parameters
pub fn scan(phrase: &str, symbols: SymbolSet<'_>) -> Result<Vec<ScannedSymbol>, TokenizeError> {
    let chars: Vec<char> = phrase.chars().filter(|c| !c.is_whitespace()).collect();
    let compact: String = chars.iter().collect();
    let mut scanned = Vec::new();
    let mut candidate = String::new();

    let mut index = 0;
    while index < chars.len() {
        let current = chars[index];
        if candidate.is_empty() && (current == PARAMETRIC_OPEN || current == PARAMETRIC_CLOSE) {
            // A marker can only follow a symbol
            return Err(TokenizeError::UnbalancedParams {
                phrase: compact,
                position: index,
            });
        }
        candidate.push(current);

        let mut raw_params = None;
        if chars.get(index + 1) == Some(&PARAMETRIC_OPEN) {
            let close = find_group_close(&chars, index + 1).ok_or_else(|| {
                TokenizeError::UnbalancedParams {
                    phrase: compact.clone(),
                    position: index + 1,
                }
            })?;
            raw_params = Some(chars[index + 2..close].iter().collect::<String>());
            index = close;
        }

        if symbols.contains(&candidate) {
            scanned.push(ScannedSymbol {
                symbol: std::mem::take(&mut candidate),
                raw_params,
            });
        } else if raw_params.is_some() {
            return Err(TokenizeError::UnknownSymbol {
                phrase: compact,
                candidate,
            });
        }

        index += 1;
    }

    if !candidate.is_empty() {
        return Err(TokenizeError::UnknownSymbol {
            phrase: compact,
            candidate,
        });
    }

    Ok(scanned)
}

/// Index of the marker closing the group opened at `open`
fn find_group_close(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in chars[open..].iter().enumerate() {
        if *c == PARAMETRIC_OPEN {
            depth += 1;
        } else if *c == PARAMETRIC_CLOSE {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// Split a parameter list on commas that are not nested inside parentheses
fn split_params(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, c) in raw.char_indices() {
        match c {
            PARAMETRIC_OPEN => depth += 1,
            PARAMETRIC_CLOSE => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&raw[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    items.push(&raw[start..]);
    items
}

fn evaluate_params<D: DefineLookup + ?Sized>(
    symbol: &str,
    raw: &str,
    defines: &D,
) -> Result<Vec<f64>, TokenizeError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    split_params(raw)
        .into_iter()
        .map(|item| {
            evaluate(item, defines).map_err(|source| TokenizeError::Parameter {
                symbol: symbol.to_string(),
                raw: item.to_string(),
                source,
            })
        })
        .collect()
}

/// Tokenize a phrase into an axiom
pub fn tokenize<D: DefineLookup + ?Sized>(
    phrase: &str,
    symbols: SymbolSet<'_>,
    defines: &D,
) -> Result<Axiom, TokenizeError> {
    scan(phrase, symbols)?
        .into_iter()
        .map(|scanned| {
            let params = match &scanned.raw_params {
                Some(raw) => evaluate_params(&scanned.symbol, raw, defines)?,
                None => Vec::new(),
            };
            Ok(AxiomPart::with_params(scanned.symbol, params))
        })
        .collect()
}

/// Symbols of a phrase, parameters ignored. Used for context patterns.
pub fn symbols_of(phrase: &str, symbols: SymbolSet<'_>) -> Result<Vec<String>, TokenizeError> {
    Ok(scan(phrase, symbols)?
        .into_iter()
        .map(|scanned| scanned.symbol)
        .collect())
}

/// Normalize any axiom source into an axiom
///
/// Structural axioms and parts pass through, but their symbols must still belong to one of
/// the alphabets.
pub fn normalize<D: DefineLookup + ?Sized>(
    source: AxiomSource,
    symbols: SymbolSet<'_>,
    defines: &D,
) -> Result<Axiom, TokenizeError> {
    let axiom = match source {
        AxiomSource::Phrase(phrase) => return tokenize(&phrase, symbols, defines),
        AxiomSource::Axiom(axiom) => axiom,
        AxiomSource::Part(part) => vec![part],
    };
    ensure_known(
        axiom.iter().map(|part| part.symbol.as_str()),
        || crate::lsystem::axiom::axiom_to_string(&axiom),
        symbols,
    )?;
    Ok(axiom)
}

/// Fail on the first symbol that belongs to neither alphabet. `phrase` renders the
/// offending input for the error.
pub fn ensure_known<'s>(
    mut listed: impl Iterator<Item = &'s str>,
    phrase: impl FnOnce() -> String,
    symbols: SymbolSet<'_>,
) -> Result<(), TokenizeError> {
    match listed.find(|symbol| !symbols.contains(symbol)) {
        Some(unknown) => Err(TokenizeError::UnknownSymbol {
            phrase: phrase(),
            candidate: unknown.to_string(),
        }),
        None => Ok(()),
    }
}
