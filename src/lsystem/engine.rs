//! Rewrite engine and interpretation driver
//!
//!     [LSystem] owns everything a rewriting system needs: the two alphabets, the current
//!     axiom, the defines, the productions and the commands. It is single threaded and
//!     synchronous, every call runs to completion before the next one observes its state.
//!
//! Rewriting
//!
//!     One pass walks the current axiom by position. Each occurrence is resolved against the
//!     productions registered for its symbol and the result is normalized and appended to the
//!     next axiom. Positions always refer to the axiom as it was when the pass started, so
//!     splicing a long successor never shifts what later occurrences see during that pass.
//!
//!     A failure while rewriting one occurrence does not abort the pass. The occurrence is
//!     copied unchanged, a warning is logged and a [RewriteDiagnostic] is recorded.
//!
//! Interpretation
//!
//!     [LSystem::run] is a plain dispatch loop: for every part whose symbol has a command, the
//!     command is invoked with the part's position and parameters. What the commands do (draw,
//!     measure, collect) is entirely up to the caller.

use crate::lsystem::axiom::{axiom_to_string, Axiom, AxiomPart, AxiomSource};
use crate::lsystem::defines::Defines;
use crate::lsystem::error::{
    DefineError, LSystemError, ProductionError, RewriteError, TokenizeError,
};
use crate::lsystem::formats::FormatRegistry;
use crate::lsystem::lexing::normalize;
use crate::lsystem::production::{compile_production, Production, RegisteredProduction};
use crate::lsystem::resolver::{Resolution, Resolver};
use crate::lsystem::sampler::{Sampler, SeededSampler};
use crate::lsystem::symbols::{Alphabet, SymbolSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a command gets to see of the part it is invoked for
#[derive(Debug, Clone, Copy)]
pub struct CommandArgs<'a> {
    pub index: usize,
    pub part: &'a AxiomPart,
    pub params: &'a [f64],
}

pub type Command = Box<dyn FnMut(&CommandArgs<'_>)>;

/// An occurrence that could not be rewritten and was kept as is
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteDiagnostic {
    /// Zero based pass number within the iterate call
    pub iteration: usize,
    pub index: usize,
    pub symbol: String,
    pub error: RewriteError,
}

pub struct LSystem {
    alphabet: Alphabet,
    ignored: Alphabet,
    axiom: Axiom,
    iterations: usize,
    defines: Defines,
    productions: HashMap<String, Vec<RegisteredProduction>>,
    commands: HashMap<String, Command>,
    sampler: Arc<dyn Sampler>,
    diagnostics: Vec<RewriteDiagnostic>,
}

impl fmt::Debug for LSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&String> = self.commands.keys().collect();
        commands.sort();
        f.debug_struct("LSystem")
            .field("alphabet", &self.alphabet)
            .field("ignored", &self.ignored)
            .field("axiom", &axiom_to_string(&self.axiom))
            .field("iterations", &self.iterations)
            .field("defines", &self.defines)
            .field("productions", &self.productions)
            .field("commands", &commands)
            .finish()
    }
}

impl LSystem {
    /// An engine over `alphabet` with the standard ignored symbols and an empty axiom
    pub fn new<I, S>(alphabet: I) -> Result<Self, LSystemError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().alphabet(alphabet).build()
    }

    pub fn builder() -> LSystemBuilder {
        LSystemBuilder::default()
    }

    fn from_alphabets(alphabet: Alphabet, ignored: Alphabet) -> Self {
        Self {
            alphabet,
            ignored,
            axiom: Vec::new(),
            iterations: 1,
            defines: Defines::new(),
            productions: HashMap::new(),
            commands: HashMap::new(),
            sampler: Arc::new(SeededSampler::new()),
            diagnostics: Vec::new(),
        }
    }

    fn symbols(&self) -> SymbolSet<'_> {
        SymbolSet::new(&self.alphabet, &self.ignored)
    }

    // Accessors

    pub fn axiom(&self) -> &[AxiomPart] {
        &self.axiom
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn ignored_symbols(&self) -> &Alphabet {
        &self.ignored
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn defines(&self) -> &Defines {
        &self.defines
    }

    /// Productions registered for `symbol`, in priority order
    pub fn productions_for(&self, symbol: &str) -> &[RegisteredProduction] {
        self.productions
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Occurrences the last rewrite call could not rewrite
    pub fn diagnostics(&self) -> &[RewriteDiagnostic] {
        &self.diagnostics
    }

    // Axiom

    /// Replace the axiom. Phrases are tokenized with the current defines.
    pub fn set_axiom(&mut self, axiom: impl Into<AxiomSource>) -> Result<(), TokenizeError> {
        self.axiom = normalize(axiom.into(), self.symbols(), &self.defines)?;
        Ok(())
    }

    pub fn axiom_string(&self) -> String {
        axiom_to_string(&self.axiom)
    }

    /// Serialize the current axiom with one of the built-in formats
    pub fn serialize(&self, format: &str) -> Result<String, LSystemError> {
        Ok(FormatRegistry::builtin().serialize(format, &self.axiom)?)
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn set_sampler(&mut self, sampler: impl Sampler + 'static) {
        self.sampler = Arc::new(sampler);
    }

    // Defines

    pub fn set_define(
        &mut self,
        name: impl Into<String>,
        value: f64,
    ) -> Result<(), DefineError> {
        self.defines.set(name, value)
    }

    /// Replace all defines. An invalid name leaves the previous defines in place.
    pub fn set_defines<I, K>(&mut self, defines: I) -> Result<(), DefineError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.defines = Defines::from_pairs(defines)?;
        Ok(())
    }

    pub fn clear_defines(&mut self) {
        self.defines.clear();
    }

    // Productions

    /// Register a production under a classic-syntax key
    ///
    /// Registering several productions for one symbol accumulates them. They are tried in
    /// registration order and the first one that applies wins.
    pub fn set_production(
        &mut self,
        key: &str,
        production: impl Into<Production>,
    ) -> Result<(), ProductionError> {
        let (symbol, registered) = compile_production(key, production.into(), self.symbols())?;
        debug!(key, symbol = %symbol, "registered production");
        self.productions.entry(symbol).or_default().push(registered);
        Ok(())
    }

    /// Replace all productions
    ///
    /// Every production is validated before anything is replaced, so a failure leaves the
    /// previous productions in place.
    pub fn set_productions<I, K, P>(&mut self, productions: I) -> Result<(), ProductionError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: Into<Production>,
    {
        let mut table: HashMap<String, Vec<RegisteredProduction>> = HashMap::new();
        for (key, production) in productions {
            let (symbol, registered) =
                compile_production(key.as_ref(), production.into(), self.symbols())?;
            table.entry(symbol).or_default().push(registered);
        }
        self.productions = table;
        Ok(())
    }

    pub fn clear_productions(&mut self) {
        self.productions.clear();
    }

    // Commands

    pub fn set_command<F>(&mut self, symbol: impl Into<String>, command: F)
    where
        F: FnMut(&CommandArgs<'_>) + 'static,
    {
        self.commands.insert(symbol.into(), Box::new(command));
    }

    /// Replace all commands
    pub fn set_commands<I, K>(&mut self, commands: I)
    where
        I: IntoIterator<Item = (K, Command)>,
        K: Into<String>,
    {
        self.commands = commands
            .into_iter()
            .map(|(symbol, command)| (symbol.into(), command))
            .collect();
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    // Rewriting

    /// Run the configured number of passes
    pub fn iterate(&mut self) -> &[AxiomPart] {
        self.diagnostics.clear();
        for iteration in 0..self.iterations {
            self.axiom = self.rewrite_pass(iteration);
            debug!(iteration, length = self.axiom.len(), "iteration complete");
        }
        &self.axiom
    }

    /// Store `iterations` as the new count, then run that many passes
    pub fn iterate_n(&mut self, iterations: usize) -> &[AxiomPart] {
        self.iterations = iterations;
        self.iterate()
    }

    /// One pass over the current axiom, the result is returned and not stored
    pub fn apply_productions(&mut self) -> Axiom {
        self.diagnostics.clear();
        self.rewrite_pass(0)
    }

    fn rewrite_pass(&mut self, iteration: usize) -> Axiom {
        let symbols = SymbolSet::new(&self.alphabet, &self.ignored);
        let resolver = Resolver {
            axiom: &self.axiom,
            symbols,
            defines: &self.defines,
            sampler: self.sampler.as_ref(),
        };

        let mut next = Vec::with_capacity(self.axiom.len());
        for (index, part) in self.axiom.iter().enumerate() {
            let productions = match self.productions.get(&part.symbol) {
                Some(productions) => productions,
                None => {
                    next.push(part.clone());
                    continue;
                }
            };

            let outcome = resolver
                .resolve_all(productions, part, index)
                .and_then(|resolution| match resolution {
                    Resolution::NoMatch => Ok(None),
                    Resolution::Replace(source) => normalize(source, symbols, &self.defines)
                        .map(Some)
                        .map_err(RewriteError::from),
                });

            match outcome {
                Ok(Some(parts)) => next.extend(parts),
                Ok(None) => next.push(part.clone()),
                Err(error) => {
                    warn!(iteration, index, symbol = %part.symbol, %error, "rewrite failed, keeping occurrence");
                    self.diagnostics.push(RewriteDiagnostic {
                        iteration,
                        index,
                        symbol: part.symbol.clone(),
                        error,
                    });
                    next.push(part.clone());
                }
            }
        }
        next
    }

    // Interpretation

    /// Invoke the registered commands over the current axiom, in order
    pub fn run(&mut self) {
        for (index, part) in self.axiom.iter().enumerate() {
            if let Some(command) = self.commands.get_mut(&part.symbol) {
                command(&CommandArgs {
                    index,
                    part,
                    params: &part.params,
                });
            }
        }
    }
}

/// Construction options for [LSystem]
///
/// Nothing is validated until [LSystemBuilder::build], which applies the options in a fixed
/// order: alphabets, defines, axiom, productions, commands.
#[derive(Default)]
pub struct LSystemBuilder {
    alphabet: Option<Vec<String>>,
    ignored: Option<Vec<String>>,
    axiom: Option<AxiomSource>,
    iterations: Option<usize>,
    defines: Vec<(String, f64)>,
    productions: Vec<(String, Production)>,
    commands: Vec<(String, Command)>,
    sampler: Option<Arc<dyn Sampler>>,
}

impl LSystemBuilder {
    pub fn alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alphabet = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn ignored_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn axiom(mut self, axiom: impl Into<AxiomSource>) -> Self {
        self.axiom = Some(axiom.into());
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn define(mut self, name: impl Into<String>, value: f64) -> Self {
        self.defines.push((name.into(), value));
        self
    }

    pub fn defines<I, K>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.defines
            .extend(defines.into_iter().map(|(name, value)| (name.into(), value)));
        self
    }

    pub fn production(mut self, key: impl Into<String>, production: impl Into<Production>) -> Self {
        self.productions.push((key.into(), production.into()));
        self
    }

    pub fn command<F>(mut self, symbol: impl Into<String>, command: F) -> Self
    where
        F: FnMut(&CommandArgs<'_>) + 'static,
    {
        self.commands.push((symbol.into(), Box::new(command)));
        self
    }

    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Some(Arc::new(sampler));
        self
    }

    pub fn build(self) -> Result<LSystem, LSystemError> {
        let alphabet = Alphabet::new(self.alphabet.unwrap_or_default())?;
        let ignored = match self.ignored {
            Some(symbols) => Alphabet::ignored(symbols)?,
            None => Alphabet::default_ignored(),
        };
        alphabet.ensure_disjoint(&ignored)?;

        let mut system = LSystem::from_alphabets(alphabet, ignored);
        if let Some(iterations) = self.iterations {
            system.iterations = iterations;
        }
        if let Some(sampler) = self.sampler {
            system.sampler = sampler;
        }
        system.set_defines(self.defines)?;
        if let Some(axiom) = self.axiom {
            system.set_axiom(axiom)?;
        }
        system.set_productions(self.productions)?;
        system.set_commands(self.commands);
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::error::{AlphabetError, SampleError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn algae() -> LSystem {
        LSystem::builder()
            .alphabet(["A", "B"])
            .axiom("A")
            .production("A", "AB")
            .production("B", "A")
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let system = LSystem::new(["A"]).unwrap();
        assert!(system.axiom().is_empty());
        assert_eq!(system.iterations(), 1);
        assert_eq!(system.ignored_symbols(), &Alphabet::default_ignored());
    }

    #[test]
    fn test_missing_alphabet_fails() {
        let err = LSystem::builder().axiom("A").build().unwrap_err();
        assert_eq!(err, LSystemError::Alphabet(AlphabetError::Empty));
    }

    #[test]
    fn test_overlapping_alphabets_fail() {
        let err = LSystem::builder()
            .alphabet(["A", "+"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LSystemError::Alphabet(AlphabetError::Overlap("+".to_string()))
        );
    }

    #[test]
    fn test_single_pass() {
        let mut system = algae();
        assert_eq!(axiom_to_string(&system.apply_productions()), "AB");
        // not stored
        assert_eq!(system.axiom_string(), "A");
    }

    #[test]
    fn test_iterate_uses_configured_count() {
        let mut system = LSystem::builder()
            .alphabet(["A", "B"])
            .axiom("A")
            .iterations(3)
            .production("A", "AB")
            .production("B", "A")
            .build()
            .unwrap();
        system.iterate();
        assert_eq!(system.axiom_string(), "ABAAB");
    }

    #[test]
    fn test_iterate_n_stores_count() {
        let mut system = algae();
        system.iterate_n(2);
        assert_eq!(system.iterations(), 2);
        assert_eq!(system.axiom_string(), "ABA");
    }

    #[test]
    fn test_set_production_accumulates() {
        let mut system = algae();
        system.set_production("B<A", "B").unwrap();
        assert_eq!(system.productions_for("A").len(), 2);
        assert!(system.productions_for("C").is_empty());
    }

    #[test]
    fn test_set_productions_replaces_atomically() {
        let mut system = algae();
        let err = system
            .set_productions([("A", "B"), ("Q", "A")])
            .unwrap_err();
        assert_eq!(err, ProductionError::NotInAlphabet("Q".to_string()));
        assert_eq!(system.productions_for("B").len(), 1);

        system.set_productions([("A", "BB")]).unwrap();
        assert!(system.productions_for("B").is_empty());
        system.iterate_n(1);
        assert_eq!(system.axiom_string(), "BB");
    }

    #[test]
    fn test_defines_feed_axiom_and_successors() {
        let mut system = LSystem::builder()
            .alphabet(["F"])
            .define("len", 10.0)
            .axiom("F(len)")
            .production("F(x)", "F(x/2)F(len)")
            .build()
            .unwrap();
        system.iterate_n(1);
        assert_eq!(
            system.axiom(),
            &[
                AxiomPart::with_params("F", vec![5.0]),
                AxiomPart::with_params("F", vec![10.0]),
            ][..]
        );
        system.clear_defines();
        assert!(system.defines().is_empty());
    }

    #[test]
    fn test_define_names_are_checked() {
        let mut system = LSystem::new(["F"]).unwrap();
        system.set_define("len", 2.0).unwrap();
        assert_eq!(
            system.set_define("my-len", 1.0),
            Err(DefineError::InvalidName("my-len".to_string()))
        );
        assert!(system
            .set_defines([("width", 1.0), ("bad name", 2.0)])
            .is_err());
        assert_eq!(system.defines().get("len"), Some(2.0));
        assert_eq!(system.defines().len(), 1);

        let err = LSystem::builder()
            .alphabet(["F"])
            .define("my-len", 1.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LSystemError::Define(DefineError::InvalidName("my-len".to_string()))
        );
    }

    #[test]
    fn test_structural_successor_symbols_are_checked() {
        let mut system = LSystem::new(["A", "B"]).unwrap();
        let err = system
            .set_production("A", vec![AxiomPart::new("A"), AxiomPart::new("Z")])
            .unwrap_err();
        assert!(matches!(
            err,
            ProductionError::Successor {
                source: TokenizeError::UnknownSymbol { .. },
                ..
            }
        ));
        let err = system
            .set_production("A", Production::from("B").after(vec!["Z"]))
            .unwrap_err();
        assert!(matches!(
            err,
            ProductionError::Context {
                source: TokenizeError::UnknownSymbol { .. },
                ..
            }
        ));
        assert!(system.productions_for("A").is_empty());
    }

    #[test]
    fn test_occurrence_errors_are_local() {
        let mut system = LSystem::builder()
            .alphabet(["A", "F"])
            .axiom("F(1)AF(2)")
            .production("F(x)", "F(x/(x-1))")
            .production("A", "AA")
            .build()
            .unwrap();
        system.iterate_n(1);
        assert_eq!(
            system.axiom(),
            &[
                AxiomPart::with_params("F", vec![1.0]),
                AxiomPart::new("A"),
                AxiomPart::new("A"),
                AxiomPart::with_params("F", vec![2.0]),
            ][..]
        );
        let diagnostics = system.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].iteration, 0);
        assert_eq!(diagnostics[0].index, 0);
        assert_eq!(diagnostics[0].symbol, "F");
        assert!(matches!(diagnostics[0].error, RewriteError::Tokenize(_)));
    }

    #[test]
    fn test_diagnostics_reset_per_call() {
        let mut system = LSystem::builder()
            .alphabet(["F"])
            .axiom("F(1)")
            .production("F(x,y)", "F(x)")
            .build()
            .unwrap();
        system.iterate_n(2);
        assert_eq!(system.diagnostics().len(), 2);
        system.iterate_n(1);
        assert_eq!(system.diagnostics().len(), 1);
        assert!(matches!(
            system.diagnostics()[0].error,
            RewriteError::ArityMismatch { .. }
        ));
    }

    struct Broken;

    impl Sampler for Broken {
        fn sample(&self, _seed: &str, weights: &[f64]) -> Result<usize, SampleError> {
            Ok(weights.len())
        }
    }

    #[test]
    fn test_misbehaving_sampler_is_reported() {
        let mut system = LSystem::builder()
            .alphabet(["A", "B"])
            .axiom("A")
            .production("A", Production::stochastic([("B", 1.0)]))
            .sampler(Broken)
            .build()
            .unwrap();
        system.iterate_n(1);
        assert_eq!(system.axiom_string(), "A");
        assert_eq!(
            system.diagnostics()[0].error,
            RewriteError::Sample(SampleError::OutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_dynamic_result_is_normalized() {
        let mut system = LSystem::builder()
            .alphabet(["A", "B"])
            .define("n", 3.0)
            .axiom("A")
            .production("A", Production::dynamic(|_| Resolution::phrase("B(n)+")))
            .build()
            .unwrap();
        system.iterate_n(1);
        assert_eq!(
            system.axiom(),
            &[AxiomPart::with_params("B", vec![3.0]), AxiomPart::new("+")][..]
        );
    }

    #[test]
    fn test_run_dispatches_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let forward = Rc::clone(&seen);
        let turn = Rc::clone(&seen);
        let mut system = LSystem::builder()
            .alphabet(["F"])
            .axiom("F(2)+(90)F(3)")
            .command("F", move |args| {
                forward.borrow_mut().push(format!("F{}@{}", args.params[0], args.index))
            })
            .command("+", move |args| {
                turn.borrow_mut().push(format!("+{}@{}", args.params[0], args.index))
            })
            .build()
            .unwrap();
        system.run();
        assert_eq!(*seen.borrow(), vec!["F2@0", "+90@1", "F3@2"]);

        system.clear_commands();
        system.run();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_set_axiom_rejects_unknown_symbols() {
        let mut system = algae();
        assert!(system.set_axiom("AC").is_err());
        assert!(system.set_axiom(vec![AxiomPart::new("C")]).is_err());
        assert_eq!(system.axiom_string(), "A");
    }
}
