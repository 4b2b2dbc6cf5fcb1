//! Declarative L-system definitions
//!
//! An [LSystemConfig] mirrors the construction options of [LSystem] as plain data, so a
//! system can be described in a YAML or JSON file:
//!
//! ```yaml
//! alphabet: [A, B]
//! axiom: "A"
//! iterations: 4
//! defines: { angle: 25 }
//! productions:
//!   - key: "A"
//!     successor: "AB"
//!   - key: "B<A>B"
//!     stochastic:
//!       - { successor: "A", weight: 1 }
//!       - { successor: "B", weight: 3 }
//! ```
//!
//! Productions are a list rather than a map so that registration order, which is also the
//! priority order, survives the round trip. Conditions, dynamic successors and commands are
//! code and cannot be expressed here.

use crate::lsystem::engine::{LSystem, LSystemBuilder};
use crate::lsystem::error::{ConfigError, LSystemError};
use crate::lsystem::production::{Context, ContextPattern, Production};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Top-level definition of an L-system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSystemConfig {
    pub alphabet: Vec<String>,
    /// Defaults to the standard ignored punctuation when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_symbols: Option<Vec<String>>,
    #[serde(default)]
    pub axiom: String,
    /// Floor-truncated, must not be negative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defines: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub productions: Vec<ProductionConfig>,
}

/// One production. Exactly one of `successor` and `stochastic` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionConfig {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<Vec<WeightedConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedConfig {
    pub successor: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl LSystemConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Load a definition file, the format is picked by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(display)),
        };

        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loading definition");
        parse(&source)
    }

    /// The iteration count after validation, if one is set
    pub fn iteration_count(&self) -> Result<Option<usize>, ConfigError> {
        match self.iterations {
            None => Ok(None),
            Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n.floor() as usize)),
            Some(n) => Err(ConfigError::InvalidIterations(n)),
        }
    }

    /// Translate into builder calls. Alphabet and production validation happen in
    /// [LSystemBuilder::build].
    pub fn builder(&self) -> Result<LSystemBuilder, ConfigError> {
        let mut builder = LSystem::builder()
            .alphabet(self.alphabet.iter().cloned())
            .axiom(self.axiom.as_str())
            .defines(self.defines.iter().map(|(name, value)| (name.clone(), *value)));
        if let Some(ignored) = &self.ignored_symbols {
            builder = builder.ignored_symbols(ignored.iter().cloned());
        }
        if let Some(iterations) = self.iteration_count()? {
            builder = builder.iterations(iterations);
        }
        for production in &self.productions {
            builder = builder.production(production.key.clone(), production.to_production()?);
        }
        Ok(builder)
    }
}

impl ProductionConfig {
    fn to_production(&self) -> Result<Production, ConfigError> {
        let mut production = match (&self.successor, &self.stochastic) {
            (Some(successor), None) => Production::new(successor.as_str()),
            (None, Some(alternatives)) => Production::stochastic(
                alternatives
                    .iter()
                    .map(|item| (item.successor.as_str(), item.weight)),
            ),
            _ => return Err(ConfigError::AmbiguousProduction(self.key.clone())),
        };
        if let Some(context) = &self.context {
            production = production.with_context(Context {
                before: context.before.clone().map(ContextPattern::Phrase),
                after: context.after.clone().map(ContextPattern::Phrase),
            });
        }
        Ok(production)
    }
}

impl LSystem {
    pub fn from_config(config: &LSystemConfig) -> Result<LSystem, LSystemError> {
        config.builder()?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::error::{DefineError, ProductionError};
    use std::io::Write;

    const ALGAE: &str = r#"
alphabet: [A, B]
axiom: A
iterations: 4.7
productions:
  - key: A
    successor: AB
  - key: B
    successor: A
"#;

    #[test]
    fn test_yaml_definition() {
        let config = LSystemConfig::from_yaml_str(ALGAE).unwrap();
        assert_eq!(config.iteration_count().unwrap(), Some(4));
        let mut system = LSystem::from_config(&config).unwrap();
        system.iterate();
        assert_eq!(system.axiom_string(), "ABAABABA");
    }

    #[test]
    fn test_json_definition_with_context_and_stochastic() {
        let config = LSystemConfig::from_json_str(
            r#"{
                "alphabet": ["A", "B", "C"],
                "ignored_symbols": ["+"],
                "axiom": "BAC",
                "productions": [
                    { "key": "A", "successor": "C", "context": { "before": "B" } },
                    { "key": "C", "stochastic": [
                        { "successor": "A", "weight": 0 },
                        { "successor": "B", "weight": 2 }
                    ] }
                ]
            }"#,
        )
        .unwrap();
        let mut system = LSystem::from_config(&config).unwrap();
        assert_eq!(system.iterations(), 1);
        system.iterate();
        assert_eq!(system.axiom_string(), "BCB");
    }

    #[test]
    fn test_defines_and_defaults() {
        let config = LSystemConfig::from_yaml_str(
            "alphabet: [F]\naxiom: F(len)\ndefines: { len: 3 }\n",
        )
        .unwrap();
        assert_eq!(config.ignored_symbols, None);
        let system = LSystem::from_config(&config).unwrap();
        assert_eq!(system.axiom()[0].params, vec![3.0]);
    }

    #[test]
    fn test_define_names_must_be_identifiers() {
        let config =
            LSystemConfig::from_yaml_str("alphabet: [F]\ndefines: { my-len: 3 }\n").unwrap();
        assert_eq!(
            LSystem::from_config(&config).unwrap_err(),
            LSystemError::Define(DefineError::InvalidName("my-len".to_string()))
        );
    }

    #[test]
    fn test_negative_iterations_rejected() {
        let config = LSystemConfig::from_yaml_str("alphabet: [A]\niterations: -1\n").unwrap();
        assert_eq!(
            LSystem::from_config(&config).unwrap_err(),
            LSystemError::Config(ConfigError::InvalidIterations(-1.0))
        );
    }

    #[test]
    fn test_production_needs_one_successor_kind() {
        let config = LSystemConfig::from_yaml_str(
            "alphabet: [A]\nproductions:\n  - key: A\n",
        )
        .unwrap();
        assert_eq!(
            LSystem::from_config(&config).unwrap_err(),
            LSystemError::Config(ConfigError::AmbiguousProduction("A".to_string()))
        );
    }

    #[test]
    fn test_registration_errors_surface() {
        let config = LSystemConfig::from_yaml_str(
            "alphabet: [A]\nproductions:\n  - key: B\n    successor: A\n",
        )
        .unwrap();
        assert_eq!(
            LSystem::from_config(&config).unwrap_err(),
            LSystemError::Production(ProductionError::NotInAlphabet("B".to_string()))
        );
    }

    #[test]
    fn test_malformed_sources() {
        assert!(matches!(
            LSystemConfig::from_yaml_str("alphabet: ["),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            LSystemConfig::from_json_str("{}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("algae.yml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(ALGAE.as_bytes())
            .unwrap();
        assert_eq!(
            LSystemConfig::load(&path).unwrap(),
            LSystemConfig::from_yaml_str(ALGAE).unwrap()
        );

        let txt = dir.path().join("algae.txt");
        assert!(matches!(
            LSystemConfig::load(&txt),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            LSystemConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
