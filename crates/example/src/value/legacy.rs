//! Example literals for legacy (XML schema) simple types.
//!
//! Legacy types carry no OTM example declarations, so their values come from
//! per-namespace providers keyed by local type name. The default provider for
//! the XSD built-ins is bundled with the crate.

use crate::{ExampleError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

const BUNDLED_XSD_EXAMPLES: &str = include_str!("../../resources/xsd-examples.json");

/// Source of example literals for the simple types of one namespace.
pub trait LegacyExampleProvider: Send + Sync {
    fn namespace(&self) -> &str;

    /// Next literal for the type, or `None` if no literal is configured.
    fn next_value(&self, local_name: &str) -> Option<String>;
}

/// On-disk shape of a provider configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub namespace: String,
    #[serde(default)]
    pub examples: HashMap<String, Vec<String>>,
}

/// Provider backed by a [`ProviderConfig`], rotating each type's literals.
#[derive(Debug)]
pub struct ConfiguredExampleProvider {
    namespace: String,
    examples: Mutex<HashMap<String, VecDeque<String>>>,
}

impl ConfiguredExampleProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let examples = config
            .examples
            .into_iter()
            .map(|(name, values)| (name, VecDeque::from(values)))
            .collect();
        Self {
            namespace: config.namespace,
            examples: Mutex::new(examples),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ProviderConfig = serde_json::from_str(json)?;
        if config.namespace.is_empty() {
            return Err(ExampleError::config("example provider without a namespace"));
        }
        Ok(Self::new(config))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Provider for the XSD built-in types shipped with this crate.
    pub fn xsd_builtins() -> Result<Self> {
        Self::from_json_str(BUNDLED_XSD_EXAMPLES)
    }
}

impl LegacyExampleProvider for ConfiguredExampleProvider {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn next_value(&self, local_name: &str) -> Option<String> {
        let mut examples = self.examples.lock();
        let values = examples.get_mut(local_name)?;
        let value = values.pop_front()?;
        values.push_back(value.clone());
        Some(value)
    }
}

/// Providers indexed by namespace.
#[derive(Default)]
pub struct LegacyProviders {
    providers: HashMap<String, Box<dyn LegacyExampleProvider>>,
}

impl LegacyProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any previous one for its namespace.
    pub fn register(&mut self, provider: impl LegacyExampleProvider + 'static) {
        self.providers
            .insert(provider.namespace().to_string(), Box::new(provider));
    }

    pub fn next_value(&self, namespace: &str, local_name: &str) -> Option<String> {
        self.providers.get(namespace)?.next_value(local_name)
    }
}

impl std::fmt::Debug for LegacyProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyProviders")
            .field("namespaces", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
