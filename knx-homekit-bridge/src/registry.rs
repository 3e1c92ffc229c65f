//! Service-type to translator lookup.

use std::collections::HashMap;

use crate::climate::ClimateTranslator;
use crate::fan::FanTranslator;
use crate::translator::Translator;

/// Builds a translator for a named service.
pub type TranslatorFactory = fn(&str) -> Box<dyn Translator>;

/// Maps service types (or handler names) to translator constructors.
#[derive(Default, Clone)]
pub struct TranslatorRegistry {
    factories: HashMap<String, TranslatorFactory>,
}

impl TranslatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in translators, reachable by service type
    /// (`Thermostat`, `Fanv2`) and by the gateway handler names
    /// (`ZennioAirconditioning`, `ZennioAirconditioningFan`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Thermostat", |name| Box::new(ClimateTranslator::new(name)));
        registry.register("ZennioAirconditioning", |name| {
            Box::new(ClimateTranslator::new(name))
        });
        registry.register("Fanv2", |name| Box::new(FanTranslator::new(name)));
        registry.register("ZennioAirconditioningFan", |name| {
            Box::new(FanTranslator::new(name))
        });
        registry
    }

    /// Register a factory, returning the one it replaces.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        factory: TranslatorFactory,
    ) -> Option<TranslatorFactory> {
        self.factories.insert(key.into(), factory)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Instantiate the translator registered under `key` for `service_name`.
    pub fn create(&self, key: &str, service_name: &str) -> Option<Box<dyn Translator>> {
        self.factories.get(key).map(|factory| factory(service_name))
    }

    /// Registered keys, sorted.
    pub fn service_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("service_types", &self.service_types())
            .finish()
    }
}
