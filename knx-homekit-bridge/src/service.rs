//! A single accessory bound to its translator and value store.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use knx_homekit_common::{Dpt, FieldValue, GroupAddress};

use crate::config::{ConfigError, ServiceConfig};
use crate::error::Result;
use crate::registry::TranslatorRegistry;
use crate::state::{MemoryState, StateAccessor};
use crate::translator::Translator;

/// A bus write resolved to its destination group address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telegram {
    pub address: GroupAddress,
    pub field: String,
    pub value: FieldValue,
    pub dpt: Dpt,
}

/// One accessory: its declaration, translator, and state.
pub struct Service {
    config: ServiceConfig,
    translator: Box<dyn Translator>,
    state: MemoryState,
}

impl Service {
    pub fn new(config: ServiceConfig, translator: Box<dyn Translator>) -> Self {
        Self {
            config,
            translator,
            state: MemoryState::new(),
        }
    }

    /// Build a service, instantiating its translator from `registry`.
    pub fn from_config(
        config: ServiceConfig,
        registry: &TranslatorRegistry,
    ) -> std::result::Result<Self, ConfigError> {
        let translator = registry
            .create(config.registry_key(), &config.service_name)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "no translator registered for '{}'",
                    config.registry_key()
                ))
            })?;

        Ok(Self::new(config, translator))
    }

    pub fn name(&self) -> &str {
        &self.config.service_name
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MemoryState {
        &mut self.state
    }

    /// A field changed on the bus.
    ///
    /// A value the translator rejects is not kept.
    pub fn bus_update(&mut self, field: &str, value: FieldValue) -> Result<()> {
        let old = self.state.record_bus_value(field, value.clone());
        let result = self
            .translator
            .on_bus_change(&mut self.state, field, old.as_ref(), &value);

        if result.is_err() {
            self.state.restore_bus_value(field, old);
        }
        result
    }

    /// A characteristic was changed by a HomeKit controller.
    ///
    /// A value the translator rejects is not kept.
    pub fn accessory_update(&mut self, field: &str, value: FieldValue) -> Result<()> {
        let old = self.state.get_value(field);
        self.state.set_value(field, value.clone());
        let result = self
            .translator
            .on_accessory_change(&mut self.state, field, old.as_ref(), &value);

        if result.is_err() {
            self.state.restore_value(field, old);
        }
        result
    }

    /// A telegram arrived on `address`. Returns how many fields it updated.
    ///
    /// Every field listening on the address is updated; stops at the first
    /// field whose value fails translation.
    pub fn bus_telegram(&mut self, address: GroupAddress, value: FieldValue) -> Result<usize> {
        let fields: Vec<String> = self
            .config
            .fields_for_address(&address)
            .into_iter()
            .map(|f| f.field_type.clone())
            .collect();

        if fields.is_empty() {
            debug!(service = %self.name(), %address, "No field listens on address");
            return Ok(0);
        }

        for field in &fields {
            self.bus_update(field, value.clone())?;
        }

        Ok(fields.len())
    }

    /// Drain pending bus writes, resolving each to its `Set` address.
    ///
    /// Writes for fields without a `Set` address are dropped with a warning.
    pub fn take_telegrams(&mut self) -> Vec<Telegram> {
        let writes = self.state.take_bus_writes();
        let mut telegrams = Vec::with_capacity(writes.len());

        for write in writes {
            let Some(declared) = self.config.field(&write.name) else {
                warn!(service = %self.name(), field = %write.name, "Dropping write for undeclared field");
                continue;
            };
            let Some(address) = declared.set else {
                warn!(service = %self.name(), field = %write.name, "Dropping write, field has no Set address");
                continue;
            };

            if declared.dpt != write.dpt {
                debug!(
                    field = %write.name,
                    declared = %declared.dpt,
                    written = %write.dpt,
                    "Write encoding differs from declaration"
                );
            }
            if !write.dpt.accepts(&write.value) {
                warn!(field = %write.name, value = %write.value, dpt = %write.dpt, "Value outside datapoint range");
            }

            telegrams.push(Telegram {
                address,
                field: write.name,
                value: write.value,
                dpt: write.dpt,
            });
        }

        telegrams
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.config.service_name)
            .field("translator", &self.translator.kind())
            .field("state", &self.state)
            .finish()
    }
}
