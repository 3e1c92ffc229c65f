//! Configuration for the bridge.
//!
//! Accessories are declared in the gateway's own format:
//!
//! ```json5
//! {
//!     logging: { level: "info" },
//!     service: {
//!         ServiceType: "Thermostat",
//!         ServiceName: "Airco",
//!         Characteristics: [
//!             { Type: "TargetHeatingCoolingState", Set: "3/0/8", Listen: ["3/0/8", "3/1/8"], DPT: "DPT5" },
//!         ],
//!         KNXObjects: [
//!             { Type: "On/Off", Set: "3/2/8", Listen: "3/3/8", DPT: "DPT1" },
//!         ],
//!     },
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use knx_homekit_common::{Dpt, GroupAddress, LoggingConfig};

use crate::registry::TranslatorRegistry;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The accessory to translate for
    pub service: ServiceConfig,
}

/// One accessory service and its group objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfig {
    /// HomeKit service type (e.g. "Thermostat", "Fanv2")
    pub service_type: String,

    /// Registry key overriding the service type
    #[serde(default)]
    pub handler: Option<String>,

    /// Display name, also used to label log output
    pub service_name: String,

    /// HomeKit characteristics bound to group addresses
    #[serde(default)]
    pub characteristics: Vec<FieldConfig>,

    /// Bus-only group objects
    #[serde(default, rename = "KNXObjects")]
    pub knx_objects: Vec<FieldConfig>,
}

/// A field bound to group addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldConfig {
    /// Field name (characteristic or bus object)
    #[serde(rename = "Type")]
    pub field_type: String,

    /// Address written to when the field is sent to the bus
    #[serde(default)]
    pub set: Option<GroupAddress>,

    /// Addresses whose telegrams update the field
    #[serde(default)]
    pub listen: Listen,

    /// Declared datapoint type
    #[serde(rename = "DPT")]
    pub dpt: Dpt,
}

/// One listened address or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listen {
    One(GroupAddress),
    Many(Vec<GroupAddress>),
}

impl Default for Listen {
    fn default() -> Self {
        Listen::Many(Vec::new())
    }
}

impl Listen {
    pub fn addresses(&self) -> &[GroupAddress] {
        match self {
            Listen::One(addr) => std::slice::from_ref(addr),
            Listen::Many(addrs) => addrs,
        }
    }

    pub fn contains(&self, addr: &GroupAddress) -> bool {
        self.addresses().contains(addr)
    }
}

impl BridgeConfig {
    /// Read and parse a JSON5 file without validating it.
    ///
    /// Lets the caller set up logging from the file before validation
    /// warnings are emitted.
    pub fn parse_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: BridgeConfig = json5::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON5 file and validate it against `registry`.
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        registry: &TranslatorRegistry,
    ) -> Result<Self, ConfigError> {
        let config = Self::parse_from_file(path)?;
        config.validate(registry)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self, registry: &TranslatorRegistry) -> Result<(), ConfigError> {
        self.service.validate(registry)
    }
}

impl ServiceConfig {
    /// Key used to look up the translator.
    pub fn registry_key(&self) -> &str {
        self.handler.as_deref().unwrap_or(&self.service_type)
    }

    /// All declared fields, characteristics first.
    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.characteristics.iter().chain(self.knx_objects.iter())
    }

    /// Fields listening on `addr`. One address may feed several fields.
    pub fn fields_for_address(&self, addr: &GroupAddress) -> Vec<&FieldConfig> {
        self.fields().filter(|f| f.listen.contains(addr)).collect()
    }

    /// Declaration of a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields().find(|f| f.field_type == name)
    }

    /// Declared encoding of a field.
    pub fn dpt_for(&self, name: &str) -> Option<Dpt> {
        self.field(name).map(|f| f.dpt)
    }

    /// Validate the service declaration.
    pub fn validate(&self, registry: &TranslatorRegistry) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ServiceName cannot be empty".to_string(),
            ));
        }

        let key = self.registry_key();
        let Some(translator) = registry.create(key, &self.service_name) else {
            return Err(ConfigError::Validation(format!(
                "Service '{}': no translator registered for '{}' (known: {})",
                self.service_name,
                key,
                registry.service_types().join(", ")
            )));
        };

        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.field_type.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Service '{}': field '{}' declared twice",
                    self.service_name, field.field_type
                )));
            }

            // Tolerated so newer gateway configs keep loading.
            if !translator.handles(&field.field_type) {
                warn!(
                    service = %self.service_name,
                    field = %field.field_type,
                    "Field is not handled by the {} translator",
                    translator.kind()
                );
            }
        }

        Ok(())
    }
}
