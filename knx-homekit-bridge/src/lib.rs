//! Translators between KNX group objects and HomeKit characteristics.
//!
//! A gateway listening on the KNX bus and serving HomeKit accessories hands
//! every value change to a [`Translator`]. The translator reads and writes
//! through a [`StateAccessor`] and never keeps state of its own.
//!
//! # Translators
//!
//! | Service type | Translator | Fields |
//! |--------------|------------|--------|
//! | `Thermostat` | [`ClimateTranslator`] | `TargetHeatingCoolingState`, `CurrentHeatingCoolingState`, `CurrentTemperature`, `TargetTemperature`, `On/Off` |
//! | `Fanv2` | [`FanTranslator`] | `Active`, `TargetFanState`, `RotationSpeed` |
//!
//! # Example
//!
//! ```ignore
//! use knx_homekit_bridge::{MemoryState, StateAccessor, ClimateTranslator, Translator};
//!
//! let translator = ClimateTranslator::new("Airco");
//! let mut state = MemoryState::default();
//!
//! translator.on_accessory_change(&mut state, "TargetHeatingCoolingState", None, &2.into())?;
//! // state.bus_writes() now holds On/Off = true, then TargetHeatingCoolingState = 3
//! ```

pub mod climate;
pub mod config;
pub mod error;
pub mod fan;
pub mod registry;
pub mod replay;
pub mod service;
pub mod state;
pub mod translator;

pub use climate::ClimateTranslator;
pub use config::{BridgeConfig, ConfigError, FieldConfig, ServiceConfig};
pub use error::{Result, TranslateError};
pub use fan::FanTranslator;
pub use registry::{TranslatorFactory, TranslatorRegistry};
pub use service::{Service, Telegram};
pub use state::{BusWrite, MemoryState, StateAccessor};
pub use translator::{Translator, field};

// Re-export commonly used types from knx-homekit-common
pub use knx_homekit_common::{Dpt, FieldValue, GroupAddress, LoggingConfig};
