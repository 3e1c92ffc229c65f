//! The contract every accessory translator implements.

use knx_homekit_common::FieldValue;

use crate::error::{Result, TranslateError};
use crate::state::StateAccessor;

/// Field names shared by the bus and accessory sides.
///
/// Characteristic names follow HomeKit; `On/Off` only exists on the bus.
pub mod field {
    pub const TARGET_HEATING_COOLING_STATE: &str = "TargetHeatingCoolingState";
    pub const CURRENT_HEATING_COOLING_STATE: &str = "CurrentHeatingCoolingState";
    pub const CURRENT_TEMPERATURE: &str = "CurrentTemperature";
    pub const TARGET_TEMPERATURE: &str = "TargetTemperature";
    pub const ON_OFF: &str = "On/Off";

    pub const ACTIVE: &str = "Active";
    pub const TARGET_FAN_STATE: &str = "TargetFanState";
    pub const ROTATION_SPEED: &str = "RotationSpeed";
}

/// Translates value changes for one accessory type in both directions.
///
/// Implementations hold no mutable state: everything they need is read from
/// the [`StateAccessor`] passed to each call. Unknown field names are
/// ignored and return `Ok(())`.
pub trait Translator: Send + Sync {
    /// Short name of the accessory type (e.g. "climate").
    fn kind(&self) -> &'static str;

    /// Field names this translator reacts to.
    fn fields(&self) -> &'static [&'static str];

    /// A group object changed on the bus.
    fn on_bus_change(
        &self,
        state: &mut dyn StateAccessor,
        field: &str,
        old: Option<&FieldValue>,
        new: &FieldValue,
    ) -> Result<()>;

    /// A characteristic was changed from the accessory side.
    fn on_accessory_change(
        &self,
        state: &mut dyn StateAccessor,
        field: &str,
        old: Option<&FieldValue>,
        new: &FieldValue,
    ) -> Result<()>;

    /// Whether `field` is one this translator understands.
    fn handles(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

pub(crate) fn require_integer(field: &str, value: &FieldValue) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| TranslateError::expected(field, "an integer", value))
}

pub(crate) fn require_number(field: &str, value: &FieldValue) -> Result<f64> {
    match value {
        // Booleans have a numeric reading but never mean a temperature or speed.
        FieldValue::Boolean(_) => Err(TranslateError::expected(field, "a number", value)),
        other => other
            .as_f64()
            .ok_or_else(|| TranslateError::expected(field, "a number", value)),
    }
}

pub(crate) fn require_bool(field: &str, value: &FieldValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| TranslateError::expected(field, "a switch value", value))
}
