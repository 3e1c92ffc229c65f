//! Thermostat translation for air-conditioning controllers.
//!
//! The controller reports its operating mode as a DPT5 code and is switched
//! through a separate `On/Off` group object. HomeKit models both as a single
//! heating/cooling state, so modes it has no slot for are approximated:
//! fan-only shows as cooling, dry shows as heating.

use tracing::{Span, debug, trace};

use knx_homekit_common::{Dpt, FieldValue};

use crate::error::Result;
use crate::state::StateAccessor;
use crate::translator::{Translator, field, require_bool, require_integer, require_number};

const FIELDS: &[&str] = &[
    field::TARGET_HEATING_COOLING_STATE,
    field::CURRENT_HEATING_COOLING_STATE,
    field::CURRENT_TEMPERATURE,
    field::TARGET_TEMPERATURE,
    field::ON_OFF,
];

/// HomeKit heating/cooling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingCoolingState {
    Off = 0,
    Heat = 1,
    Cool = 2,
    Auto = 3,
}

impl HeatingCoolingState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::Heat),
            2 => Some(Self::Cool),
            3 => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Controller mode to request for this state. `Off` has none: it is
    /// expressed through the `On/Off` object instead.
    pub fn to_controller_mode(self) -> Option<ControllerMode> {
        match self {
            Self::Off => None,
            Self::Heat => Some(ControllerMode::Heat),
            Self::Cool => Some(ControllerMode::Cool),
            Self::Auto => Some(ControllerMode::Auto),
        }
    }
}

impl From<HeatingCoolingState> for FieldValue {
    fn from(state: HeatingCoolingState) -> Self {
        FieldValue::Integer(state.code())
    }
}

/// Operating mode codes used by the controller on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Auto = 0,
    Heat = 1,
    Cool = 3,
    Fan = 9,
    Dry = 14,
}

impl ControllerMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::Heat),
            3 => Some(Self::Cool),
            9 => Some(Self::Fan),
            14 => Some(Self::Dry),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    /// HomeKit state shown for this mode.
    ///
    /// `Auto` is only meaningful as a target; the current state has no such
    /// value and is left untouched.
    pub fn to_homekit(self, characteristic: &str) -> Option<HeatingCoolingState> {
        match self {
            Self::Auto if characteristic == field::TARGET_HEATING_COOLING_STATE => {
                Some(HeatingCoolingState::Auto)
            }
            Self::Auto => None,
            Self::Heat | Self::Dry => Some(HeatingCoolingState::Heat),
            Self::Cool | Self::Fan => Some(HeatingCoolingState::Cool),
        }
    }
}

/// Translator for thermostat services backed by an AC controller.
#[derive(Debug, Clone)]
pub struct ClimateTranslator {
    span: Span,
}

impl ClimateTranslator {
    /// Create a translator logging under a span named after the service.
    pub fn new(service_name: &str) -> Self {
        Self::with_span(tracing::info_span!(
            "translator",
            kind = "climate",
            service = %service_name
        ))
    }

    /// Create a translator logging under the given span.
    pub fn with_span(span: Span) -> Self {
        Self { span }
    }

    fn apply_mode(&self, state: &mut dyn StateAccessor, characteristic: &str, mode: ControllerMode) {
        match mode.to_homekit(characteristic) {
            Some(hk) => {
                trace!(characteristic, ?mode, state = ?hk, "Applying controller mode");
                state.set_value(characteristic, hk.into());
            }
            None => trace!(characteristic, ?mode, "Mode has no HomeKit equivalent here"),
        }
    }

    /// Derive whether the unit is currently heating or cooling from the
    /// temperature gap. Ambiguous cases lean towards heating.
    fn recompute_current_state(&self, state: &mut dyn StateAccessor, current: f64, target: f64) {
        let is_on = state
            .get_bus_value(field::ON_OFF)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let already_heating = state
            .get_value(field::CURRENT_HEATING_COOLING_STATE)
            .and_then(|v| v.as_i64())
            == Some(HeatingCoolingState::Heat.code())
            || state
                .get_bus_value(field::CURRENT_HEATING_COOLING_STATE)
                .and_then(|v| v.as_i64())
                == Some(ControllerMode::Fan.code());

        let derived = if current == target || !is_on {
            HeatingCoolingState::Off
        } else if current <= target || already_heating {
            HeatingCoolingState::Heat
        } else {
            HeatingCoolingState::Cool
        };

        debug!(current, target, is_on, state = ?derived, "Derived current heating/cooling state");
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, derived.into());
    }
}

impl Translator for ClimateTranslator {
    fn kind(&self) -> &'static str {
        "climate"
    }

    fn fields(&self) -> &'static [&'static str] {
        FIELDS
    }

    fn on_bus_change(
        &self,
        state: &mut dyn StateAccessor,
        field: &str,
        old: Option<&FieldValue>,
        new: &FieldValue,
    ) -> Result<()> {
        let _enter = self.span.enter();
        debug!(field, ?old, %new, "Bus value changed");

        match field {
            field::TARGET_HEATING_COOLING_STATE | field::CURRENT_HEATING_COOLING_STATE => {
                let code = require_integer(field, new)?;
                match ControllerMode::from_code(code) {
                    Some(mode) => self.apply_mode(state, field, mode),
                    None => debug!(field, code, "Ignoring unmapped controller mode"),
                }
            }

            field::ON_OFF => {
                if require_bool(field, new)? {
                    let mode = state
                        .get_bus_value(field::CURRENT_HEATING_COOLING_STATE)
                        .and_then(|v| v.as_i64())
                        .and_then(ControllerMode::from_code);

                    match mode {
                        Some(mode) => {
                            self.apply_mode(state, field::CURRENT_HEATING_COOLING_STATE, mode);
                            self.apply_mode(state, field::TARGET_HEATING_COOLING_STATE, mode);
                        }
                        None => debug!("Switched on before any mode was reported"),
                    }
                } else {
                    state.set_value(
                        field::CURRENT_HEATING_COOLING_STATE,
                        HeatingCoolingState::Off.into(),
                    );
                    state.set_value(
                        field::TARGET_HEATING_COOLING_STATE,
                        HeatingCoolingState::Off.into(),
                    );
                }
            }

            field::CURRENT_TEMPERATURE => {
                let current = require_number(field, new)?;
                state.set_value(field::CURRENT_TEMPERATURE, FieldValue::Float(current));

                if let Some(target) = state
                    .get_value(field::TARGET_TEMPERATURE)
                    .and_then(|v| v.as_f64())
                {
                    self.recompute_current_state(state, current, target);
                }
            }

            field::TARGET_TEMPERATURE => {
                let target = require_number(field, new)?;
                state.set_value(field::TARGET_TEMPERATURE, FieldValue::Float(target));

                if let Some(current) = state
                    .get_value(field::CURRENT_TEMPERATURE)
                    .and_then(|v| v.as_f64())
                {
                    self.recompute_current_state(state, current, target);
                }
            }

            _ => trace!(field, "Ignoring unknown field"),
        }

        Ok(())
    }

    fn on_accessory_change(
        &self,
        state: &mut dyn StateAccessor,
        field: &str,
        old: Option<&FieldValue>,
        new: &FieldValue,
    ) -> Result<()> {
        let _enter = self.span.enter();
        debug!(field, ?old, %new, "Accessory value changed");

        match field {
            // Status mirrors, nothing to send.
            field::CURRENT_HEATING_COOLING_STATE | field::CURRENT_TEMPERATURE => {}

            field::TARGET_HEATING_COOLING_STATE => {
                let code = require_integer(field, new)?;
                let Some(target) = HeatingCoolingState::from_code(code) else {
                    debug!(field, code, "Ignoring unmapped heating/cooling state");
                    return Ok(());
                };

                match target.to_controller_mode() {
                    None => state.write_bus(field::ON_OFF, FieldValue::Boolean(false), Dpt::Dpt1),
                    Some(mode) => {
                        state.write_bus(field::ON_OFF, FieldValue::Boolean(true), Dpt::Dpt1);
                        state.write_bus(
                            field::TARGET_HEATING_COOLING_STATE,
                            FieldValue::Integer(mode.code()),
                            Dpt::Dpt5,
                        );
                    }
                }
            }

            field::TARGET_TEMPERATURE => {
                let target = require_number(field, new)?;
                state.write_bus(field::TARGET_TEMPERATURE, FieldValue::Float(target), Dpt::Dpt9);
            }

            _ => trace!(field, "Ignoring unknown field"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::state::{BusWrite, MemoryState};

    fn translator() -> ClimateTranslator {
        ClimateTranslator::new("test")
    }

    fn value(state: &MemoryState, name: &str) -> Option<i64> {
        state.get_value(name).and_then(|v| v.as_i64())
    }

    /// State of a unit that is switched on with both temperatures known.
    fn running(current: f64, target: f64) -> MemoryState {
        let mut state = MemoryState::new();
        state.record_bus_value(field::ON_OFF, FieldValue::Boolean(true));
        state.set_value(field::CURRENT_TEMPERATURE, FieldValue::Float(current));
        state.set_value(field::TARGET_TEMPERATURE, FieldValue::Float(target));
        state
    }

    #[test]
    fn test_target_mode_mapping() {
        let cases = [(0, 3), (1, 1), (3, 2), (9, 2), (14, 1)];

        for (bus, homekit) in cases {
            let mut state = MemoryState::new();
            translator()
                .on_bus_change(
                    &mut state,
                    field::TARGET_HEATING_COOLING_STATE,
                    None,
                    &FieldValue::Integer(bus),
                )
                .unwrap();

            assert_eq!(
                value(&state, field::TARGET_HEATING_COOLING_STATE),
                Some(homekit),
                "bus mode {}",
                bus
            );
        }
    }

    #[test]
    fn test_current_mode_has_no_auto() {
        let mut state = MemoryState::new();
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(1));

        translator()
            .on_bus_change(
                &mut state,
                field::CURRENT_HEATING_COOLING_STATE,
                None,
                &FieldValue::Integer(0),
            )
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(1));
    }

    #[test]
    fn test_unmapped_mode_is_ignored() {
        for code in [2, 4, 8, 10, 13, 15, 255, -1] {
            let mut state = MemoryState::new();
            state.set_value(field::TARGET_HEATING_COOLING_STATE, FieldValue::Integer(1));

            translator()
                .on_bus_change(
                    &mut state,
                    field::TARGET_HEATING_COOLING_STATE,
                    None,
                    &FieldValue::Integer(code),
                )
                .unwrap();

            assert_eq!(value(&state, field::TARGET_HEATING_COOLING_STATE), Some(1));
        }
    }

    #[test]
    fn test_mode_rejects_text() {
        let mut state = MemoryState::new();
        let result = translator().on_bus_change(
            &mut state,
            field::TARGET_HEATING_COOLING_STATE,
            None,
            &FieldValue::from("cool"),
        );
        assert!(matches!(result, Err(TranslateError::Validation { .. })));
        assert!(state.values().is_empty());
    }

    #[test]
    fn test_switch_off_forces_off() {
        let mut state = MemoryState::new();
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(2));
        state.set_value(field::TARGET_HEATING_COOLING_STATE, FieldValue::Integer(3));

        translator()
            .on_bus_change(&mut state, field::ON_OFF, None, &FieldValue::Boolean(false))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(0));
        assert_eq!(value(&state, field::TARGET_HEATING_COOLING_STATE), Some(0));
    }

    #[test]
    fn test_switch_on_restores_bus_mode() {
        let mut state = MemoryState::new();
        state.record_bus_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(3));

        translator()
            .on_bus_change(&mut state, field::ON_OFF, None, &FieldValue::Integer(1))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(2));
        assert_eq!(value(&state, field::TARGET_HEATING_COOLING_STATE), Some(2));
    }

    #[test]
    fn test_switch_on_in_auto_only_sets_target() {
        let mut state = MemoryState::new();
        state.record_bus_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(0));

        translator()
            .on_bus_change(&mut state, field::ON_OFF, None, &FieldValue::Boolean(true))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), None);
        assert_eq!(value(&state, field::TARGET_HEATING_COOLING_STATE), Some(3));
    }

    #[test]
    fn test_switch_on_without_known_mode() {
        let mut state = MemoryState::new();
        translator()
            .on_bus_change(&mut state, field::ON_OFF, None, &FieldValue::Boolean(true))
            .unwrap();
        assert!(state.values().is_empty());
    }

    #[test]
    fn test_equal_temperatures_mean_off() {
        let mut state = running(21.0, 21.0);
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(1));

        translator()
            .on_bus_change(
                &mut state,
                field::CURRENT_TEMPERATURE,
                Some(&FieldValue::Float(21.0)),
                &FieldValue::Float(21.0),
            )
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(0));
    }

    #[test]
    fn test_colder_than_target_heats() {
        let mut state = running(18.0, 22.0);
        translator()
            .on_bus_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Float(18.0))
            .unwrap();
        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(1));
    }

    #[test]
    fn test_warmer_than_target_cools() {
        let mut state = running(25.0, 22.0);
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(2));

        translator()
            .on_bus_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Float(25.0))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(2));
    }

    #[test]
    fn test_warmer_than_target_keeps_heating() {
        let mut state = running(25.0, 22.0);
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(1));

        translator()
            .on_bus_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Float(25.0))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(1));
    }

    #[test]
    fn test_fan_mode_counts_as_heating() {
        let mut state = running(25.0, 22.0);
        state.record_bus_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(9));
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(2));

        translator()
            .on_bus_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Float(25.0))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(1));
    }

    #[test]
    fn test_unit_off_derives_off() {
        let mut state = running(18.0, 22.0);
        state.record_bus_value(field::ON_OFF, FieldValue::Boolean(false));

        translator()
            .on_bus_change(&mut state, field::TARGET_TEMPERATURE, None, &FieldValue::Float(22.0))
            .unwrap();

        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(0));
    }

    #[test]
    fn test_target_temperature_uses_both_operands() {
        let mut state = running(18.0, 16.0);
        state.set_value(field::CURRENT_HEATING_COOLING_STATE, FieldValue::Integer(2));

        translator()
            .on_bus_change(&mut state, field::TARGET_TEMPERATURE, None, &FieldValue::Float(23.5))
            .unwrap();

        assert_eq!(
            state.get_value(field::TARGET_TEMPERATURE),
            Some(FieldValue::Float(23.5))
        );
        assert_eq!(value(&state, field::CURRENT_HEATING_COOLING_STATE), Some(1));
    }

    #[test]
    fn test_missing_target_skips_derivation() {
        let mut state = MemoryState::new();
        state.record_bus_value(field::ON_OFF, FieldValue::Boolean(true));

        translator()
            .on_bus_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Integer(19))
            .unwrap();

        assert_eq!(
            state.get_value(field::CURRENT_TEMPERATURE),
            Some(FieldValue::Float(19.0))
        );
        assert_eq!(state.get_value(field::CURRENT_HEATING_COOLING_STATE), None);
    }

    #[test]
    fn test_accessory_target_state_writes() {
        let cases: [(i64, Vec<BusWrite>); 4] = [
            (0, vec![BusWrite::new(field::ON_OFF, false, Dpt::Dpt1)]),
            (
                1,
                vec![
                    BusWrite::new(field::ON_OFF, true, Dpt::Dpt1),
                    BusWrite::new(field::TARGET_HEATING_COOLING_STATE, 1i64, Dpt::Dpt5),
                ],
            ),
            (
                2,
                vec![
                    BusWrite::new(field::ON_OFF, true, Dpt::Dpt1),
                    BusWrite::new(field::TARGET_HEATING_COOLING_STATE, 3i64, Dpt::Dpt5),
                ],
            ),
            (
                3,
                vec![
                    BusWrite::new(field::ON_OFF, true, Dpt::Dpt1),
                    BusWrite::new(field::TARGET_HEATING_COOLING_STATE, 0i64, Dpt::Dpt5),
                ],
            ),
        ];

        for (homekit, expected) in cases {
            let mut state = MemoryState::new();
            translator()
                .on_accessory_change(
                    &mut state,
                    field::TARGET_HEATING_COOLING_STATE,
                    None,
                    &FieldValue::Integer(homekit),
                )
                .unwrap();
            assert_eq!(state.bus_writes(), expected.as_slice(), "homekit state {}", homekit);
        }
    }

    #[test]
    fn test_accessory_unmapped_state_is_ignored() {
        let mut state = MemoryState::new();
        translator()
            .on_accessory_change(
                &mut state,
                field::TARGET_HEATING_COOLING_STATE,
                None,
                &FieldValue::Integer(7),
            )
            .unwrap();
        assert!(state.bus_writes().is_empty());
    }

    #[test]
    fn test_accessory_status_fields_are_not_written() {
        let mut state = MemoryState::new();
        let t = translator();
        t.on_accessory_change(
            &mut state,
            field::CURRENT_HEATING_COOLING_STATE,
            None,
            &FieldValue::Integer(1),
        )
        .unwrap();
        t.on_accessory_change(&mut state, field::CURRENT_TEMPERATURE, None, &FieldValue::Float(20.0))
            .unwrap();
        assert!(state.bus_writes().is_empty());
    }

    #[test]
    fn test_accessory_target_temperature_passthrough() {
        let mut state = MemoryState::new();
        translator()
            .on_accessory_change(&mut state, field::TARGET_TEMPERATURE, None, &FieldValue::Float(21.5))
            .unwrap();
        assert_eq!(
            state.bus_writes(),
            &[BusWrite::new(field::TARGET_TEMPERATURE, 21.5, Dpt::Dpt9)]
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut state = MemoryState::new();
        let t = translator();
        t.on_bus_change(&mut state, "FilterLifeLevel", None, &FieldValue::Integer(3))
            .unwrap();
        t.on_accessory_change(&mut state, "FilterLifeLevel", None, &FieldValue::Integer(3))
            .unwrap();
        assert!(state.values().is_empty());
        assert!(state.bus_writes().is_empty());
    }
}
