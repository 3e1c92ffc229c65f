//! Fan translation for air-conditioning controllers.

use tracing::{Span, debug, trace};

use knx_homekit_common::{Dpt, FieldValue};

use crate::error::Result;
use crate::state::StateAccessor;
use crate::translator::{Translator, field, require_number};

const FIELDS: &[&str] = &[field::ACTIVE, field::TARGET_FAN_STATE, field::ROTATION_SPEED];

/// Full scale of the 8-bit bus value.
const BUS_MAX: f64 = 255.0;
/// Full scale of the HomeKit percentage.
const PERCENT_MAX: f64 = 100.0;

/// Convert a raw 0..=255 bus speed to a HomeKit percentage.
///
/// Out-of-range inputs are clamped; the result is rounded to the nearest
/// whole percent.
pub fn bus_to_percent(raw: f64) -> i64 {
    (raw.clamp(0.0, BUS_MAX) * PERCENT_MAX / BUS_MAX).round() as i64
}

/// Convert a HomeKit percentage to a raw 0..=255 bus speed.
pub fn percent_to_bus(percent: f64) -> i64 {
    (percent.clamp(0.0, PERCENT_MAX) * BUS_MAX / PERCENT_MAX).round() as i64
}

/// Translator for `Fanv2` services.
#[derive(Debug, Clone)]
pub struct FanTranslator {
    span: Span,
}

impl FanTranslator {
    /// Create a translator logging under a span named after the service.
    pub fn new(service_name: &str) -> Self {
        Self::with_span(tracing::info_span!(
            "translator",
            kind = "fan",
            service = %service_name
        ))
    }

    /// Create a translator logging under the given span.
    pub fn with_span(span: Span) -> Self {
        Self { span }
    }
}

impl Translator for FanTranslator {
    fn kind(&self) -> &'static str {
        "fan"
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
            field::ACTIVE | field::TARGET_FAN_STATE => state.set_value(field, new.clone()),

            field::ROTATION_SPEED => {
                let raw = require_number(field, new)?;
                let percent = bus_to_percent(raw);
                trace!(raw, percent, "Scaled rotation speed");
                state.set_value(field::ROTATION_SPEED, FieldValue::Integer(percent));
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
            field::ACTIVE | field::TARGET_FAN_STATE => {
                state.write_bus(field, new.clone(), Dpt::Dpt1);
            }

            field::ROTATION_SPEED => {
                let percent = require_number(field, new)?;
                let raw = percent_to_bus(percent);
                trace!(percent, raw, "Scaled rotation speed");
                state.write_bus(field::ROTATION_SPEED, FieldValue::Integer(raw), Dpt::Dpt5);
            }

            _ => trace!(field, "Ignoring unknown field"),
        }

        Ok(())
    }
}
