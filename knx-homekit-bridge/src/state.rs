//! Value store shared between a translator and the gateway.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use knx_homekit_common::{Dpt, FieldValue};

/// Capability handed to a translator on every call.
///
/// Accessory values are last-write-wins per name; the gateway owns the
/// storage and serializes access when several event sources share it.
pub trait StateAccessor {
    /// Current accessory-side value of a characteristic.
    fn get_value(&self, name: &str) -> Option<FieldValue>;

    /// Update an accessory-side value.
    fn set_value(&mut self, name: &str, value: FieldValue);

    /// Last value observed on the bus for a field.
    fn get_bus_value(&self, name: &str) -> Option<FieldValue>;

    /// Emit a value onto the bus with the given encoding.
    fn write_bus(&mut self, name: &str, value: FieldValue, dpt: Dpt);
}

/// A value queued for the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusWrite {
    /// Field name the value belongs to.
    pub name: String,
    /// The value to send.
    pub value: FieldValue,
    /// Encoding to send it with.
    pub dpt: Dpt,
}

impl BusWrite {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>, dpt: Dpt) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            dpt,
        }
    }
}

/// In-memory [`StateAccessor`] with an ordered outbox of bus writes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryState {
    values: BTreeMap<String, FieldValue>,
    bus_values: BTreeMap<String, FieldValue>,
    writes: Vec<BusWrite>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value received from the bus, returning the previous one.
    pub fn record_bus_value(
        &mut self,
        name: impl Into<String>,
        value: FieldValue,
    ) -> Option<FieldValue> {
        self.bus_values.insert(name.into(), value)
    }

    /// Put back the bus value that `record_bus_value` replaced.
    pub fn restore_bus_value(&mut self, name: &str, previous: Option<FieldValue>) {
        match previous {
            Some(value) => {
                self.bus_values.insert(name.to_string(), value);
            }
            None => {
                self.bus_values.remove(name);
            }
        }
    }

    /// Put back an accessory value, removing it when there was none.
    pub fn restore_value(&mut self, name: &str, previous: Option<FieldValue>) {
        match previous {
            Some(value) => {
                self.values.insert(name.to_string(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    /// Accessory values keyed by characteristic name.
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Last bus values keyed by field name.
    pub fn bus_values(&self) -> &BTreeMap<String, FieldValue> {
        &self.bus_values
    }

    /// Writes emitted so far, oldest first.
    pub fn bus_writes(&self) -> &[BusWrite] {
        &self.writes
    }

    /// Drain the outbox.
    pub fn take_bus_writes(&mut self) -> Vec<BusWrite> {
        std::mem::take(&mut self.writes)
    }
}

impl StateAccessor for MemoryState {
    fn get_value(&self, name: &str) -> Option<FieldValue> {
        self.values.get(name).cloned()
    }

    fn set_value(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    fn get_bus_value(&self, name: &str) -> Option<FieldValue> {
        self.bus_values.get(name).cloned()
    }

    fn write_bus(&mut self, name: &str, value: FieldValue, dpt: Dpt) {
        self.writes.push(BusWrite::new(name, value, dpt));
    }
}
