//! Replaying recorded value changes against a service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use knx_homekit_common::{FieldValue, GroupAddress};

use crate::service::{Service, Telegram};

/// Which side of the bridge an event comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Bus,
    Accessory,
}

/// A recorded value change.
///
/// Bus events name either the field or the group address it arrived on;
/// accessory events always name the characteristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub source: EventSource,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub address: Option<GroupAddress>,
    pub value: FieldValue,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub service: String,
    pub events: usize,
    /// Final accessory-side values.
    pub values: BTreeMap<String, FieldValue>,
    /// Telegrams sent to the bus, in order.
    pub telegrams: Vec<Telegram>,
    /// One message per event that failed.
    pub errors: Vec<String>,
}

/// Feed `events` to `service` in order.
///
/// A failing event is recorded and skipped; later events still run.
pub fn replay(service: &mut Service, events: &[ReplayEvent]) -> ReplayReport {
    let mut telegrams = Vec::new();
    let mut errors = Vec::new();

    for (index, event) in events.iter().enumerate() {
        let result = match (event.source, &event.field, event.address) {
            (EventSource::Bus, Some(field), _) => service.bus_update(field, event.value.clone()),
            (EventSource::Bus, None, Some(address)) => service
                .bus_telegram(address, event.value.clone())
                .map(|_| ()),
            (EventSource::Accessory, Some(field), _) => {
                service.accessory_update(field, event.value.clone())
            }
            _ => {
                let message = format!("event {}: missing field or address", index);
                warn!("{}", message);
                errors.push(message);
                continue;
            }
        };

        if let Err(e) = result {
            warn!(event = index, error = %e, "Event failed");
            errors.push(format!("event {}: {}", index, e));
        }

        telegrams.extend(service.take_telegrams());
    }

    info!(
        service = %service.name(),
        events = events.len(),
        telegrams = telegrams.len(),
        errors = errors.len(),
        "Replay finished"
    );

    ReplayReport {
        service: service.name().to_string(),
        events: events.len(),
        values: service.state().values().clone(),
        telegrams,
        errors,
    }
}
