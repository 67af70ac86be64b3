//! Payloads for user-interaction call-outs.

use chrono::{Datelike, NaiveDate};
use evcal_calendar::NormalizedEvent;
use serde::Serialize;

/// Parameter of the click script: `{"entityId": ..., "entityType": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickPayload {
    pub entity_id: String,
    pub entity_type: String,
}

impl ClickPayload {
    pub fn for_event(event: &NormalizedEvent) -> Self {
        Self {
            entity_id: event.host_id().to_string(),
            entity_type: event.host_entity_type().to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parameter of the range script: `MM/DD/YYYY` of the first day of the month
/// containing the new visible range start.
pub fn range_parameter(range_start: NaiveDate) -> String {
    first_of_month(range_start).format("%m/%d/%Y").to_string()
}
