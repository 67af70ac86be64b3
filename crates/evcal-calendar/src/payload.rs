//! Detection of the payload shapes the host sends.
//!
//! Accepted shapes, in priority order:
//! 1. `{"data": {"events": [...], "backgroundEvents": [...]}}`
//! 2. `{"events": [...], "backgroundEvents": [...]}`
//! 3. `[...]` (foreground records only)
//!
//! Anything else resolves to an empty payload. A JSON-encoded string is
//! parsed first.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CalendarError;
use crate::types::RawRecord;

/// Which accepted shape a payload matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Nested,
    Flat,
    Bare,
    Empty,
}

/// Record lists extracted from a host payload, before any mapping.
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub shape: PayloadShape,
    pub foreground: Vec<RawRecord>,
    pub background: Vec<RawRecord>,
}

impl RawPayload {
    pub fn empty() -> Self {
        Self {
            shape: PayloadShape::Empty,
            foreground: Vec::new(),
            background: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foreground.is_empty() && self.background.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sections {
    events: Vec<Value>,
    #[serde(default)]
    background_events: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Nested { data: Sections },
    Flat(Sections),
}

/// Resolve a payload, absorbing every failure into an empty result.
pub fn resolve(payload: &Value) -> RawPayload {
    match try_resolve(payload) {
        Ok(resolved) => resolved,
        Err(CalendarError::UnknownShape) => {
            tracing::debug!("Payload matched no known shape, treating as empty");
            RawPayload::empty()
        }
        Err(e) => {
            tracing::warn!("Error parsing event data: {}", e);
            RawPayload::empty()
        }
    }
}

/// Resolve a payload received as text.
pub fn resolve_str(payload: &str) -> RawPayload {
    resolve(&Value::String(payload.to_string()))
}

/// Resolve a payload, reporting why nothing could be extracted.
pub fn try_resolve(payload: &Value) -> Result<RawPayload, CalendarError> {
    let parsed;
    let payload = match payload {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)?;
            &parsed
        }
        other => other,
    };

    let resolved = match payload {
        Value::Array(items) => RawPayload {
            shape: PayloadShape::Bare,
            foreground: records(items),
            background: Vec::new(),
        },
        Value::Object(_) => {
            match Envelope::deserialize(payload).map_err(|_| CalendarError::UnknownShape)? {
                Envelope::Nested { data } => sections(PayloadShape::Nested, data),
                Envelope::Flat(flat) => sections(PayloadShape::Flat, flat),
            }
        }
        _ => return Err(CalendarError::UnknownShape),
    };

    tracing::debug!(
        "Resolved {:?} payload: {} events, {} background events",
        resolved.shape,
        resolved.foreground.len(),
        resolved.background.len()
    );
    Ok(resolved)
}

fn sections(shape: PayloadShape, sections: Sections) -> RawPayload {
    let background = match &sections.background_events {
        Value::Array(items) => records(items),
        _ => Vec::new(),
    };
    RawPayload {
        shape,
        foreground: records(&sections.events),
        background,
    }
}

/// Decode record objects, skipping entries that are not objects.
fn records(items: &[Value]) -> Vec<RawRecord> {
    items
        .iter()
        .filter_map(|item| {
            RawRecord::from_value(item)
                .map_err(|e| tracing::debug!("Skipping record: {}", e))
                .ok()
        })
        .collect()
}
