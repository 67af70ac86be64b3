//! Host record and calendar event types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date::Timestamp;
use crate::error::CalendarError;

/// Prefix that keeps background ids apart from foreground ids.
pub const BACKGROUND_ID_PREFIX: &str = "bg-";

/// Untyped record as sent by the host.
///
/// No key is guaranteed; values may arrive as strings, numbers or null.
/// Logical attributes with several spellings are resolved through the
/// accessor methods rather than read directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub entity_id: Option<Value>,
    pub id: Option<Value>,
    pub uuid: Option<Value>,
    pub name: Option<Value>,
    pub title: Option<Value>,
    pub start: Option<Value>,
    pub date_start: Option<Value>,
    pub date: Option<Value>,
    pub end: Option<Value>,
    pub date_end: Option<Value>,
    pub manager: Option<Value>,
    pub status: Option<Value>,
    pub status_num: Option<Value>,
    #[serde(rename = "type")]
    pub event_type: Option<Value>,
    pub entity_type: Option<Value>,
    pub color: Option<Value>,
    pub deleted: Option<Value>,
}

impl RawRecord {
    /// Decode one element of a host record list.
    pub fn from_value(value: &Value) -> Result<Self, CalendarError> {
        if !value.is_object() {
            return Err(CalendarError::NotARecord(value.to_string()));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// `entityId`, then `id`, then `uuid`.
    pub fn identity(&self) -> Option<String> {
        first_text([&self.entity_id, &self.id, &self.uuid])
    }

    /// `name`, then `title`.
    pub fn display_title(&self) -> Option<String> {
        first_text([&self.name, &self.title])
    }

    /// `dateStart`, then `start`.
    pub fn start_text(&self) -> Option<String> {
        first_text([&self.date_start, &self.start])
    }

    /// `dateEnd`, then `end`.
    pub fn end_text(&self) -> Option<String> {
        first_text([&self.date_end, &self.end])
    }

    /// Whether the host flagged this record for removal (`deleted: true`).
    pub fn is_deleted(&self) -> bool {
        matches!(self.deleted, Some(Value::Bool(true)))
    }

    pub fn metadata(&self) -> EventMetadata {
        EventMetadata {
            manager: self.manager.as_ref().and_then(value_text),
            status: self.status.as_ref().and_then(value_text),
            event_type: self.event_type.as_ref().and_then(value_text),
            entity_type: self.entity_type.as_ref().and_then(value_text),
            status_num: self.status_num.clone().filter(|v| !v.is_null()),
            is_background: false,
        }
    }
}

/// Render a scalar JSON value as text. Empty strings count as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn first_text<const N: usize>(candidates: [&Option<Value>; N]) -> Option<String> {
    candidates
        .into_iter()
        .find_map(|candidate| candidate.as_ref().and_then(value_text))
}

/// Whether an event is a real scheduled item or a marker layered behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStyle {
    pub background_color: String,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub manager: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub entity_type: Option<String>,
    /// Kept exactly as sent; the host mixes numbers and strings.
    pub status_num: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_background: bool,
}

/// Event as held by the live calendar view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub all_day: bool,
    pub kind: EventKind,
    pub style: EventStyle,
    pub metadata: EventMetadata,
}

impl NormalizedEvent {
    pub fn is_background(&self) -> bool {
        self.kind == EventKind::Background
    }

    /// Identity as the host knows it, without the background prefix.
    pub fn host_id(&self) -> &str {
        match self.kind {
            EventKind::Background => self
                .id
                .strip_prefix(BACKGROUND_ID_PREFIX)
                .unwrap_or(&self.id),
            EventKind::Foreground => &self.id,
        }
    }

    /// Entity type reported to the host on click.
    pub fn host_entity_type(&self) -> &str {
        match (&self.metadata.entity_type, self.kind) {
            (Some(entity_type), _) => entity_type,
            (None, EventKind::Background) => "BackgroundEvent",
            (None, EventKind::Foreground) => "Event",
        }
    }

    /// Apply the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(manager) = patch.manager {
            self.metadata.manager = manager;
        }
        if let Some(status) = patch.status {
            self.metadata.status = status;
        }
        if let Some(event_type) = patch.event_type {
            self.metadata.event_type = event_type;
        }
        if let Some(entity_type) = patch.entity_type {
            self.metadata.entity_type = entity_type;
        }
        if let Some(status_num) = patch.status_num {
            self.metadata.status_num = status_num;
        }
        self.end = checked_end(self.start, self.end);
    }
}

/// An end at or before the start carries no span and is dropped.
pub fn checked_end(start: Timestamp, end: Option<Timestamp>) -> Option<Timestamp> {
    end.filter(|end| *end > start)
}

/// Partial update for a live event. `None` leaves a field unchanged; for
/// optional fields, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Option<Timestamp>>,
    pub style: Option<EventStyle>,
    pub manager: Option<Option<String>>,
    pub status: Option<Option<String>>,
    pub event_type: Option<Option<String>>,
    pub entity_type: Option<Option<String>>,
    pub status_num: Option<Option<Value>>,
}

impl EventPatch {
    /// Patch that overwrites every field of a live event with `event`.
    pub fn replace_with(event: &NormalizedEvent) -> Self {
        Self {
            title: Some(event.title.clone()),
            start: Some(event.start),
            end: Some(event.end),
            style: Some(event.style.clone()),
            manager: Some(event.metadata.manager.clone()),
            status: Some(event.metadata.status.clone()),
            event_type: Some(event.metadata.event_type.clone()),
            entity_type: Some(event.metadata.entity_type.clone()),
            status_num: Some(event.metadata.status_num.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2025, 7, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_event() -> NormalizedEvent {
        NormalizedEvent {
            id: "42".into(),
            title: "Gala".into(),
            start: at(10),
            end: Some(at(12)),
            all_day: false,
            kind: EventKind::Foreground,
            style: EventStyle {
                background_color: "#6c757d".into(),
                border_color: "#6c757d".into(),
                text_color: Some("#ffffff".into()),
            },
            metadata: EventMetadata::default(),
        }
    }

    #[test]
    fn test_identity_aliases() {
        let record = RawRecord::from_value(&json!({"entityId": "E1", "id": "I1"})).unwrap();
        assert_eq!(record.identity(), Some("E1".into()));

        let record = RawRecord::from_value(&json!({"id": 17})).unwrap();
        assert_eq!(record.identity(), Some("17".into()));

        let record = RawRecord::from_value(&json!({"uuid": "u-9"})).unwrap();
        assert_eq!(record.identity(), Some("u-9".into()));

        let record = RawRecord::from_value(&json!({"entityId": "", "id": "I1"})).unwrap();
        assert_eq!(record.identity(), Some("I1".into()));
    }

    #[test]
    fn test_date_aliases_prefer_date_start() {
        let record = RawRecord::from_value(&json!({
            "start": "7/1/2025 9:00 AM",
            "dateStart": "7/2/2025 9:00 AM",
            "end": "7/1/2025 10:00 AM"
        }))
        .unwrap();
        assert_eq!(record.start_text(), Some("7/2/2025 9:00 AM".into()));
        assert_eq!(record.end_text(), Some("7/1/2025 10:00 AM".into()));
    }

    #[test]
    fn test_non_object_record() {
        let err = RawRecord::from_value(&json!("just a string")).unwrap_err();
        assert!(matches!(err, CalendarError::NotARecord(_)));
    }

    #[test]
    fn test_deleted_flag_requires_true() {
        let record = RawRecord::from_value(&json!({"deleted": true})).unwrap();
        assert!(record.is_deleted());
        let record = RawRecord::from_value(&json!({"deleted": "true"})).unwrap();
        assert!(!record.is_deleted());
    }

    #[test]
    fn test_host_id_strips_background_prefix() {
        let mut event = sample_event();
        assert_eq!(event.host_id(), "42");
        assert_eq!(event.host_entity_type(), "Event");

        event.id = "bg-42".into();
        event.kind = EventKind::Background;
        assert_eq!(event.host_id(), "42");
        assert_eq!(event.host_entity_type(), "BackgroundEvent");
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut event = sample_event();
        event.apply(EventPatch {
            title: Some("Renamed".into()),
            manager: Some(Some("Dana".into())),
            ..Default::default()
        });

        assert_eq!(event.title, "Renamed");
        assert_eq!(event.metadata.manager.as_deref(), Some("Dana"));
        assert_eq!(event.start, at(10));
        assert_eq!(event.end, Some(at(12)));
    }

    #[test]
    fn test_apply_drops_end_before_start() {
        let mut event = sample_event();
        event.apply(EventPatch {
            start: Some(at(13)),
            ..Default::default()
        });
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_replace_with_overwrites_everything() {
        let mut event = sample_event();
        let mut other = sample_event();
        other.title = "Other".into();
        other.end = None;
        other.metadata.status = Some("Paid".into());

        event.apply(EventPatch::replace_with(&other));
        assert_eq!(event, other);
    }
}
