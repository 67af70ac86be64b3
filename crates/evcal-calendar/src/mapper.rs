//! Conversion of host records into calendar events.

use serde_json::Value;

use crate::date::{add_days, normalize, Timestamp};
use crate::error::CalendarError;
use crate::types::{
    checked_end, value_text, EventKind, EventMetadata, EventPatch, EventStyle, NormalizedEvent,
    RawRecord, BACKGROUND_ID_PREFIX,
};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffebee";

const HOLD_COLOR: &str = "#fd7e14";
const CONFIRMED_COLOR: &str = "#e9ecef";
const DEFAULT_COLOR: &str = "#6c757d";

/// Status bucket derived from a record's `statusNum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    /// `1`: quoted or date hold
    Hold,
    /// `2`: confirmed, paid or invoiced
    Confirmed,
    Other,
}

impl StatusTier {
    /// `1` and `"1"` are the same status; so are `2` and `"2"`.
    pub fn from_status_num(status_num: Option<&Value>) -> Self {
        match status_num {
            Some(Value::Number(n)) if n.as_f64() == Some(1.0) => Self::Hold,
            Some(Value::Number(n)) if n.as_f64() == Some(2.0) => Self::Confirmed,
            Some(Value::String(s)) if s == "1" => Self::Hold,
            Some(Value::String(s)) if s == "2" => Self::Confirmed,
            _ => Self::Other,
        }
    }

    pub fn style(self) -> EventStyle {
        let (fill, text) = match self {
            Self::Hold => (HOLD_COLOR, "#ffffff"),
            Self::Confirmed => (CONFIRMED_COLOR, "#000000"),
            Self::Other => (DEFAULT_COLOR, "#ffffff"),
        };
        EventStyle {
            background_color: fill.to_string(),
            border_color: fill.to_string(),
            text_color: Some(text.to_string()),
        }
    }
}

/// Status color policy for foreground events.
pub fn status_style(status_num: Option<&Value>) -> EventStyle {
    StatusTier::from_status_num(status_num).style()
}

/// Maps host records to [`NormalizedEvent`]s.
#[derive(Debug, Clone)]
pub struct EventMapper {
    background_color: String,
}

impl Default for EventMapper {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND_COLOR)
    }
}

impl EventMapper {
    pub fn new(background_color: impl Into<String>) -> Self {
        Self {
            background_color: background_color.into(),
        }
    }

    /// Map a timed event. `None` when the start cannot be parsed.
    pub fn map_foreground(&self, record: &RawRecord) -> Option<NormalizedEvent> {
        self.try_map_foreground(record)
            .map_err(|e| tracing::debug!("Dropping event: {}", e))
            .ok()
    }

    pub fn try_map_foreground(&self, record: &RawRecord) -> Result<NormalizedEvent, CalendarError> {
        let id = foreground_id(record);
        let start_text = record.start_text();
        let start = normalize(start_text.as_deref()).ok_or_else(|| CalendarError::InvalidStart {
            id: id.clone(),
            value: start_text.clone(),
        })?;
        let end = checked_end(start, normalize(record.end_text().as_deref()));

        let metadata = record.metadata();
        Ok(NormalizedEvent {
            id,
            title: record.display_title().unwrap_or_default(),
            start,
            end,
            all_day: false,
            kind: EventKind::Foreground,
            style: status_style(metadata.status_num.as_ref()),
            metadata,
        })
    }

    /// Map an all-day marker. `None` when the start cannot be parsed.
    pub fn map_background(&self, record: &RawRecord) -> Option<NormalizedEvent> {
        self.try_map_background(record)
            .map_err(|e| tracing::debug!("Dropping background event: {}", e))
            .ok()
    }

    pub fn try_map_background(&self, record: &RawRecord) -> Result<NormalizedEvent, CalendarError> {
        let id = background_id(record);
        let (start, end) = background_span(record);
        let start = start.ok_or_else(|| CalendarError::InvalidStart {
            id: id.clone(),
            value: first_present(&[&record.date, &record.date_start, &record.start]),
        })?;

        let metadata = EventMetadata {
            is_background: true,
            ..record.metadata()
        };
        Ok(NormalizedEvent {
            id,
            title: record.display_title().unwrap_or_default(),
            start,
            end: checked_end(start, end),
            all_day: true,
            kind: EventKind::Background,
            style: EventStyle {
                background_color: record
                    .color
                    .as_ref()
                    .and_then(value_text)
                    .unwrap_or_else(|| self.background_color.clone()),
                border_color: "transparent".to_string(),
                text_color: None,
            },
            metadata,
        })
    }

    /// Fields of a foreground record that are present, as a partial patch.
    ///
    /// A start that is present but unparseable leaves the live start alone.
    pub fn foreground_patch(&self, record: &RawRecord) -> EventPatch {
        let mut patch = EventPatch {
            title: record.display_title(),
            ..Default::default()
        };

        if let Some(text) = record.start_text() {
            patch.start = normalize(Some(text.as_str()));
            if patch.start.is_none() {
                tracing::warn!("Ignoring unparseable start {:?} in update", text);
            }
        }
        if let Some(text) = record.end_text() {
            patch.end = Some(normalize(Some(text.as_str())));
        }

        let present = |field: &Option<Value>| field.is_some();
        let metadata = record.metadata();
        if present(&record.manager) {
            patch.manager = Some(metadata.manager);
        }
        if present(&record.status) {
            patch.status = Some(metadata.status);
        }
        if present(&record.event_type) {
            patch.event_type = Some(metadata.event_type);
        }
        if present(&record.entity_type) {
            patch.entity_type = Some(metadata.entity_type);
        }
        if present(&record.status_num) {
            patch.style = Some(status_style(metadata.status_num.as_ref()));
            patch.status_num = Some(metadata.status_num);
        }

        patch
    }
}

/// Live-view id for a foreground record.
pub fn foreground_id(record: &RawRecord) -> String {
    record.identity().unwrap_or_else(random_id)
}

/// Live-view id for a background record, namespaced with `bg-`.
pub fn background_id(record: &RawRecord) -> String {
    format!(
        "{}{}",
        BACKGROUND_ID_PREFIX,
        record.identity().unwrap_or_else(random_id)
    )
}

fn random_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Resolve start and end of a background record from whichever date keys it
/// carries: `date`, then `dateStart`/`dateEnd`, then `start`/`end`.
fn background_span(record: &RawRecord) -> (Option<Timestamp>, Option<Timestamp>) {
    if let Some(date) = non_blank(&record.date) {
        let start = normalize(Some(format!("{} 12:00 AM", date).as_str()));
        let end = normalize(Some(format!("{} 11:59 PM", date).as_str()));
        return (start, end);
    }

    if let Some(date_start) = non_blank(&record.date_start) {
        let start = normalize(Some(format!("{} 12:00 AM", date_start).as_str()));
        let end = match non_blank(&record.date_end) {
            Some(date_end) if date_end != date_start => {
                // Exclusive end: the whole last day must be covered.
                normalize(Some(format!("{} 11:59 PM", date_end).as_str())).and_then(|end| add_days(end, 1))
            }
            _ => start.and_then(|start| add_days(start, 1)),
        };
        return (start, end);
    }

    let start = normalize(record.start.as_ref().and_then(value_text).as_deref());
    let end = normalize(record.end.as_ref().and_then(value_text).as_deref());
    (start, end)
}

fn non_blank(field: &Option<Value>) -> Option<String> {
    field
        .as_ref()
        .and_then(value_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_present(fields: &[&Option<Value>]) -> Option<String> {
    fields.iter().find_map(|field| field.as_ref().and_then(value_text))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        RawRecord::from_value(&value).unwrap()
    }

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_status_policy() {
        for hold in [json!(1), json!("1")] {
            let style = status_style(Some(&hold));
            assert_eq!(style.background_color, "#fd7e14");
            assert_eq!(style.border_color, "#fd7e14");
            assert_eq!(style.text_color.as_deref(), Some("#ffffff"));
        }
        for confirmed in [json!(2), json!("2")] {
            let style = status_style(Some(&confirmed));
            assert_eq!(style.background_color, "#e9ecef");
            assert_eq!(style.text_color.as_deref(), Some("#000000"));
        }
        for other in [json!(0), json!("3"), json!(null), json!(" 1"), json!(true)] {
            let style = status_style(Some(&other));
            assert_eq!(style.background_color, "#6c757d");
            assert_eq!(style.text_color.as_deref(), Some("#ffffff"));
        }
        assert_eq!(status_style(None).background_color, "#6c757d");
    }

    #[test]
    fn test_map_foreground() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_foreground(&record(json!({
                "entityId": "E-100",
                "name": "Wedding Reception",
                "start": "6/13/2025 12:00 PM",
                "end": "6/13/2025 11:59 PM",
                "manager": "Alex",
                "status": "Hold",
                "type": "Wedding",
                "entityType": "Event",
                "statusNum": "1"
            })))
            .unwrap();

        assert_eq!(event.id, "E-100");
        assert_eq!(event.title, "Wedding Reception");
        assert_eq!(event.start, civil(2025, 6, 13, 12, 0));
        assert_eq!(event.end, Some(civil(2025, 6, 13, 23, 59)));
        assert!(!event.all_day);
        assert_eq!(event.kind, EventKind::Foreground);
        assert_eq!(event.style.background_color, "#fd7e14");
        assert_eq!(event.metadata.manager.as_deref(), Some("Alex"));
        assert_eq!(event.metadata.event_type.as_deref(), Some("Wedding"));
        assert_eq!(event.metadata.status_num, Some(json!("1")));
        assert!(!event.metadata.is_background);
    }

    #[test]
    fn test_foreground_uses_date_start_keys() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_foreground(&record(json!({
                "id": 7,
                "title": "Tasting",
                "dateStart": "7/2/2025 3:00 PM",
                "dateEnd": "7/2/2025 4:00 PM"
            })))
            .unwrap();

        assert_eq!(event.id, "7");
        assert_eq!(event.start, civil(2025, 7, 2, 15, 0));
        assert_eq!(event.end, Some(civil(2025, 7, 2, 16, 0)));
    }

    #[test]
    fn test_foreground_invalid_start_is_dropped() {
        let mapper = EventMapper::default();
        assert!(mapper.map_foreground(&record(json!({"id": "x"}))).is_none());
        assert!(mapper
            .map_foreground(&record(json!({"id": "x", "start": "soon"})))
            .is_none());

        let err = mapper
            .try_map_foreground(&record(json!({"id": "x", "start": "soon"})))
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidStart { .. }));
    }

    #[test]
    fn test_foreground_missing_title_is_empty() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_foreground(&record(json!({"id": "x", "start": "7/1/2025 9:00 AM"})))
            .unwrap();
        assert_eq!(event.title, "");
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_background_single_date() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_background(&record(json!({"entityId": "W1", "date": "7/18/2025"})))
            .unwrap();

        assert_eq!(event.id, "bg-W1");
        assert_eq!(event.start, civil(2025, 7, 18, 0, 0));
        // The `date` path keeps the same-day end, no exclusive-end adjustment.
        assert_eq!(event.end, Some(civil(2025, 7, 18, 23, 59)));
        assert!(event.all_day);
        assert!(event.metadata.is_background);
        assert_eq!(event.style.background_color, "#ffebee");
        assert_eq!(event.style.border_color, "transparent");
    }

    #[test]
    fn test_background_date_start_single_day() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_background(&record(json!({"id": "W2", "dateStart": "7/18/2025", "dateEnd": ""})))
            .unwrap();
        assert_eq!(event.start, civil(2025, 7, 18, 0, 0));
        assert_eq!(event.end, Some(civil(2025, 7, 19, 0, 0)));

        let same_day = mapper
            .map_background(&record(json!({
                "id": "W3",
                "dateStart": "7/18/2025",
                "dateEnd": "7/18/2025"
            })))
            .unwrap();
        assert_eq!(same_day.end, Some(civil(2025, 7, 19, 0, 0)));
    }

    #[test]
    fn test_background_multi_day() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_background(&record(json!({
                "id": "W4",
                "dateStart": "7/1/2025",
                "dateEnd": "7/3/2025"
            })))
            .unwrap();
        assert_eq!(event.start, civil(2025, 7, 1, 0, 0));
        assert_eq!(event.end, Some(civil(2025, 7, 4, 23, 59)));
    }

    #[test]
    fn test_background_traditional_fields() {
        let mapper = EventMapper::new("#e8f5e8");
        let event = mapper
            .map_background(&record(json!({
                "uuid": "bg-3",
                "start": "7/22/2025 12:00 AM",
                "end": "7/27/2025 12:00 AM"
            })))
            .unwrap();
        assert_eq!(event.id, "bg-bg-3");
        assert_eq!(event.start, civil(2025, 7, 22, 0, 0));
        assert_eq!(event.end, Some(civil(2025, 7, 27, 0, 0)));
        assert_eq!(event.style.background_color, "#e8f5e8");
    }

    #[test]
    fn test_background_color_override() {
        let mapper = EventMapper::default();
        let event = mapper
            .map_background(&record(json!({"id": 1, "date": "7/4/2025", "color": "#fff3e0"})))
            .unwrap();
        assert_eq!(event.style.background_color, "#fff3e0");
    }

    #[test]
    fn test_background_without_identity_gets_random_id() {
        let mapper = EventMapper::default();
        let a = mapper.map_background(&record(json!({"date": "7/4/2025"}))).unwrap();
        let b = mapper.map_background(&record(json!({"date": "7/4/2025"}))).unwrap();
        assert!(a.id.starts_with("bg-"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_background_invalid_start_is_dropped() {
        let mapper = EventMapper::default();
        assert!(mapper.map_background(&record(json!({"id": 1}))).is_none());
        assert!(mapper
            .map_background(&record(json!({"id": 1, "date": "someday"})))
            .is_none());
    }

    #[test]
    fn test_foreground_patch_only_present_fields() {
        let mapper = EventMapper::default();
        let patch = mapper.foreground_patch(&record(json!({"id": "E1", "statusNum": 2})));

        assert_eq!(patch.title, None);
        assert_eq!(patch.start, None);
        assert_eq!(patch.end, None);
        assert_eq!(patch.manager, None);
        assert_eq!(patch.status_num, Some(Some(json!(2))));
        assert_eq!(patch.style.unwrap().background_color, "#e9ecef");
    }

    #[test]
    fn test_foreground_patch_unparseable_start() {
        let mapper = EventMapper::default();
        let patch = mapper.foreground_patch(&record(json!({"start": "later"})));
        assert_eq!(patch.start, None);
        assert!(patch.is_empty());
    }
}
