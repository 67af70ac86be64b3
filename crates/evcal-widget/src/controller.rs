//! Sync controller: applies host call-ins to the live calendar view.
//!
//! Every operation absorbs bad input. Records that cannot be mapped are
//! skipped, unknown ids are ignored, and anything other than Load is a no-op
//! until the view exists.

use std::collections::HashMap;

use chrono::NaiveDate;
use evcal_calendar::payload::try_resolve;
use evcal_calendar::sample::sample_payload;
use evcal_calendar::{
    resolve, CalendarError, EventKind, EventMapper, EventPatch, NormalizedEvent, RawPayload,
    RawRecord, BACKGROUND_ID_PREFIX,
};
use evcal_core::{AppError, Config, HostConfig, MissingDataPolicy};
use serde_json::Value;

use crate::bridge::{HostBridge, HostCall};
use crate::error_mapping::calendar_error;
use crate::interaction::{range_parameter, ClickPayload};
use crate::state::ViewState;
use crate::tooltip::tooltip_text;
use crate::view::{CalendarView, EventSource, ViewOptions};

/// Owns the live view and the snapshot its event source reads.
pub struct SyncController<V: CalendarView> {
    mapper: EventMapper,
    options: ViewOptions,
    missing_data: MissingDataPolicy,
    host: HostConfig,
    snapshot: EventSource,
    view: Option<V>,
    state: ViewState,
    bridge: Option<Box<dyn HostBridge>>,
}

impl<V: CalendarView> SyncController<V> {
    /// Controller with no host bridge attached. Call-outs are only logged.
    pub fn new(config: &Config) -> Self {
        Self {
            mapper: EventMapper::new(config.style.background_color.clone()),
            options: ViewOptions::from(&config.view),
            missing_data: config.data.missing_data,
            host: config.host.clone(),
            snapshot: EventSource::default(),
            view: None,
            state: ViewState::default(),
            bridge: None,
        }
    }

    pub fn with_bridge(mut self, bridge: impl HostBridge + 'static) -> Self {
        self.bridge = Some(Box::new(bridge));
        self
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Source the rendering component pulls from.
    pub fn snapshot(&self) -> &EventSource {
        &self.snapshot
    }

    /// Live items, empty before the first Load.
    pub fn items(&self) -> Vec<NormalizedEvent> {
        self.view.as_ref().map(|v| v.items()).unwrap_or_default()
    }

    /// Route a decoded host call to its operation.
    pub fn dispatch(&mut self, call: HostCall) {
        tracing::info!("Host call: {}", call.name());
        match call {
            HostCall::LoadWidget(payload) => self.load(&payload),
            HostCall::SetData(payload) => self.replace(&payload),
            HostCall::UpdateEvents(payload) => self.merge(&payload),
            HostCall::UpdateData(payload) => self.upsert(&payload),
            HostCall::RemoveEvent(id) => self.remove_event(&id),
            HostCall::RemoveEvents(ids) => self.remove_events(&ids),
        }
    }

    /// Full (re)initialization: map the payload and create a fresh view bound
    /// to it.
    pub fn load(&mut self, payload: &Value) {
        let resolved = self.resolve_for_load(payload);
        let events = map_payload(&self.mapper, &resolved);
        tracing::info!("Loading calendar with {} events", events.len());

        self.snapshot = EventSource::new(events);
        let mut view = V::create(&self.options, self.snapshot.clone());
        view.render();
        self.view = Some(view);
        self.state = self.state.on_load();
    }

    /// Swap the whole contents of an existing view.
    pub fn replace(&mut self, payload: &Value) {
        if !self.state.accepts_updates() {
            tracing::debug!("Ignoring replace: calendar not loaded");
            return;
        }
        let events = map_payload(&self.mapper, &resolve(payload));
        tracing::info!("Replacing calendar contents with {} events", events.len());

        let Some(view) = self.view.as_mut() else {
            return;
        };
        let source = EventSource::new(events);
        view.remove_all_items();
        view.set_event_source(source.clone());
        self.snapshot = source;
    }

    /// Reconcile records one by one against the live view.
    pub fn merge(&mut self, payload: &Value) {
        if !self.state.accepts_updates() {
            tracing::debug!("Ignoring merge: calendar not loaded");
            return;
        }
        let resolved = resolve(payload);
        let Some(view) = self.view.as_mut() else {
            return;
        };

        for record in &resolved.foreground {
            merge_foreground(view, &self.mapper, record);
        }
        for record in &resolved.background {
            merge_background(view, &self.mapper, record);
        }
        self.sync_snapshot();
    }

    /// Overwrite or insert every mapped record. Nothing is deleted.
    pub fn upsert(&mut self, payload: &Value) {
        if !self.state.accepts_updates() {
            tracing::debug!("Ignoring upsert: calendar not loaded");
            return;
        }
        let events = map_payload(&self.mapper, &resolve(payload));
        let Some(view) = self.view.as_mut() else {
            return;
        };

        for event in events {
            match view.get_item_by_id(&event.id).map(|live| live.kind) {
                Some(kind) if kind == event.kind => {
                    let patch = EventPatch::replace_with(&event);
                    view.update_item(&event.id, patch);
                }
                Some(_) => {
                    tracing::debug!(
                        "Skipping {}: id belongs to an event of another kind",
                        event.id
                    );
                }
                None => view.add_item(event),
            }
        }
        self.sync_snapshot();
    }

    pub fn remove_event(&mut self, id: &str) {
        self.remove_events(&[id.to_string()]);
    }

    pub fn remove_events(&mut self, ids: &[String]) {
        let Some(view) = self.active_view("remove") else {
            return;
        };
        for id in ids {
            if view.remove_item(id).is_some() {
                tracing::debug!("Removed event with ID: {}", id);
            }
        }
        self.sync_snapshot();
    }

    /// Report a click on a live item to the host.
    ///
    /// Returns the payload sent, or `None` when no item has `id`.
    pub fn handle_item_click(&self, id: &str) -> Option<ClickPayload> {
        let event = self.view.as_ref()?.get_item_by_id(id)?;
        let payload = ClickPayload::for_event(event);
        match payload.to_json() {
            Ok(parameter) => self.call_host(&self.host.click_script, &parameter),
            Err(e) => tracing::warn!("Could not encode click for {}: {}", id, e),
        }
        Some(payload)
    }

    /// Report a change of the visible range to the host.
    ///
    /// Returns the `MM/DD/YYYY` parameter sent.
    pub fn handle_dates_set(&self, range_start: NaiveDate) -> String {
        let parameter = range_parameter(range_start);
        self.call_host(&self.host.range_script, &parameter);
        parameter
    }

    pub fn tooltip(&self, id: &str) -> Option<String> {
        self.view
            .as_ref()?
            .get_item_by_id(id)
            .map(tooltip_text)
    }

    fn active_view(&mut self, operation: &str) -> Option<&mut V> {
        if !self.state.accepts_updates() {
            tracing::debug!("Ignoring {}: calendar not loaded", operation);
            return None;
        }
        self.view.as_mut()
    }

    /// Keep the snapshot equal to the live view so a re-pull cannot
    /// resurrect removed items.
    fn sync_snapshot(&self) {
        if let Some(view) = &self.view {
            self.snapshot.replace(view.items());
        }
    }

    fn resolve_for_load(&self, payload: &Value) -> RawPayload {
        match try_resolve(payload) {
            Ok(resolved) => resolved,
            Err(CalendarError::UnknownShape) if !is_missing(payload) => {
                tracing::debug!("Payload matched no known shape, loading empty calendar");
                RawPayload::empty()
            }
            Err(e) => {
                if !is_missing(payload) {
                    tracing::warn!("Error parsing event data: {}", calendar_error(e));
                }
                self.missing_data_fallback()
            }
        }
    }

    fn missing_data_fallback(&self) -> RawPayload {
        match self.missing_data {
            MissingDataPolicy::Empty => {
                tracing::info!("No event data provided, loading empty calendar");
                RawPayload::empty()
            }
            MissingDataPolicy::Sample => {
                tracing::info!("No event data provided, loading sample data");
                resolve(&sample_payload())
            }
        }
    }

    fn call_host(&self, script: &str, parameter: &str) {
        let Some(bridge) = &self.bridge else {
            tracing::info!(
                "Host bridge not available, would call script '{}' with: {}",
                script,
                parameter
            );
            return;
        };

        tracing::info!("Calling host script '{}'", script);
        if let Err(e) = bridge.perform_script(script, parameter) {
            let err = AppError::from(e);
            tracing::warn!("{} ({})", err.user_message(), err);
        }
    }
}

fn is_missing(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Map foreground then background records. A later record with an id already
/// seen replaces the earlier one in place.
fn map_payload(mapper: &EventMapper, payload: &RawPayload) -> Vec<NormalizedEvent> {
    let foreground = payload
        .foreground
        .iter()
        .filter_map(|record| mapper.map_foreground(record));
    let background = payload
        .background
        .iter()
        .filter_map(|record| mapper.map_background(record));

    let mut events: Vec<NormalizedEvent> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for event in foreground.chain(background) {
        match index.get(&event.id) {
            Some(&at) => events[at] = event,
            None => {
                index.insert(event.id.clone(), events.len());
                events.push(event);
            }
        }
    }
    events
}

fn merge_foreground<V: CalendarView>(view: &mut V, mapper: &EventMapper, record: &RawRecord) {
    let existing = record.identity().and_then(|id| {
        let kind = view.get_item_by_id(&id)?.kind;
        Some((id, kind))
    });

    let existing = match existing {
        Some((id, EventKind::Background)) => {
            tracing::debug!("Skipping event {}: id belongs to a background event", id);
            return;
        }
        Some((id, EventKind::Foreground)) => Some(id),
        None => None,
    };

    match existing {
        Some(id) if record.is_deleted() => {
            view.remove_item(&id);
            tracing::debug!("Removed deleted event {}", id);
        }
        None if record.is_deleted() => {}
        Some(id) => {
            view.update_item(&id, mapper.foreground_patch(record));
        }
        None => {
            if let Some(event) = mapper.map_foreground(record) {
                view.add_item(event);
            }
        }
    }
}

fn merge_background<V: CalendarView>(view: &mut V, mapper: &EventMapper, record: &RawRecord) {
    if record.is_deleted() {
        if let Some(id) = record
            .identity()
            .map(|id| format!("{}{}", BACKGROUND_ID_PREFIX, id))
        {
            if view.remove_item(&id).is_some() {
                tracing::debug!("Removed deleted background event {}", id);
            }
        }
        return;
    }

    let Some(event) = mapper.map_background(record) else {
        return;
    };
    view.remove_item(&event.id);
    view.add_item(event);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::view::MemoryView;
    use serde_json::json;

    fn controller() -> SyncController<MemoryView> {
        SyncController::new(&Config::default())
    }

    #[test]
    fn test_map_payload_orders_foreground_first() {
        let payload = resolve(&json!({
            "events": [{"id": "1", "start": "7/1/2025 9:00 AM"}],
            "backgroundEvents": [{"id": "1", "date": "7/1/2025"}]
        }));
        let events = map_payload(&EventMapper::default(), &payload);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "bg-1"]);
    }

    #[test]
    fn test_map_payload_later_duplicate_wins_in_place() {
        let payload = resolve(&json!([
            {"id": "a", "name": "First", "start": "7/1/2025 9:00 AM"},
            {"id": "b", "start": "7/2/2025 9:00 AM"},
            {"id": "a", "name": "Second", "start": "7/3/2025 9:00 AM"}
        ]));
        let events = map_payload(&EventMapper::default(), &payload);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "a");
        assert_eq!(events[0].title, "Second");
    }

    #[test]
    fn test_load_activates_view() {
        let mut c = controller();
        assert_eq!(c.state(), ViewState::Uninitialized);
        assert!(c.view().is_none());

        c.load(&json!({"events": [{"id": "1", "start": "7/1/2025 9:00 AM"}]}));
        assert_eq!(c.state(), ViewState::Active);
        assert_eq!(c.view().unwrap().render_count(), 1);
        assert_eq!(c.items().len(), 1);
        assert!(c.view().unwrap().source().shares_snapshot(c.snapshot()));
    }

    #[test]
    fn test_load_null_uses_missing_data_policy() {
        let mut c = controller();
        c.load(&Value::Null);
        assert_eq!(c.state(), ViewState::Active);
        assert!(c.items().is_empty());

        let mut config = Config::default();
        config.data.missing_data = MissingDataPolicy::Sample;
        let mut c: SyncController<MemoryView> = SyncController::new(&config);
        c.load(&json!("not json"));
        assert_eq!(c.items().len(), 6);
    }

    #[test]
    fn test_unknown_shape_never_falls_back_to_sample() {
        let mut config = Config::default();
        config.data.missing_data = MissingDataPolicy::Sample;
        let mut c: SyncController<MemoryView> = SyncController::new(&config);
        c.load(&json!({"records": []}));
        assert!(c.items().is_empty());
    }

    #[test]
    fn test_style_config_colors_background_events() {
        let mut config = Config::default();
        config.style.background_color = "#e3f2fd".into();
        let mut c: SyncController<MemoryView> = SyncController::new(&config);
        c.load(&json!({"events": [], "backgroundEvents": [{"id": "w", "date": "7/1/2025"}]}));
        assert_eq!(c.items()[0].style.background_color, "#e3f2fd");
    }

    #[test]
    fn test_tooltip_for_live_item() {
        let mut c = controller();
        assert!(c.tooltip("1").is_none());
        c.load(&json!([{"id": "1", "name": "Gala", "start": "7/1/2025 9:00 AM"}]));
        assert!(c.tooltip("1").unwrap().starts_with("Gala\n"));
        assert!(c.tooltip("2").is_none());
    }
}
