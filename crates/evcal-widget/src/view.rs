//! Boundary to the calendar rendering component.
//!
//! The grid engine itself (layout, drag and drop, view switching) lives behind
//! [`CalendarView`]. [`MemoryView`] keeps the live item set in memory and is
//! what the standalone harness and tests drive.

use std::sync::Arc;

use chrono::NaiveDate;
use evcal_calendar::{EventPatch, NormalizedEvent};
use evcal_core::ViewConfig;
use parking_lot::RwLock;

/// Pull-based event source bound to a rendering component.
///
/// Clones share one snapshot, so the controller can swap its contents and
/// the component sees them on its next pull.
#[derive(Debug, Clone, Default)]
pub struct EventSource {
    events: Arc<RwLock<Vec<NormalizedEvent>>>,
}

impl EventSource {
    pub fn new(events: Vec<NormalizedEvent>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// Current snapshot contents. Never blocks on I/O.
    pub fn pull(&self) -> Vec<NormalizedEvent> {
        self.events.read().clone()
    }

    pub fn replace(&self, events: Vec<NormalizedEvent>) {
        *self.events.write() = events;
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Whether both handles read the same snapshot.
    pub fn shares_snapshot(&self, other: &EventSource) -> bool {
        Arc::ptr_eq(&self.events, &other.events)
    }
}

/// Options handed to the rendering component when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub initial_view: String,
    pub initial_date: Option<NaiveDate>,
    pub editable: bool,
    pub selectable: bool,
    pub day_max_events: Option<u32>,
    pub show_non_current_dates: bool,
    pub fixed_week_count: bool,
    pub display_event_time: bool,
    pub weekends: bool,
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            initial_view: config.initial_view.clone(),
            initial_date: config.initial_date,
            editable: config.editable,
            selectable: config.selectable,
            day_max_events: config.day_max_events,
            show_non_current_dates: config.show_non_current_dates,
            fixed_week_count: config.fixed_week_count,
            display_event_time: config.display_event_time,
            weekends: config.weekends,
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

/// Operations the controller needs from a rendering component.
pub trait CalendarView {
    /// Build a component bound to `source`. Nothing is shown until `render`.
    fn create(options: &ViewOptions, source: EventSource) -> Self
    where
        Self: Sized;

    /// Pull from the bound source and show the result.
    fn render(&mut self);

    /// Bind a new source and pull its events.
    fn set_event_source(&mut self, source: EventSource);

    /// Insert an item; an item with the same id is replaced.
    fn add_item(&mut self, event: NormalizedEvent);

    fn remove_item(&mut self, id: &str) -> Option<NormalizedEvent>;

    fn remove_all_items(&mut self);

    /// Returns false when no item has `id`.
    fn update_item(&mut self, id: &str, patch: EventPatch) -> bool;

    fn get_item_by_id(&self, id: &str) -> Option<&NormalizedEvent>;

    /// Every live item, in display order.
    fn items(&self) -> Vec<NormalizedEvent>;
}

/// In-memory rendering component.
#[derive(Debug)]
pub struct MemoryView {
    options: ViewOptions,
    source: EventSource,
    items: Vec<NormalizedEvent>,
    render_count: usize,
}

impl MemoryView {
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// Number of full pulls from the bound source.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn pull(&mut self) {
        self.items.clear();
        for event in self.source.pull() {
            self.add_item(event);
        }
        self.render_count += 1;
    }
}

impl CalendarView for MemoryView {
    fn create(options: &ViewOptions, source: EventSource) -> Self {
        Self {
            options: options.clone(),
            source,
            items: Vec::new(),
            render_count: 0,
        }
    }

    fn render(&mut self) {
        self.pull();
    }

    fn set_event_source(&mut self, source: EventSource) {
        self.source = source;
        self.pull();
    }

    fn add_item(&mut self, event: NormalizedEvent) {
        match self.position(&event.id) {
            Some(index) => self.items[index] = event,
            None => self.items.push(event),
        }
    }

    fn remove_item(&mut self, id: &str) -> Option<NormalizedEvent> {
        self.position(id).map(|index| self.items.remove(index))
    }

    fn remove_all_items(&mut self) {
        self.items.clear();
    }

    fn update_item(&mut self, id: &str, patch: EventPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    fn get_item_by_id(&self, id: &str) -> Option<&NormalizedEvent> {
        self.items.iter().find(|item| item.id == id)
    }

    fn items(&self) -> Vec<NormalizedEvent> {
        self.items.clone()
    }
}
