//! Embeddable calendar widget runtime.
//!
//! [`SyncController`] keeps a [`CalendarView`] in step with data pushed by a
//! host application and reports user interaction back through a
//! [`HostBridge`].

pub mod bridge;
pub mod controller;
pub mod error_mapping;
pub mod interaction;
pub mod state;
pub mod tooltip;
pub mod view;

pub use bridge::{BridgeError, HostBridge, HostCall};
pub use controller::SyncController;
pub use interaction::{range_parameter, ClickPayload};
pub use state::ViewState;
pub use tooltip::tooltip_text;
pub use view::{CalendarView, EventSource, MemoryView, ViewOptions};
