//! Event data model for the embeddable calendar widget.
//!
//! Turns loosely-typed host payloads into normalized calendar events.

pub mod date;
pub mod error;
pub mod mapper;
pub mod payload;
pub mod sample;
pub mod types;

pub use date::{normalize, Timestamp};
pub use error::CalendarError;
pub use mapper::{status_style, EventMapper, StatusTier};
pub use payload::{resolve, resolve_str, PayloadShape, RawPayload};
pub use types::{
    EventKind, EventMetadata, EventPatch, EventStyle, NormalizedEvent, RawRecord,
    BACKGROUND_ID_PREFIX,
};
