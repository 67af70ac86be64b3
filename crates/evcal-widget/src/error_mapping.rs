//! Conversion of widget and calendar failures into [`AppError`].

use crate::bridge::BridgeError;
use evcal_calendar::CalendarError;
use evcal_core::{AppError, DataError, HostError};

impl From<BridgeError> for AppError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::ScriptFailed { script, message } => {
                AppError::Host(HostError::ScriptFailed { script, message })
            }
            BridgeError::UnknownCall(name) => AppError::Host(HostError::UnknownCall(name)),
            BridgeError::InvalidArgument { call, message } => {
                AppError::Data(DataError::InvalidRecord(format!("{}: {}", call, message)))
            }
            BridgeError::Malformed(e) => AppError::Data(DataError::MalformedPayload(e.to_string())),
        }
    }
}

/// Classify a calendar data failure in the application hierarchy.
pub fn calendar_error(e: CalendarError) -> AppError {
    let data = match e {
        CalendarError::MalformedPayload(e) => DataError::MalformedPayload(e.to_string()),
        CalendarError::UnknownShape => DataError::UnknownShape,
        CalendarError::NotARecord(value) => DataError::InvalidRecord(value),
        CalendarError::InvalidStart { id, value } => DataError::InvalidDate(format!(
            "{} (event {})",
            value.as_deref().unwrap_or("missing"),
            id
        )),
    };
    AppError::Data(data)
}
