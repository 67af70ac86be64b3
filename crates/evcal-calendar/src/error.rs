//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Unrecognized payload shape")]
    UnknownShape,

    #[error("Record is not an object: {0}")]
    NotARecord(String),

    #[error("Unparseable start for record {id}: {value:?}")]
    InvalidStart { id: String, value: Option<String> },
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedPayload(_) => "Calendar data could not be read".to_string(),
            Self::UnknownShape => "Calendar data was in an unexpected format".to_string(),
            Self::NotARecord(_) => "An event entry was not understood".to_string(),
            Self::InvalidStart { id, .. } => format!("Event {} has no valid start date", id),
        }
    }
}
