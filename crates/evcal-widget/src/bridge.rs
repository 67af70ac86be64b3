//! Host application bridge.
//!
//! Call-ins arrive as a named call with one JSON payload and are decoded into
//! [`HostCall`]. Call-outs go through a [`HostBridge`], which performs a named
//! host script with a single string parameter.

use evcal_calendar::types::value_text;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Script '{script}' failed: {message}")]
    ScriptFailed { script: String, message: String },

    #[error("Unknown host call: {0}")]
    UnknownCall(String),

    #[error("Invalid argument for {call}: {message}")]
    InvalidArgument { call: String, message: String },

    #[error("Malformed host call: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl BridgeError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ScriptFailed { script, .. } => format!("Host script '{}' failed", script),
            Self::UnknownCall(name) => format!("Unsupported request: {}", name),
            Self::InvalidArgument { call, .. } => format!("Invalid data sent to {}", call),
            Self::Malformed(_) => "Request from the host could not be read".to_string(),
        }
    }
}

/// Outbound channel to the host application.
pub trait HostBridge {
    /// Perform the named host script with one string parameter.
    fn perform_script(&self, script: &str, parameter: &str) -> Result<(), BridgeError>;
}

impl<F> HostBridge for F
where
    F: Fn(&str, &str) -> Result<(), BridgeError>,
{
    fn perform_script(&self, script: &str, parameter: &str) -> Result<(), BridgeError> {
        self(script, parameter)
    }
}

/// A call-in from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// Full (re)initialization
    LoadWidget(Value),
    /// Replace the live view contents
    SetData(Value),
    /// Incremental per-record reconcile, honoring `deleted: true`
    UpdateEvents(Value),
    /// Overwrite-or-insert every record, never deleting
    UpdateData(Value),
    RemoveEvent(String),
    RemoveEvents(Vec<String>),
}

#[derive(Deserialize)]
struct CallEnvelope {
    call: String,
    #[serde(default)]
    payload: Value,
}

impl HostCall {
    /// Decode `{"call": "<name>", "payload": <value>}`.
    pub fn decode(text: &str) -> Result<Self, BridgeError> {
        let envelope: CallEnvelope = serde_json::from_str(text)?;
        Self::from_parts(&envelope.call, envelope.payload)
    }

    pub fn from_parts(name: &str, payload: Value) -> Result<Self, BridgeError> {
        match name {
            "loadWidget" => Ok(Self::LoadWidget(payload)),
            "setData" => Ok(Self::SetData(payload)),
            "updateEvents" => Ok(Self::UpdateEvents(payload)),
            "updateData" => Ok(Self::UpdateData(payload)),
            "removeEvent" => value_text(&payload)
                .map(Self::RemoveEvent)
                .ok_or_else(|| BridgeError::InvalidArgument {
                    call: name.to_string(),
                    message: format!("expected an id, got {}", payload),
                }),
            "removeEvents" => match &payload {
                Value::Array(ids) => Ok(Self::RemoveEvents(
                    ids.iter().filter_map(value_text).collect(),
                )),
                other => Err(BridgeError::InvalidArgument {
                    call: name.to_string(),
                    message: format!("expected an array of ids, got {}", other),
                }),
            },
            other => Err(BridgeError::UnknownCall(other.to_string())),
        }
    }

    /// Host-facing name of the call.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadWidget(_) => "loadWidget",
            Self::SetData(_) => "setData",
            Self::UpdateEvents(_) => "updateEvents",
            Self::UpdateData(_) => "updateData",
            Self::RemoveEvent(_) => "removeEvent",
            Self::RemoveEvents(_) => "removeEvents",
        }
    }
}
