use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use evcal_core::{AppError, Config};
use evcal_widget::{BridgeError, CalendarView, HostCall, MemoryView, SyncController};
use serde_json::{json, Value};

fn main() -> Result<()> {
    evcal_core::init()?;

    let config = load_config(std::env::args().nth(1).as_deref());
    let mut controller: SyncController<MemoryView> =
        SyncController::new(&config).with_bridge(print_callout);

    tracing::info!("Event calendar harness started, reading host calls from stdin");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = handle_line(&mut controller, &line) {
            emit(&json!({"error": e.user_message(), "detail": e.to_string()}))?;
            continue;
        }
        let items = controller.view().map(|v| v.items()).unwrap_or_default();
        emit(&json!({"view": serde_json::to_value(&items)?}))?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

fn load_config(path: Option<&str>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(Path::new(path)).map(|config| {
            let validation = config.validate();
            (config, validation)
        }),
        None => Config::load_validated(),
    };

    match loaded {
        Ok((config, validation)) if validation.is_valid() => config,
        Ok((_, validation)) => {
            tracing::warn!(
                "Invalid configuration, using defaults: {}",
                validation.error_summary()
            );
            Config::default()
        }
        Err(e) => {
            tracing::warn!("{} ({})", e.user_message(), e);
            Config::default()
        }
    }
}

/// Apply one `{"call", "payload"}` line.
///
/// Besides the host calls, `click` (payload: item id) and `datesSet`
/// (payload: `YYYY-MM-DD` range start) simulate user interaction.
fn handle_line(controller: &mut SyncController<MemoryView>, line: &str) -> Result<(), AppError> {
    let envelope: Value = serde_json::from_str(line).map_err(BridgeError::from)?;
    let name = envelope.get("call").and_then(Value::as_str).unwrap_or_default();
    let payload = envelope.get("payload").cloned().unwrap_or(Value::Null);

    match name {
        "click" => {
            let id = payload.as_str().unwrap_or_default();
            if controller.handle_item_click(id).is_none() {
                tracing::info!("No item with id {}", id);
            }
        }
        "datesSet" => {
            let start = payload
                .as_str()
                .and_then(|text| chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
                .ok_or_else(|| BridgeError::InvalidArgument {
                    call: name.to_string(),
                    message: format!("expected YYYY-MM-DD, got {}", payload),
                })?;
            controller.handle_dates_set(start);
        }
        _ => controller.dispatch(HostCall::from_parts(name, payload)?),
    }
    Ok(())
}

fn print_callout(script: &str, parameter: &str) -> Result<(), BridgeError> {
    emit(&json!({"callout": script, "parameter": parameter})).map_err(|e| {
        BridgeError::ScriptFailed {
            script: script.to_string(),
            message: e.to_string(),
        }
    })
}

fn emit(value: &Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", value)?;
    stdout.flush()?;
    Ok(())
}
