//! Hover text for live items.

use evcal_calendar::{NormalizedEvent, Timestamp};

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%I:%M %p";

pub fn tooltip_text(event: &NormalizedEvent) -> String {
    if event.is_background() {
        background_tooltip(event)
    } else {
        foreground_tooltip(event)
    }
}

fn foreground_tooltip(event: &NormalizedEvent) -> String {
    let end = event
        .end
        .map(date_time)
        .unwrap_or_else(|| "N/A".to_string());
    let or_na = |field: &Option<String>| field.clone().unwrap_or_else(|| "N/A".to_string());

    [
        event.title.clone(),
        String::new(),
        format!("Start: {}", date_time(event.start)),
        format!("End: {}", end),
        String::new(),
        format!("Manager: {}", or_na(&event.metadata.manager)),
        format!("Status: {}", or_na(&event.metadata.status)),
    ]
    .join("\n")
}

fn background_tooltip(event: &NormalizedEvent) -> String {
    let title = if event.title.is_empty() {
        "Background Event".to_string()
    } else {
        event.title.clone()
    };

    let mut lines = vec![
        title,
        String::new(),
        format!("Start: {}", event.start.format(DATE_FORMAT)),
    ];
    if let Some(end) = event.end {
        lines.push(format!("End: {}", end.format(DATE_FORMAT)));
    }
    if let Some(manager) = &event.metadata.manager {
        lines.push(format!("Manager: {}", manager));
    }
    if let Some(status) = &event.metadata.status {
        lines.push(format!("Status: {}", status));
    }
    lines.join("\n")
}

fn date_time(ts: Timestamp) -> String {
    format!("{} at {}", ts.format(DATE_FORMAT), ts.format(TIME_FORMAT))
}
