//! Plain-text rendering of a controller snapshot.

use std::fmt::Write as _;

use client_core::ControllerSnapshot;
use shared::domain::{Record, NOT_AVAILABLE, NO_TYPE};

/// One line of the page listing.
pub fn render_record(record: &Record) -> String {
    let mut line = format!(
        "#{:<4} {} - {}, {}, {}, {}",
        record.id().0,
        record.name(),
        record.status(),
        record.species(),
        record.type_or(NO_TYPE),
        record.gender()
    );
    if let Some(image) = record.image_url() {
        let _ = write!(line, " <{image}>");
    }
    line
}

pub fn render_detail(record: &Record) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", record.name(), record.id().0);
    match record.image_url() {
        Some(image) => {
            let _ = writeln!(out, "Image:   {image}");
        }
        None => out.push_str("Image:   (none)\n"),
    }
    let _ = writeln!(out, "Status:  {}", record.status());
    let _ = writeln!(out, "Species: {}", record.species());
    let _ = writeln!(out, "Type:    {}", record.type_or(NOT_AVAILABLE));
    let _ = writeln!(out, "Gender:  {}", record.gender());
    out
}

pub fn render_snapshot(snapshot: &ControllerSnapshot) -> String {
    let mut out = String::new();

    if snapshot.is_loading {
        out.push_str("Loading...\n");
    }

    if let Some(message) = &snapshot.error_message {
        let _ = writeln!(out, "Oops! {message}");
        out.push_str("Press 'r' to try again.\n");
    }

    if snapshot.records.is_empty() && !snapshot.is_loading && snapshot.error_message.is_none() {
        out.push_str("No characters.\n");
    }
    for record in &snapshot.records {
        out.push_str(&render_record(record));
        out.push('\n');
    }

    out.push_str(&navigation_footer(snapshot));
    out
}

fn navigation_footer(snapshot: &ControllerSnapshot) -> String {
    let previous = if snapshot.has_previous() {
        "[p] previous"
    } else {
        "(first page)"
    };
    let next = if snapshot.has_next() {
        "[n] next"
    } else {
        "(last page)"
    };
    match (snapshot.total_count, snapshot.total_pages) {
        (Some(count), Some(pages)) => {
            format!("{previous} | {next} | {count} characters in {pages} pages\n")
        }
        _ => format!("{previous} | {next}\n"),
    }
}
