//! iCalendar (RFC 5545) export of timeline entries.
//!
//! Jobs carry dates only, so every event runs 08:00 to 17:00 UTC: from the
//! morning of the first day to the evening of the last.

use time::{macros::format_description, OffsetDateTime, UtcOffset};

use crate::{ScheduleError, TimelineEntry};

const PRODID: &str = "-//WellAtlas//Schedule//EN";
const DAY_START: &str = "T080000Z";
const DAY_END: &str = "T170000Z";
const MAX_LINE_OCTETS: usize = 75;

pub fn render_ics(
    entries: &[TimelineEntry],
    dtstamp: OffsetDateTime,
) -> Result<String, ScheduleError> {
    let stamp = utc_stamp(dtstamp)?;
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for entry in entries {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@wellatlas", entry.id));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(format!("SUMMARY:{}", escape_text(&entry.title)));
        lines.push(format!("DTSTART:{}{}", compact_date(&entry.start), DAY_START));
        lines.push(format!("DTEND:{}{}", compact_date(&entry.end), DAY_END));
        lines.push(format!("DESCRIPTION:{}", escape_text(&describe(entry))));
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    Ok(out)
}

fn describe(entry: &TimelineEntry) -> String {
    let mut parts = Vec::new();
    if let Some(category) = &entry.category {
        parts.push(format!("Category: {}", category));
    }
    if let Some(status) = &entry.status {
        parts.push(format!("Status: {}", status));
    }
    parts.push(entry.url.clone());
    parts.join("\n")
}

/// Dates are taken as stored; only the dashes are removed.
fn compact_date(date: &str) -> String {
    date.trim().replace('-', "")
}

fn utc_stamp(dtstamp: OffsetDateTime) -> Result<String, ScheduleError> {
    dtstamp
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year][month][day]T[hour][minute][second]Z"
        ))
        .map_err(|e| ScheduleError::InvalidTimestamp(e.to_string()))
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Content lines longer than 75 octets continue on the next line after a
/// single leading space. Splits never land inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0;
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        if current + c.len_utf8() > limit {
            folded.push_str("\r\n ");
            current = 0;
            // Continuation lines lose one octet to the leading space.
            limit = MAX_LINE_OCTETS - 1;
        }
        folded.push(c);
        current += c.len_utf8();
    }
    folded
}
