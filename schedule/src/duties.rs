//! Sub-task ("duty") extraction from freeform job notes.
//!
//! Each non-blank line is matched against two fixed forms, in this order:
//!
//! - `Set casing, 2024-03-01, 2024-03-05, Done`
//! - `2024-03-06..2024-03-08 Pump test (In Progress)`
//!
//! Matching is purely lexical. `2024-13-45` is accepted as a date.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Progress;

static CSV_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([^,]+?)\s*,\s*(\d{4}-\d{2}-\d{2})\s*,\s*(\d{4}-\d{2}-\d{2})(?:\s*,\s*(.+?))?\s*$",
    )
    .unwrap()
});
static RANGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\.\.(\d{4}-\d{2}-\d{2})\s+(.+?)(?:\s*\(([^()]*)\))?\s*$")
        .unwrap()
});

/// How a single trimmed line was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch<'a> {
    Csv(DatedLine<'a>),
    Range(DatedLine<'a>),
    Unmatched(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedLine<'a> {
    pub title: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub status: Option<&'a str>,
}

impl<'a> LineMatch<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();

        if let Some(caps) = CSV_LINE.captures(line) {
            return Self::Csv(DatedLine {
                title: caps.get(1).map_or("", |m| m.as_str().trim()),
                start: caps.get(2).map_or("", |m| m.as_str()),
                end: caps.get(3).map_or("", |m| m.as_str()),
                status: non_empty(caps.get(4).map(|m| m.as_str())),
            });
        }

        if let Some(caps) = RANGE_LINE.captures(line) {
            return Self::Range(DatedLine {
                title: caps.get(3).map_or("", |m| m.as_str().trim()),
                start: caps.get(1).map_or("", |m| m.as_str()),
                end: caps.get(2).map_or("", |m| m.as_str()),
                status: non_empty(caps.get(4).map(|m| m.as_str())),
            });
        }

        Self::Unmatched(line)
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched(_))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A derived schedule item. Never stored; the id is positional and only
/// stable while the note order stays the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duty {
    pub id: String,
    #[serde(rename = "name")]
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub status: Option<String>,
    pub progress: Progress,
    pub custom_class: String,
}

impl Duty {
    fn new(index: usize, line: LineMatch<'_>) -> Self {
        let (title, start, end, status) = match line {
            LineMatch::Csv(dated) | LineMatch::Range(dated) => (
                dated.title,
                Some(dated.start.to_string()),
                Some(dated.end.to_string()),
                dated.status.map(str::to_string),
            ),
            LineMatch::Unmatched(raw) => (raw, None, None, None),
        };
        let progress = Progress::from_status(status.as_deref());

        Self {
            id: format!("duty-{}", index),
            title: title.to_string(),
            start,
            end,
            status,
            progress,
            custom_class: format!("duty {}", progress.css_class()),
        }
    }
}

/// What to do with lines that match neither form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedLines {
    /// Emit them as untimed duties.
    Keep,
    /// Skip them.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyParser {
    unmatched: UnmatchedLines,
}

impl DutyParser {
    pub fn new(unmatched: UnmatchedLines) -> Self {
        Self { unmatched }
    }

    /// Note text keeps every line: anything unrecognized becomes an untimed duty.
    pub fn for_notes() -> Self {
        Self::new(UnmatchedLines::Keep)
    }

    /// The description is mostly prose, so only dated lines are taken from it.
    pub fn for_description() -> Self {
        Self::new(UnmatchedLines::Drop)
    }

    /// Lazily parse `sources` in order. Ids count up across all sources and
    /// are assigned after unmatched lines have been dropped.
    pub fn parse<'a, I>(self, sources: I) -> impl Iterator<Item = Duty> + 'a
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: 'a,
    {
        sources
            .into_iter()
            .flat_map(|content: &'a str| content.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(LineMatch::classify)
            .filter(move |line| self.unmatched == UnmatchedLines::Keep || !line.is_unmatched())
            .enumerate()
            .map(|(index, line)| Duty::new(index, line))
    }
}

/// Duties for a job: parsed from its notes (oldest first), or from its
/// description when the notes yield nothing.
pub fn job_duties<'a, I>(notes: I, description: Option<&str>) -> Vec<Duty>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    let duties: Vec<_> = DutyParser::for_notes().parse(notes).collect();
    if !duties.is_empty() {
        return duties;
    }

    match description.filter(|d| !d.trim().is_empty()) {
        Some(description) => DutyParser::for_description().parse([description]).collect(),
        None => duties,
    }
}
