use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::{Progress, ScheduleError};

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<Date, ScheduleError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ScheduleError::InvalidDate(value.to_string()))
}

/// A job row joined with its site and customer, as read from storage.
///
/// Dates are kept as the text that was stored. Nothing guarantees they are
/// real calendar dates, so comparisons on them are lexical.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: i64,
    pub site_id: i64,
    pub customer_id: Option<i64>,
    pub job_number: String,
    pub site_name: Option<String>,
    pub customer_name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ScheduledJob {
    pub fn new(id: i64, site_id: i64, job_number: impl Into<String>) -> Self {
        Self {
            id,
            site_id,
            job_number: job_number.into(),
            ..Default::default()
        }
    }

    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = start.map(str::to_string);
        self.end_date = end.map(str::to_string);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_site(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    pub fn with_customer(mut self, id: i64, name: impl Into<String>) -> Self {
        self.customer_id = Some(id);
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Start date, treating blank text as absent.
    pub fn start(&self) -> Option<&str> {
        non_blank(self.start_date.as_deref())
    }

    /// End date, treating blank text as absent.
    pub fn end(&self) -> Option<&str> {
        non_blank(self.end_date.as_deref())
    }

    pub fn progress(&self) -> Progress {
        Progress::from_status(self.status.as_deref())
    }

    /// Whole days from start to end. Negative spans are reported as-is.
    pub fn duration_days(&self) -> Option<i64> {
        let start = parse_date(self.start()?).ok()?;
        let end = parse_date(self.end()?).ok()?;
        Some((end - start).whole_days())
    }

    pub fn is_overdue(&self, today: Date) -> bool {
        if self.progress() == Progress::Completed {
            return false;
        }

        self.end()
            .and_then(|end| parse_date(end).ok())
            .is_some_and(|end| end < today)
    }

    pub fn summarize(&self, today: Date) -> JobSummary {
        JobSummary {
            id: self.id,
            site_id: self.site_id,
            site_name: self.site_name.clone(),
            customer_id: self.customer_id,
            customer_name: self.customer_name.clone(),
            job_number: self.job_number.clone(),
            job_category: self.category.clone(),
            status: self.status.clone(),
            description: self.description.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            progress: self.progress(),
            duration_days: self.duration_days(),
            overdue: self.is_overdue(today),
        }
    }
}

/// Flat list-view row. Serves both the JSON jobs listing and the CSV export,
/// so every field must stay a scalar.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: i64,
    pub site_id: i64,
    pub site_name: Option<String>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub job_number: String,
    pub job_category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub progress: Progress,
    pub duration_days: Option<i64>,
    pub overdue: bool,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
