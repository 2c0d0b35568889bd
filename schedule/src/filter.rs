use crate::{job::parse_date, ScheduledJob, ScheduleError};

/// Inclusive date window. A job is admitted when its span intersects the
/// window, not only when the window contains it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateWindow {
    /// Build a window from query input. Blank bounds are ignored and any
    /// other bound has to be a real `YYYY-MM-DD` date.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ScheduleError> {
        Ok(Self {
            start: validated_bound(start)?,
            end: validated_bound(end)?,
        })
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `end >= window.start AND start <= window.end`, compared lexically.
    /// A missing job date never satisfies a bound.
    pub fn overlaps(&self, start: Option<&str>, end: Option<&str>) -> bool {
        let after_start = match (&self.start, end) {
            (None, _) => true,
            (Some(window_start), Some(end)) => end >= window_start.as_str(),
            (Some(_), None) => false,
        };
        let before_end = match (&self.end, start) {
            (None, _) => true,
            (Some(window_end), Some(start)) => start <= window_end.as_str(),
            (Some(_), None) => false,
        };

        after_start && before_end
    }
}

fn validated_bound(value: Option<&str>) -> Result<Option<String>, ScheduleError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date(value).map(|_| Some(value.to_string())),
        None => Ok(None),
    }
}

/// Optional job filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineFilter {
    pub customer_id: Option<i64>,
    pub site_id: Option<i64>,
    /// Exact, case-sensitive match.
    pub category: Option<String>,
    /// Exact, case-sensitive match.
    pub status: Option<String>,
    /// Case-insensitive substring over job number, description, site and customer.
    pub query: Option<String>,
    pub window: DateWindow,
}

impl TimelineFilter {
    pub fn for_site(site_id: i64) -> Self {
        Self {
            site_id: Some(site_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, job: &ScheduledJob) -> bool {
        if self.customer_id.is_some() && job.customer_id != self.customer_id {
            return false;
        }
        if self.site_id.is_some_and(|site_id| job.site_id != site_id) {
            return false;
        }
        if let Some(category) = &self.category {
            if job.category.as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if job.status.as_ref() != Some(status) {
                return false;
            }
        }
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            if !matches_query(job, query) {
                return false;
            }
        }

        self.window.overlaps(job.start(), job.end())
    }
}

fn matches_query(job: &ScheduledJob, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        Some(job.job_number.as_str()),
        job.description.as_deref(),
        job.site_name.as_deref(),
        job.customer_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january_job() -> ScheduledJob {
        ScheduledJob::new(1, 10, "J-100")
            .with_dates(Some("2024-01-01"), Some("2024-01-10"))
            .with_customer(5, "Acme Farms")
            .with_site("North Well")
            .with_category("Drilling")
            .with_status("Scheduled")
    }

    #[test]
    fn window_is_an_overlap_test() {
        let job = january_job();

        let inside = DateWindow::parse(Some("2024-01-05"), Some("2024-01-06")).unwrap();
        assert!(inside.overlaps(job.start(), job.end()));

        let straddling_start = DateWindow::parse(Some("2023-12-01"), Some("2024-01-02")).unwrap();
        assert!(straddling_start.overlaps(job.start(), job.end()));

        let touching_end = DateWindow::parse(Some("2024-01-10"), Some("2024-02-01")).unwrap();
        assert!(touching_end.overlaps(job.start(), job.end()));

        let after = DateWindow::parse(Some("2024-01-11"), None).unwrap();
        assert!(!after.overlaps(job.start(), job.end()));

        let before = DateWindow::parse(None, Some("2023-12-31")).unwrap();
        assert!(!before.overlaps(job.start(), job.end()));
    }

    #[test]
    fn window_rejects_invalid_bounds() {
        assert_eq!(
            DateWindow::parse(Some("2024-13-01"), None),
            Err(ScheduleError::InvalidDate("2024-13-01".to_string()))
        );
        assert!(DateWindow::parse(None, Some("soon")).is_err());
        assert!(DateWindow::parse(Some(""), Some("  ")).unwrap().is_open());
    }

    #[test]
    fn window_never_admits_undated_jobs() {
        let window = DateWindow::parse(Some("2024-01-01"), Some("2024-12-31")).unwrap();
        assert!(!window.overlaps(None, None));
        assert!(DateWindow::default().overlaps(None, None));
    }

    #[test]
    fn filters_combine_with_and() {
        let job = january_job();

        assert!(TimelineFilter::default().matches(&job));
        assert!(TimelineFilter::for_site(10).matches(&job));
        assert!(!TimelineFilter::for_site(11).matches(&job));

        let filter = TimelineFilter {
            customer_id: Some(5),
            category: Some("Drilling".to_string()),
            status: Some("Scheduled".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&job));

        let wrong_status = TimelineFilter {
            status: Some("scheduled".to_string()),
            ..filter.clone()
        };
        assert!(!wrong_status.matches(&job));
    }

    #[test]
    fn query_searches_names_case_insensitively() {
        let job = january_job().with_description("Replace pump");
        for query in ["acme", "NORTH", "pump", "j-100"] {
            let filter = TimelineFilter {
                query: Some(query.to_string()),
                ..Default::default()
            };
            assert!(filter.matches(&job), "{query}");
        }

        let miss = TimelineFilter {
            query: Some("south".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&job));
    }
}
