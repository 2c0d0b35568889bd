use std::cmp::Ordering;

use serde::Serialize;

use crate::{Progress, ScheduledJob, TimelineFilter};

/// One bar on the Gantt chart or one event on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub id: String,
    pub job_id: i64,
    #[serde(rename = "name")]
    pub title: String,
    pub start: String,
    pub end: String,
    pub progress: Progress,
    pub category: Option<String>,
    pub status: Option<String>,
    pub customer: Option<String>,
    pub site: Option<String>,
    pub custom_class: String,
    pub url: String,
}

impl TimelineEntry {
    /// Entry for a single job, or `None` when it has no start date.
    /// A missing end date collapses the entry to a single day.
    pub fn from_job(job: &ScheduledJob) -> Option<Self> {
        let start = job.start()?.to_string();
        let end = job.end().map(str::to_string).unwrap_or_else(|| start.clone());
        let progress = job.progress();

        Some(Self {
            id: format!("job-{}", job.id),
            job_id: job.id,
            title: job_title(job),
            start,
            end,
            progress,
            category: job.category.clone(),
            status: job.status.clone(),
            customer: job.customer_name.clone(),
            site: job.site_name.clone(),
            custom_class: custom_class(job.category.as_deref(), progress),
            url: format!("/gantt/job/{}", job.id),
        })
    }
}

/// "North Well • Job 42", falling back to the description and then to the
/// bare job number.
pub fn job_title(job: &ScheduledJob) -> String {
    let site = job.site_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let description = job.description.as_deref().map(str::trim).filter(|d| !d.is_empty());

    match (site, description) {
        (Some(site), _) => format!("{} \u{2022} Job {}", site, job.job_number),
        (None, Some(description)) => format!("Job {}: {}", job.job_number, description),
        (None, None) => format!("Job {}", job.job_number),
    }
}

/// Ascending by start date with undated jobs last, ties broken by id.
pub fn sort_by_start(jobs: &mut [ScheduledJob]) {
    jobs.sort_by(|a, b| {
        let by_start = match (a.start(), b.start()) {
            (Some(a_start), Some(b_start)) => a_start.cmp(b_start),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_start.then(a.id.cmp(&b.id))
    });
}

/// List view: filtered and ordered, undated jobs included.
pub fn filter_jobs(
    jobs: impl IntoIterator<Item = ScheduledJob>,
    filter: &TimelineFilter,
) -> Vec<ScheduledJob> {
    let mut jobs: Vec<_> = jobs.into_iter().filter(|job| filter.matches(job)).collect();
    sort_by_start(&mut jobs);
    jobs
}

/// Gantt/calendar view: like [`filter_jobs`] but only jobs with both a start
/// and an end date make it into the output.
pub fn timeline(
    jobs: impl IntoIterator<Item = ScheduledJob>,
    filter: &TimelineFilter,
) -> Vec<TimelineEntry> {
    let jobs = filter_jobs(jobs, filter);
    let total = jobs.len();

    let entries: Vec<_> = jobs
        .iter()
        .filter(|job| job.start().is_some() && job.end().is_some())
        .filter_map(TimelineEntry::from_job)
        .collect();

    tracing::debug!(total, kept = entries.len(), "built timeline");
    entries
}

/// `cat-{slug} {progress class}`, or just the progress class when the job
/// has no category.
fn custom_class(category: Option<&str>, progress: Progress) -> String {
    match category.map(slug).filter(|slug| !slug.is_empty()) {
        Some(slug) => format!("cat-{} {}", slug, progress.css_class()),
        None => progress.css_class().to_string(),
    }
}

fn slug(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateWindow;

    fn jobs() -> Vec<ScheduledJob> {
        vec![
            ScheduledJob::new(1, 10, "100")
                .with_site("North Well")
                .with_category("Drilling")
                .with_status("Completed")
                .with_dates(Some("2024-02-01"), Some("2024-02-05")),
            ScheduledJob::new(2, 10, "101")
                .with_site("North Well")
                .with_status("In Progress")
                .with_dates(Some("2024-01-01"), Some("2024-01-10")),
            ScheduledJob::new(3, 11, "102").with_dates(Some("2024-01-15"), None),
            ScheduledJob::new(4, 11, "103").with_dates(None, Some("2024-01-20")),
            ScheduledJob::new(5, 11, "104").with_description("Pump swap"),
        ]
    }

    #[test]
    fn timeline_only_contains_fully_dated_jobs() {
        let entries = timeline(jobs(), &TimelineFilter::default());
        let ids: Vec<_> = entries.iter().map(|e| e.job_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(entries.iter().all(|e| !e.start.is_empty() && !e.end.is_empty()));
    }

    #[test]
    fn list_view_keeps_undated_jobs_last() {
        let ids: Vec<_> = filter_jobs(jobs(), &TimelineFilter::default())
            .iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1, 4, 5]);
    }

    #[test]
    fn entries_carry_progress_and_links() {
        let entries = timeline(jobs(), &TimelineFilter::default());
        let done = entries.iter().find(|e| e.job_id == 1).unwrap();

        assert_eq!(done.id, "job-1");
        assert_eq!(done.title, "North Well \u{2022} Job 100");
        assert_eq!(done.progress.percent(), 100);
        assert_eq!(done.custom_class, "cat-drilling is-done");
        assert_eq!(done.url, "/gantt/job/1");

        let active = entries.iter().find(|e| e.job_id == 2).unwrap();
        assert_eq!(active.progress.percent(), 50);
        assert_eq!(active.custom_class, "is-active");
    }

    #[test]
    fn uncategorized_jobs_only_carry_the_progress_class() {
        let blank = ScheduledJob::new(7, 1, "7")
            .with_category("  ")
            .with_dates(Some("2024-01-01"), Some("2024-01-02"));
        assert_eq!(TimelineEntry::from_job(&blank).unwrap().custom_class, "is-pending");

        let pump = ScheduledJob::new(8, 1, "8")
            .with_category("Pump Service")
            .with_status("done")
            .with_dates(Some("2024-01-01"), Some("2024-01-02"));
        assert_eq!(
            TimelineEntry::from_job(&pump).unwrap().custom_class,
            "cat-pump-service is-done"
        );
    }

    #[test]
    fn window_filter_applies_to_timeline() {
        let filter = TimelineFilter {
            window: DateWindow::parse(Some("2024-01-05"), Some("2024-01-06")).unwrap(),
            ..Default::default()
        };
        let ids: Vec<_> = timeline(jobs(), &filter).iter().map(|e| e.job_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn single_day_entry_when_end_missing() {
        let job = ScheduledJob::new(9, 1, "9").with_dates(Some("2024-03-01"), None);
        let entry = TimelineEntry::from_job(&job).unwrap();
        assert_eq!(entry.end, "2024-03-01");

        let undated = ScheduledJob::new(10, 1, "10");
        assert!(TimelineEntry::from_job(&undated).is_none());
    }

    #[test]
    fn title_falls_back_to_description() {
        let job = ScheduledJob::new(5, 11, "104").with_description("Pump swap");
        assert_eq!(job_title(&job), "Job 104: Pump swap");
        assert_eq!(job_title(&ScheduledJob::new(6, 11, "105")), "Job 105");
    }

    #[test]
    fn entry_json_uses_gantt_field_names() {
        let entries = timeline(jobs(), &TimelineFilter::for_site(10));
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["name"], "North Well \u{2022} Job 101");
        assert_eq!(json["progress"], 50);
        assert_eq!(json["start"], "2024-01-01");
    }
}
