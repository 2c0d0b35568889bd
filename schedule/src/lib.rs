//! Scheduling logic shared by the calendar, Gantt and export endpoints.
//!
//! Nothing in here touches storage: callers hand over rows and get back
//! normalized timeline entries, duties parsed from note text, or an
//! iCalendar document.

mod duties;
mod error;
mod filter;
mod ics;
mod job;
mod progress;
mod timeline;

pub use duties::*;
pub use error::ScheduleError;
pub use filter::*;
pub use ics::*;
pub use job::*;
pub use progress::Progress;
pub use timeline::*;
