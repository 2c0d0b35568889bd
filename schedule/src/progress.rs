use serde::{Serialize, Serializer};

/// Visual progress derived from a free-text job or duty status.
///
/// The mapping is fixed: "Done" and "Completed" are finished, "In Progress"
/// is halfway, and every other status (including none at all) has not
/// started. Matching ignores surrounding whitespace and ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Progress {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Progress {
    pub fn from_status(status: Option<&str>) -> Self {
        let Some(status) = status.map(str::trim) else {
            return Self::NotStarted;
        };

        if status.eq_ignore_ascii_case("done") || status.eq_ignore_ascii_case("completed") {
            Self::Completed
        } else if status.eq_ignore_ascii_case("in progress") {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 50,
            Self::Completed => 100,
        }
    }

    /// Class tag used by the Gantt front end to color bars.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::NotStarted => "is-pending",
            Self::InProgress => "is-active",
            Self::Completed => "is-done",
        }
    }
}

impl Serialize for Progress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.percent())
    }
}
