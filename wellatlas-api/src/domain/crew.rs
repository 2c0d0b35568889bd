use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Links a crew member to a job for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Assignment {
    pub id: i64,
    pub crew_id: i64,
    pub crew_name: String,
    pub job_id: i64,
    pub job_number: String,
    pub start_date: String,
    pub end_date: String,
    pub role: Option<String>,
}
