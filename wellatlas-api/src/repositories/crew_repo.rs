use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::domain::{Assignment, CrewMember};

use super::repo_error::RepositoryError;

const ASSIGNMENT_COLUMNS: &str = r#"
    SELECT assignments.id, assignments.crew_id, crew_members.name AS crew_name,
           assignments.job_id, jobs.job_number, assignments.start_date,
           assignments.end_date, assignments.role
    FROM assignments
    JOIN crew_members ON crew_members.id = assignments.crew_id
    JOIN jobs ON jobs.id = assignments.job_id
"#;

#[async_trait]
pub trait CrewRepository {
    async fn get_crew(&self) -> Result<Vec<CrewMember>, RepositoryError>;
    async fn get_crew_member(&self, id: i64) -> Result<CrewMember, RepositoryError>;
    async fn create_crew_member(
        &self,
        member: &NewCrewMember,
    ) -> Result<CrewMember, RepositoryError>;
    async fn get_assignments(
        &self,
        scope: AssignmentScope,
    ) -> Result<Vec<Assignment>, RepositoryError>;
    async fn create_assignment(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, RepositoryError>;
}

pub struct CrewRepositoryImpl {
    pool: SqlitePool,
}

impl CrewRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get_assignment(&self, id: i64) -> Result<Assignment, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(ASSIGNMENT_COLUMNS);
        query.push(" WHERE assignments.id = ").push_bind(id);

        query
            .build_query_as::<Assignment>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found("assignment", id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentScope {
    Job(i64),
    Crew(i64),
}

pub struct NewCrewMember {
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

pub struct NewAssignment {
    pub crew_id: i64,
    pub job_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub role: Option<String>,
}

#[async_trait]
impl CrewRepository for CrewRepositoryImpl {
    async fn get_crew(&self) -> Result<Vec<CrewMember>, RepositoryError> {
        let crew = sqlx::query_as::<_, CrewMember>(
            r#"
            SELECT id, name, role, phone
            FROM crew_members
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(crew)
    }

    async fn get_crew_member(&self, id: i64) -> Result<CrewMember, RepositoryError> {
        sqlx::query_as::<_, CrewMember>(
            r#"
            SELECT id, name, role, phone
            FROM crew_members
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("crew member", id))
    }

    async fn create_crew_member(
        &self,
        member: &NewCrewMember,
    ) -> Result<CrewMember, RepositoryError> {
        let member = sqlx::query_as::<_, CrewMember>(
            r#"
            INSERT INTO crew_members (name, role, phone)
            VALUES (?, ?, ?)
            RETURNING id, name, role, phone
            "#,
        )
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    async fn get_assignments(
        &self,
        scope: AssignmentScope,
    ) -> Result<Vec<Assignment>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(ASSIGNMENT_COLUMNS);
        match scope {
            AssignmentScope::Job(job_id) => {
                query.push(" WHERE assignments.job_id = ").push_bind(job_id);
            }
            AssignmentScope::Crew(crew_id) => {
                query.push(" WHERE assignments.crew_id = ").push_bind(crew_id);
            }
        }
        query.push(" ORDER BY assignments.start_date, assignments.id");

        let assignments = query
            .build_query_as::<Assignment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(assignments)
    }

    async fn create_assignment(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, RepositoryError> {
        let id = sqlx::query(
            r#"
            INSERT INTO assignments (crew_id, job_id, start_date, end_date, role)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(assignment.crew_id)
        .bind(assignment.job_id)
        .bind(&assignment.start_date)
        .bind(&assignment.end_date)
        .bind(&assignment.role)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_assignment(id).await
    }
}
