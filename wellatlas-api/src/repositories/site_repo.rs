use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::domain::Site;

use super::repo_error::RepositoryError;

const SITE_COLUMNS: &str = r#"
    SELECT sites.id, sites.customer_id, customers.name AS customer, sites.name,
           sites.description, sites.address, sites.city, sites.state, sites.zip,
           sites.latitude, sites.longitude, sites.notes
    FROM sites
    LEFT JOIN customers ON customers.id = sites.customer_id
"#;

#[async_trait]
pub trait SiteRepository {
    async fn get_sites(&self, filter: &SiteFilter) -> Result<Vec<Site>, RepositoryError>;
    async fn get_site(&self, id: i64) -> Result<Site, RepositoryError>;
    async fn create_site(&self, site: &SiteFields) -> Result<Site, RepositoryError>;
    async fn update_site(&self, id: i64, update: &SiteFields) -> Result<Site, RepositoryError>;
}

pub struct SiteRepositoryImpl {
    pool: SqlitePool,
}

impl SiteRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Default)]
pub struct SiteFilter {
    pub customer_id: Option<i64>,
    /// Substring match on site name, customer name or site description.
    pub query: Option<String>,
}

/// Column values for inserts and partial updates. On update, `None` keeps
/// the stored value; on insert `name` must be set.
#[derive(Debug, Default)]
pub struct SiteFields {
    pub customer_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

#[async_trait]
impl SiteRepository for SiteRepositoryImpl {
    async fn get_sites(&self, filter: &SiteFilter) -> Result<Vec<Site>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(SITE_COLUMNS);
        query.push(" WHERE 1 = 1");

        if let Some(customer_id) = filter.customer_id {
            query.push(" AND sites.customer_id = ").push_bind(customer_id);
        }
        if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let like = format!("%{}%", q);
            query
                .push(" AND (sites.name LIKE ")
                .push_bind(like.clone())
                .push(" OR customers.name LIKE ")
                .push_bind(like.clone())
                .push(" OR sites.description LIKE ")
                .push_bind(like)
                .push(")");
        }
        query.push(" ORDER BY customers.name, sites.name, sites.id");

        let sites = query.build_query_as::<Site>().fetch_all(&self.pool).await?;

        Ok(sites)
    }

    async fn get_site(&self, id: i64) -> Result<Site, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(SITE_COLUMNS);
        query.push(" WHERE sites.id = ").push_bind(id);

        query
            .build_query_as::<Site>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found("site", id))
    }

    async fn create_site(&self, site: &SiteFields) -> Result<Site, RepositoryError> {
        let id = sqlx::query(
            r#"
            INSERT INTO sites (customer_id, name, description, address, city, state, zip, latitude, longitude, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(site.customer_id)
        .bind(&site.name)
        .bind(&site.description)
        .bind(&site.address)
        .bind(&site.city)
        .bind(&site.state)
        .bind(&site.zip)
        .bind(site.latitude)
        .bind(site.longitude)
        .bind(&site.notes)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_site(id).await
    }

    async fn update_site(&self, id: i64, update: &SiteFields) -> Result<Site, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE sites
            SET customer_id = COALESCE(?, customer_id),
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                address = COALESCE(?, address),
                city = COALESCE(?, city),
                state = COALESCE(?, state),
                zip = COALESCE(?, zip),
                latitude = COALESCE(?, latitude),
                longitude = COALESCE(?, longitude),
                notes = COALESCE(?, notes)
            WHERE id = ?
            "#,
        )
        .bind(update.customer_id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.address)
        .bind(&update.city)
        .bind(&update.state)
        .bind(&update.zip)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(&update.notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("site", id));
        }

        self.get_site(id).await
    }
}
