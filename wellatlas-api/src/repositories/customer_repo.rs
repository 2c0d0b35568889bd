use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::Customer;

use super::repo_error::RepositoryError;

#[async_trait]
pub trait CustomerRepository {
    async fn get_customers(&self) -> Result<Vec<Customer>, RepositoryError>;
    async fn get_customer(&self, id: i64) -> Result<Customer, RepositoryError>;
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError>;
    async fn update_customer(
        &self,
        id: i64,
        update: &UpdateCustomer,
    ) -> Result<Customer, RepositoryError>;
}

pub struct CustomerRepositoryImpl {
    pool: SqlitePool,
}

impl CustomerRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub struct NewCustomer {
    pub name: String,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Default)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn get_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, notes
            FROM customers
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn get_customer(&self, id: i64) -> Result<Customer, RepositoryError> {
        sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, notes
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("customer", id))
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let id = sqlx::query(
            r#"
            INSERT INTO customers (name, notes)
            VALUES (?, ?)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.notes)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_customer(id).await
    }

    async fn update_customer(
        &self,
        id: i64,
        update: &UpdateCustomer,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = COALESCE(?, name),
                notes = COALESCE(?, notes)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("customer", id));
        }

        self.get_customer(id).await
    }
}
