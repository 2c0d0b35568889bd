use serde::Serialize;
use sqlx::FromRow;

/// A job site, joined with the name of the customer that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Site {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}
