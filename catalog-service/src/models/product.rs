use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub supplier_id: String,
    pub name: String,
    pub description: String,
    /// Stored image file name (`<uuid>_<original name>`).
    pub image: String,
    pub price: f64,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}
