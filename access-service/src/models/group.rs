use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenancy boundary. Every resource in the platform is scoped to a group,
/// and every mutation on a group's data goes through a membership rights
/// check first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub business_code: String,
    pub address: String,
    pub domains: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: String, business_code: String, address: String, domains: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            business_code,
            address,
            domains,
            created_at: now,
            updated_at: now,
        }
    }
}
