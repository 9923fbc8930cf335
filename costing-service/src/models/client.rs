use super::stored_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer owning one or more systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetails {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

impl Client {
    pub fn new(details: ClientDetails) -> Self {
        let now = stored_now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: details.name,
            phone_number: details.phone_number,
            email: details.email,
            address: details.address,
            created_at: now,
            updated_at: now,
        }
    }
}
