use super::stored_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemType {
    #[serde(rename = "onGrid")]
    OnGrid,
    #[serde(rename = "offGrid")]
    OffGrid,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl SystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::OnGrid => "onGrid",
            SystemType::OffGrid => "offGrid",
            SystemType::Hybrid => "Hybrid",
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical solar installation belonging to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    #[serde(rename = "_id")]
    pub id: String,
    pub client_id: String,
    pub system_size: String,
    pub system_type: SystemType,
    pub system_location: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDetails {
    pub system_size: String,
    pub system_type: SystemType,
    pub system_location: String,
}

impl System {
    pub fn new(client_id: String, details: SystemDetails) -> Self {
        let now = stored_now();
        Self {
            id: Uuid::new_v4().to_string(),
            client_id,
            system_size: details.system_size,
            system_type: details.system_type,
            system_location: details.system_location,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_type_wire_names() {
        for (system_type, name) in [
            (SystemType::OnGrid, "\"onGrid\""),
            (SystemType::OffGrid, "\"offGrid\""),
            (SystemType::Hybrid, "\"Hybrid\""),
        ] {
            assert_eq!(serde_json::to_string(&system_type).unwrap(), name);
        }
        assert!(serde_json::from_str::<SystemType>("\"hybrid\"").is_err());
    }
}
