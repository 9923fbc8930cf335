use crate::models::{System, SystemDetails, SystemType};
use crate::utils::not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SystemRequest {
    /// Free-form rating such as `10kW`.
    #[validate(custom(function = "not_blank"))]
    pub system_size: String,
    pub system_type: SystemType,
    #[validate(custom(function = "not_blank"))]
    pub system_location: String,
}

impl From<SystemRequest> for SystemDetails {
    fn from(request: SystemRequest) -> Self {
        Self {
            system_size: request.system_size.trim().to_string(),
            system_type: request.system_type,
            system_location: request.system_location.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemResponse {
    pub id: String,
    pub client_id: String,
    pub system_size: String,
    pub system_type: SystemType,
    pub system_location: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<System> for SystemResponse {
    fn from(system: System) -> Self {
        Self {
            id: system.id,
            client_id: system.client_id,
            system_size: system.system_size,
            system_type: system.system_type,
            system_location: system.system_location,
            created_at: system.created_at.to_rfc3339(),
            updated_at: system.updated_at.to_rfc3339(),
        }
    }
}
