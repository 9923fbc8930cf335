use crate::models::{CostRecord, CostResult, CostSpecification};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// A specification to price, optionally with the totals the caller already
/// computed for it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSubmission {
    pub specification: CostSpecification,
    #[serde(default)]
    pub result: Option<CostResult>,
}

/// [`CostSubmission`] addressed to a system by id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCostRequest {
    pub system_id: String,
    pub specification: CostSpecification,
    #[serde(default)]
    pub result: Option<CostResult>,
}

impl NewCostRequest {
    pub fn into_parts(self) -> (String, CostSubmission) {
        (
            self.system_id,
            CostSubmission {
                specification: self.specification,
                result: self.result,
            },
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResponse {
    pub id: String,
    pub system_id: String,
    pub specification: CostSpecification,
    pub result: CostResult,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<CostRecord> for CostResponse {
    type Error = AppError;

    fn try_from(record: CostRecord) -> Result<Self, Self::Error> {
        let specification = record.specification().map_err(|e| {
            tracing::error!(cost_id = %record.id, error = %e, "Stored cost record is corrupt");
            AppError::InternalError(e)
        })?;
        Ok(Self {
            result: record.result(),
            specification,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
            id: record.id,
            system_id: record.system_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CostListParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub system_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostListResponse {
    pub costs: Vec<CostResponse>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}
