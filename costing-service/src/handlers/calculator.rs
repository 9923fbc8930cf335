use crate::models::{CostResult, CostSpecification};
use crate::services::{quote, QuoteSource};
use crate::startup::AppState;
use crate::utils::ApiJson;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Price a specification without storing anything.
pub async fn preview(
    State(state): State<AppState>,
    ApiJson(specification): ApiJson<CostSpecification>,
) -> Result<Json<CostResult>, AppError> {
    let result = quote(
        &specification,
        None,
        state.config.pricing.mismatch_tolerance,
        QuoteSource::Preview,
    )?;
    Ok(Json(result))
}
