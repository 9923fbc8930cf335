use crate::dtos::{
    CostListParams, CostListResponse, CostResponse, CostSubmission, NewCostRequest,
};
use crate::handlers::systems::system_not_found;
use crate::models::CostRecord;
use crate::services::{quote, CostPage, QuoteSource};
use crate::startup::AppState;
use crate::utils::ApiJson;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Price the submission server-side and store it under `system_id`.
async fn store_submission(
    state: &AppState,
    system_id: String,
    submission: CostSubmission,
) -> Result<CostRecord, AppError> {
    if state.repository.get_system(&system_id).await?.is_none() {
        return Err(system_not_found(&system_id));
    }

    let result = quote(
        &submission.specification,
        submission.result.as_ref(),
        state.config.pricing.mismatch_tolerance,
        QuoteSource::Submission,
    )?;
    let record = CostRecord::new(system_id, &submission.specification, &result);
    state.repository.insert_cost(&record).await?;
    Ok(record)
}

pub async fn create_system_cost(
    State(state): State<AppState>,
    Path(system_id): Path<String>,
    ApiJson(submission): ApiJson<CostSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let record = store_submission(&state, system_id, submission).await?;
    Ok((StatusCode::CREATED, Json(CostResponse::try_from(record)?)))
}

pub async fn create_cost(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewCostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (system_id, submission) = request.into_parts();
    let record = store_submission(&state, system_id, submission).await?;
    Ok((StatusCode::CREATED, Json(CostResponse::try_from(record)?)))
}

pub async fn list_system_costs(
    State(state): State<AppState>,
    Path(system_id): Path<String>,
) -> Result<Json<Vec<CostResponse>>, AppError> {
    if state.repository.get_system(&system_id).await?.is_none() {
        return Err(system_not_found(&system_id));
    }

    let records = state.repository.list_costs_for_system(&system_id).await?;
    let costs = records
        .into_iter()
        .map(CostResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(costs))
}

pub async fn list_costs(
    State(state): State<AppState>,
    Query(params): Query<CostListParams>,
) -> Result<Json<CostListResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);
    let skip = (page - 1)
        .checked_mul(page_size)
        .filter(|skip| i64::try_from(*skip).is_ok())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("page {} is out of range", page)))?;

    let (records, total) = state
        .repository
        .list_costs(
            params.system_id.as_deref(),
            CostPage {
                skip,
                limit: page_size as i64,
            },
        )
        .await?;

    let costs = records
        .into_iter()
        .map(CostResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let total_pages = total.div_ceil(page_size);

    Ok(Json(CostListResponse {
        costs,
        total,
        page,
        page_size,
        total_pages,
    }))
}

pub async fn get_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CostResponse>, AppError> {
    let record = state
        .repository
        .get_cost(&id)
        .await?
        .ok_or_else(|| cost_not_found(&id))?;
    Ok(Json(CostResponse::try_from(record)?))
}

/// Full re-submission: every stored field is recomputed from the new
/// specification. Last write wins.
pub async fn update_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(submission): ApiJson<CostSubmission>,
) -> Result<Json<CostResponse>, AppError> {
    let existing = state
        .repository
        .get_cost(&id)
        .await?
        .ok_or_else(|| cost_not_found(&id))?;

    let result = quote(
        &submission.specification,
        submission.result.as_ref(),
        state.config.pricing.mismatch_tolerance,
        QuoteSource::Submission,
    )?;
    let record = existing.resubmitted(&submission.specification, &result);
    if !state.repository.replace_cost(&record).await? {
        return Err(cost_not_found(&id));
    }

    Ok(Json(CostResponse::try_from(record)?))
}

pub async fn delete_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.repository.delete_cost(&id).await? {
        return Err(cost_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn cost_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Cost record {} not found", id))
}
