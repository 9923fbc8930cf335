use crate::dtos::{SystemRequest, SystemResponse};
use crate::handlers::clients::client_not_found;
use crate::models::{System, SystemDetails};
use crate::services::DeleteSummary;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub async fn create_system(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SystemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.repository.get_client(&client_id).await?.is_none() {
        return Err(client_not_found(&client_id));
    }

    let system = System::new(client_id, SystemDetails::from(request));
    state.repository.create_system(&system).await?;
    Ok((StatusCode::CREATED, Json(SystemResponse::from(system))))
}

pub async fn list_systems(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<SystemResponse>>, AppError> {
    if state.repository.get_client(&client_id).await?.is_none() {
        return Err(client_not_found(&client_id));
    }

    let systems = state.repository.list_systems(&client_id).await?;
    Ok(Json(systems.into_iter().map(SystemResponse::from).collect()))
}

pub async fn update_system(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<SystemRequest>,
) -> Result<Json<SystemResponse>, AppError> {
    let system = state
        .repository
        .update_system(&id, &SystemDetails::from(request))
        .await?
        .ok_or_else(|| system_not_found(&id))?;
    Ok(Json(SystemResponse::from(system)))
}

/// Removes the system and its cost records.
pub async fn delete_system(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSummary>, AppError> {
    let summary = state
        .repository
        .delete_system(&id)
        .await?
        .ok_or_else(|| system_not_found(&id))?;
    Ok(Json(summary))
}

pub(crate) fn system_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("System {} not found", id))
}
