use crate::dtos::{ClientRequest, ClientResponse};
use crate::models::{Client, ClientDetails};
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

pub async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client = Client::new(ClientDetails::from(request));
    state.repository.create_client(&client).await?;
    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let clients = state.repository.list_clients().await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .repository
        .get_client(&id)
        .await?
        .ok_or_else(|| client_not_found(&id))?;
    Ok(Json(ClientResponse::from(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .repository
        .update_client(&id, &ClientDetails::from(request))
        .await?
        .ok_or_else(|| client_not_found(&id))?;
    Ok(Json(ClientResponse::from(client)))
}

/// Removes the client together with its systems and their cost records.
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSummary>, AppError> {
    let summary = state
        .repository
        .delete_client(&id)
        .await?
        .ok_or_else(|| client_not_found(&id))?;
    Ok(Json(summary))
}

pub(crate) fn client_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Client {} not found", id))
}
