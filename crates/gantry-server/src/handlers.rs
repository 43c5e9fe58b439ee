use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use gantry_core::{RecordId, WorkloadDescriptor, WorkloadRecord};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Gantry",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

// ---- Workload lifecycle ----

pub async fn add_workload(
    State(state): State<AppState>,
    Json(descriptor): Json<WorkloadDescriptor>,
) -> Result<impl IntoResponse, ApiError> {
    descriptor.validate()?;
    let id = state.reconciler.create(&descriptor).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_workload(
    State(state): State<AppState>,
    Json(descriptor): Json<WorkloadDescriptor>,
) -> Result<StatusCode, ApiError> {
    descriptor.validate()?;
    state.reconciler.update(&descriptor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_workload(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.reconciler.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_workload(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<WorkloadRecord>, ApiError> {
    Ok(Json(state.reconciler.find(id).await?))
}

pub async fn find_all_workloads(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkloadRecord>>, ApiError> {
    Ok(Json(state.reconciler.find_all().await?))
}
