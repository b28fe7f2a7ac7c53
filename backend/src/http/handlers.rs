//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    DatasetDetailResponse, DatasetListResponse, EquipmentListResponse, EquipmentQuery,
    HealthResponse, UploadResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{DatasetAnalytics, DatasetId, Equipment, EquipmentId, EquipmentPatch};
use crate::db::services as db_services;
use crate::services::{analytics, ingest, report};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Multipart field carrying the CSV file.
const UPLOAD_FIELD: &str = "file";

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Datasets
// =============================================================================

/// GET /v1/datasets
///
/// List all datasets, newest first.
pub async fn list_datasets(State(state): State<AppState>) -> HandlerResult<DatasetListResponse> {
    let datasets = db_services::list_datasets(state.repository.as_ref()).await?;
    let total = datasets.len();
    Ok(Json(DatasetListResponse { datasets, total }))
}

/// POST /v1/upload
///
/// Upload a CSV file in the multipart field `file`. Answers 201 for a new
/// dataset and 200 when identical content was uploaded before.
pub async fn upload_dataset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no filename".to_string()))?;
        ingest::validate_filename(&filename)?;
        let bytes = field.bytes().await?;

        let outcome = ingest::ingest_csv(state.repository.as_ref(), &filename, bytes.to_vec()).await?;
        tracing::info!(
            dataset_id = %outcome.dataset.id,
            created = outcome.created,
            "Processed upload {}",
            filename
        );

        let (status, message) = if outcome.created {
            (StatusCode::CREATED, "File uploaded successfully")
        } else {
            (StatusCode::OK, "Identical file already uploaded")
        };
        return Ok((
            status,
            Json(UploadResponse {
                message: message.to_string(),
                dataset: outcome.dataset,
                dropped_rows: outcome.dropped_rows,
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "No file provided in multipart field '{}'",
        UPLOAD_FIELD
    )))
}

/// GET /v1/datasets/{dataset_id}
///
/// Dataset metadata with every equipment row and its outlier flags.
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<DatasetId>,
) -> HandlerResult<DatasetDetailResponse> {
    let repo = state.repository.as_ref();
    let dataset = db_services::get_dataset(repo, dataset_id).await?;
    let equipment = analytics::list_equipment_with_flags(repo, &state.engine, dataset_id).await?;
    Ok(Json(DatasetDetailResponse { dataset, equipment }))
}

/// GET /v1/datasets/{dataset_id}/analytics
pub async fn get_dataset_analytics(
    State(state): State<AppState>,
    Path(dataset_id): Path<DatasetId>,
) -> HandlerResult<DatasetAnalytics> {
    let result =
        analytics::get_dataset_analytics(state.repository.as_ref(), &state.engine, dataset_id)
            .await?;
    Ok(Json(result))
}

/// GET /v1/datasets/{dataset_id}/report
///
/// Rendered report served as a file download.
pub async fn get_dataset_report(
    State(state): State<AppState>,
    Path(dataset_id): Path<DatasetId>,
) -> Result<Response, AppError> {
    let rendered = report::build_report(
        state.repository.as_ref(),
        &state.engine,
        state.renderer.as_ref(),
        dataset_id,
    )
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", rendered.filename.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, rendered.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}

// =============================================================================
// Equipment
// =============================================================================

/// GET /v1/equipment?dataset_id=
pub async fn list_equipment(
    State(state): State<AppState>,
    Query(query): Query<EquipmentQuery>,
) -> HandlerResult<EquipmentListResponse> {
    let equipment = db_services::list_equipment(state.repository.as_ref(), query.dataset_id).await?;
    let total = equipment.len();
    Ok(Json(EquipmentListResponse { equipment, total }))
}

/// GET /v1/equipment/{equipment_id}
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(equipment_id): Path<EquipmentId>,
) -> HandlerResult<Equipment> {
    let equipment = db_services::get_equipment(state.repository.as_ref(), equipment_id).await?;
    Ok(Json(equipment))
}

/// PUT/PATCH /v1/equipment/{equipment_id}
///
/// Partial update; fields absent from the body keep their value.
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(equipment_id): Path<EquipmentId>,
    Json(patch): Json<EquipmentPatch>,
) -> HandlerResult<Equipment> {
    let updated =
        db_services::update_equipment(state.repository.as_ref(), equipment_id, &patch).await?;
    Ok(Json(updated))
}

/// DELETE /v1/equipment/{equipment_id}
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(equipment_id): Path<EquipmentId>,
) -> Result<StatusCode, AppError> {
    db_services::delete_equipment(state.repository.as_ref(), equipment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
