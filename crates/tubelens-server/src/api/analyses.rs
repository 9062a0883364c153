use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tubelens_db::{AnalysisRow, VideoRow};

use crate::api::{map_analysis_error, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct CreateAnalysisRequest {
    channel_url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisCreated {
    analysis: AnalysisRow,
    top_videos: Vec<VideoRow>,
    recent_videos: Vec<VideoRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    deleted: bool,
}

/// `POST /api/v1/analyses` — run the full pipeline for one channel URL and
/// return the persisted analysis with both video sets.
pub(super) async fn create_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(payload): Json<CreateAnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let channel_url = payload.channel_url.trim();
    if channel_url.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "channel_url must not be empty",
        ));
    }

    let outcome = state
        .pipeline
        .analyze(channel_url)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: AnalysisCreated {
                analysis: outcome.analysis,
                top_videos: outcome.top_videos,
                recent_videos: outcome.recent_videos,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/analyses` — all stored analyses, newest first.
pub(super) async fn list_analyses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = tubelens_db::list_analyses(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/analyses/{id}/videos` — video rows for one analysis,
/// highest view count first. 404 when the analysis does not exist.
pub(super) async fn list_analysis_videos(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let analysis = tubelens_db::get_analysis(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if analysis.is_none() {
        return Err(ApiError::new(req_id.0, "not_found", "analysis not found"));
    }

    let videos = tubelens_db::list_videos_for_analysis(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: videos,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `DELETE /api/v1/analyses/{id}` — remove an analysis and, via FK cascade,
/// its video rows. 404 when the analysis does not exist.
pub(super) async fn delete_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = tubelens_db::delete_analysis(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "analysis not found"));
    }

    tracing::info!(analysis_id = %id, "analysis deleted");

    Ok(Json(ApiResponse {
        data: Deleted { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
