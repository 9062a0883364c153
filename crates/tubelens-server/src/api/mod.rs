mod analyses;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use tubelens_analysis::{AnalysisError, AnalysisPipeline};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub pipeline: Arc<AnalysisPipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    match error {
        AnalysisError::UnresolvableChannel(_) => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
        AnalysisError::ChannelNotFound(_) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        AnalysisError::PlatformUnavailable(_) => {
            tracing::error!(error = %error, "video platform request failed");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                "video platform unavailable",
            )
        }
        AnalysisError::Persistence(_) => {
            tracing::error!(error = %error, "analysis persistence failed");
            ApiError::new(request_id, "internal_error", "failed to persist analysis")
        }
    }
}

pub(super) fn map_db_error(request_id: String, error: &tubelens_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/analyses",
            get(analyses::list_analyses).post(analyses::create_analysis),
        )
        .route(
            "/api/v1/analyses/{id}",
            axum::routing::delete(analyses::delete_analysis),
        )
        .route(
            "/api/v1/analyses/{id}/videos",
            get(analyses::list_analysis_videos),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match tubelens_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use tubelens_db::NewAnalysis;
    use tubelens_insights::InsightsClient;
    use tubelens_youtube::YoutubeClient;
    use uuid::Uuid;

    /// Pipeline wired to unreachable endpoints; fine for routes that never
    /// call out.
    fn test_state(pool: PgPool) -> AppState {
        let youtube = YoutubeClient::new("test-key", 5).expect("youtube client");
        let insights =
            InsightsClient::new("http://127.0.0.1:9/webhook", 5).expect("insights client");
        let pipeline = AnalysisPipeline::new(youtube, insights, pool.clone(), 10, 5);
        AppState {
            pool,
            pipeline: Arc::new(pipeline),
        }
    }

    fn sample_analysis(channel_id: &str) -> NewAnalysis {
        NewAnalysis {
            channel_id: channel_id.to_owned(),
            channel_name: format!("Channel {channel_id}"),
            channel_url: format!("https://www.youtube.com/channel/{channel_id}"),
            monthly_revenue: 0.0,
            profit_margin: 0.0,
            mcn_share: 0.0,
            avg_views: 100,
            avg_likes: 10,
            avg_comments: 2,
            engagement_rate: 12.0,
            risk_level: "unknown".to_owned(),
            total_subscribers: 5_000,
            subscriber_growth: "n/a".to_owned(),
            subscriber_chart: serde_json::json!([]),
            ai_insights: "No analytics insights are available for this channel.".to_owned(),
        }
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("not_found", StatusCode::NOT_FOUND),
            ("bad_request", StatusCode::BAD_REQUEST),
            ("validation_error", StatusCode::BAD_REQUEST),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("upstream_unavailable", StatusCode::BAD_GATEWAY),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[test]
    fn analysis_errors_map_to_api_codes() {
        use tubelens_youtube::YoutubeError;

        let err = AnalysisError::UnresolvableChannel("https://nope".to_owned());
        assert_eq!(map_analysis_error("r".into(), &err).error.code, "bad_request");

        let err = AnalysisError::ChannelNotFound("UCx".to_owned());
        assert_eq!(map_analysis_error("r".into(), &err).error.code, "not_found");

        let err = AnalysisError::PlatformUnavailable(YoutubeError::Api("boom".to_owned()));
        assert_eq!(
            map_analysis_error("r".into(), &err).error.code,
            "upstream_unavailable"
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: PgPool) {
        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert_eq!(json["data"]["database"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_analyses_returns_newest_first(pool: PgPool) {
        tubelens_db::insert_analysis(&pool, &sample_analysis("UCfirst"))
            .await
            .expect("insert first");
        tubelens_db::insert_analysis(&pool, &sample_analysis("UCsecond"))
            .await
            .expect("insert second");

        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyses")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["channel_id"].as_str(), Some("UCsecond"));
        assert_eq!(data[1]["channel_id"].as_str(), Some("UCfirst"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_analysis_rejects_blank_url(pool: PgPool) {
        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/analyses")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"channel_url": "   "}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analysis_videos_returns_404_for_unknown_id(pool: PgPool) {
        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analyses/{}/videos", Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analysis_videos_returns_rows_ordered_by_views(pool: PgPool) {
        let analysis = tubelens_db::insert_analysis(&pool, &sample_analysis("UCvids"))
            .await
            .expect("insert analysis");
        let videos = vec![
            tubelens_db::NewVideo {
                video_id: "small".to_owned(),
                title: "Small".to_owned(),
                thumbnail: String::new(),
                published_at: "2025-06-01T00:00:00Z".to_owned(),
                view_count: 10,
                like_count: 1,
                comment_count: 0,
                is_top_video: false,
            },
            tubelens_db::NewVideo {
                video_id: "big".to_owned(),
                title: "Big".to_owned(),
                thumbnail: String::new(),
                published_at: "2025-06-02T00:00:00Z".to_owned(),
                view_count: 9_000,
                like_count: 900,
                comment_count: 90,
                is_top_video: true,
            },
        ];
        tubelens_db::insert_videos(&pool, analysis.id, &videos)
            .await
            .expect("insert videos");

        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analyses/{}/videos", analysis.id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["video_id"].as_str(), Some("big"));
        assert_eq!(data[0]["is_top_video"].as_bool(), Some(true));
        assert_eq!(data[1]["video_id"].as_str(), Some("small"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn delete_analysis_returns_404_for_unknown_id(pool: PgPool) {
        let app = build_app(test_state(pool), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/analyses/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn delete_analysis_removes_the_row(pool: PgPool) {
        let analysis = tubelens_db::insert_analysis(&pool, &sample_analysis("UCgone"))
            .await
            .expect("insert analysis");

        let app = build_app(test_state(pool.clone()), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/analyses/{}", analysis.id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let remaining = tubelens_db::get_analysis(&pool, analysis.id)
            .await
            .expect("query");
        assert!(remaining.is_none());
    }
}
