//! Database operations for `channel_analyses` and `videos`.
//!
//! An analysis row is written exactly once per successful pipeline run and
//! never mutated afterwards; a re-run of the same channel appends a new row.
//! Video rows are written only after their parent analysis row exists and
//! are removed with it (FK cascade).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row and insert types
// ---------------------------------------------------------------------------

/// A row from the `channel_analyses` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub channel_id: String,
    pub channel_name: String,
    pub channel_url: String,
    pub monthly_revenue: f64,
    pub profit_margin: f64,
    pub mcn_share: f64,
    pub avg_views: i64,
    pub avg_likes: i64,
    pub avg_comments: i64,
    pub engagement_rate: f64,
    pub risk_level: String,
    pub total_subscribers: i64,
    pub subscriber_growth: String,
    pub subscriber_chart: serde_json::Value,
    pub ai_insights: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for an analysis; id and `created_at` are assigned by the
/// database.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_url: String,
    pub monthly_revenue: f64,
    pub profit_margin: f64,
    pub mcn_share: f64,
    pub avg_views: i64,
    pub avg_likes: i64,
    pub avg_comments: i64,
    pub engagement_rate: f64,
    pub risk_level: String,
    pub total_subscribers: i64,
    pub subscriber_growth: String,
    pub subscriber_chart: serde_json::Value,
    pub ai_insights: String,
}

/// A row from the `videos` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub published_at: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_top_video: bool,
}

/// Insert shape for a video row belonging to one analysis.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub published_at: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_top_video: bool,
}

const ANALYSIS_COLUMNS: &str = "id, channel_id, channel_name, channel_url, monthly_revenue, \
     profit_margin, mcn_share, avg_views, avg_likes, avg_comments, engagement_rate, \
     risk_level, total_subscribers, subscriber_growth, subscriber_chart, ai_insights, \
     created_at";

// ---------------------------------------------------------------------------
// channel_analyses operations
// ---------------------------------------------------------------------------

/// Inserts a new analysis row and returns it with its generated id and
/// creation timestamp.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analysis(pool: &PgPool, new: &NewAnalysis) -> Result<AnalysisRow, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        "INSERT INTO channel_analyses \
             (channel_id, channel_name, channel_url, monthly_revenue, profit_margin, \
              mcn_share, avg_views, avg_likes, avg_comments, engagement_rate, risk_level, \
              total_subscribers, subscriber_growth, subscriber_chart, ai_insights) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING id, channel_id, channel_name, channel_url, monthly_revenue, \
             profit_margin, mcn_share, avg_views, avg_likes, avg_comments, engagement_rate, \
             risk_level, total_subscribers, subscriber_growth, subscriber_chart, ai_insights, \
             created_at",
    )
    .bind(&new.channel_id)
    .bind(&new.channel_name)
    .bind(&new.channel_url)
    .bind(new.monthly_revenue)
    .bind(new.profit_margin)
    .bind(new.mcn_share)
    .bind(new.avg_views)
    .bind(new.avg_likes)
    .bind(new.avg_comments)
    .bind(new.engagement_rate)
    .bind(&new.risk_level)
    .bind(new.total_subscribers)
    .bind(&new.subscriber_growth)
    .bind(&new.subscriber_chart)
    .bind(&new.ai_insights)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns all analyses, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_analyses(pool: &PgPool) -> Result<Vec<AnalysisRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
        "SELECT {ANALYSIS_COLUMNS} FROM channel_analyses ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single analysis by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_analysis(pool: &PgPool, id: Uuid) -> Result<Option<AnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(&format!(
        "SELECT {ANALYSIS_COLUMNS} FROM channel_analyses WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent analysis for a channel, or `None` when the
/// channel has never been analyzed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_analysis_for_channel(
    pool: &PgPool,
    channel_id: &str,
) -> Result<Option<AnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(&format!(
        "SELECT {ANALYSIS_COLUMNS} FROM channel_analyses \
         WHERE channel_id = $1 ORDER BY created_at DESC LIMIT 1"
    ))
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes an analysis and, via the FK cascade, all of its video rows.
///
/// Returns `true` when a row was deleted, `false` when the id was unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_analysis(pool: &PgPool, id: Uuid) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM channel_analyses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// videos operations
// ---------------------------------------------------------------------------

/// Inserts all video rows for an existing analysis in one statement.
///
/// Must only be called after the parent analysis insert succeeded. An empty
/// slice is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_videos(
    pool: &PgPool,
    analysis_id: Uuid,
    videos: &[NewVideo],
) -> Result<(), DbError> {
    if videos.is_empty() {
        return Ok(());
    }

    let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
    let titles: Vec<String> = videos.iter().map(|v| v.title.clone()).collect();
    let thumbnails: Vec<String> = videos.iter().map(|v| v.thumbnail.clone()).collect();
    let published: Vec<String> = videos.iter().map(|v| v.published_at.clone()).collect();
    let view_counts: Vec<i64> = videos.iter().map(|v| v.view_count).collect();
    let like_counts: Vec<i64> = videos.iter().map(|v| v.like_count).collect();
    let comment_counts: Vec<i64> = videos.iter().map(|v| v.comment_count).collect();
    let top_flags: Vec<bool> = videos.iter().map(|v| v.is_top_video).collect();

    sqlx::query(
        "INSERT INTO videos \
             (analysis_id, video_id, title, thumbnail, published_at, view_count, \
              like_count, comment_count, is_top_video) \
         SELECT $1, v.* \
         FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], \
                     $6::bigint[], $7::bigint[], $8::bigint[], $9::boolean[]) \
              AS v(video_id, title, thumbnail, published_at, view_count, \
                   like_count, comment_count, is_top_video)",
    )
    .bind(analysis_id)
    .bind(&video_ids)
    .bind(&titles)
    .bind(&thumbnails)
    .bind(&published)
    .bind(&view_counts)
    .bind(&like_counts)
    .bind(&comment_counts)
    .bind(&top_flags)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns all videos for an analysis, highest view count first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_videos_for_analysis(
    pool: &PgPool,
    analysis_id: Uuid,
) -> Result<Vec<VideoRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT id, analysis_id, video_id, title, thumbnail, published_at, view_count, \
                like_count, comment_count, is_top_video \
         FROM videos \
         WHERE analysis_id = $1 \
         ORDER BY view_count DESC",
    )
    .bind(analysis_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
