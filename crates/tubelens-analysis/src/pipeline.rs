//! The per-request analysis pipeline.
//!
//! One request, one instance: resolve the channel, fetch metadata, fan out
//! the recent-video, top-video, and insights fetches, join, assemble, and
//! persist. No shared mutable state between concurrent requests; every
//! external call is attempted exactly once.

use sqlx::PgPool;

use tubelens_db::{AnalysisRow, VideoRow};
use tubelens_insights::InsightsClient;
use tubelens_youtube::YoutubeClient;

use crate::assemble::assemble;
use crate::error::AnalysisError;

/// A persisted analysis and its video rows, split back into the two source
/// sets for the caller.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub analysis: AnalysisRow,
    pub top_videos: Vec<VideoRow>,
    pub recent_videos: Vec<VideoRow>,
}

/// Orchestrates one analysis request end to end.
///
/// Both external clients and the pool are injected at construction so the
/// pipeline can be pointed at mock endpoints in tests.
pub struct AnalysisPipeline {
    youtube: YoutubeClient,
    insights: InsightsClient,
    pool: PgPool,
    recent_count: u32,
    top_count: u32,
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(
        youtube: YoutubeClient,
        insights: InsightsClient,
        pool: PgPool,
        recent_count: u32,
        top_count: u32,
    ) -> Self {
        Self {
            youtube,
            insights,
            pool,
            recent_count,
            top_count,
        }
    }

    /// Runs the full pipeline for one channel URL.
    ///
    /// The insights fetch is best-effort and cannot fail the request; the
    /// platform fetches and the persistence writes can, per the taxonomy on
    /// [`AnalysisError`].
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnresolvableChannel`] when the URL matches no
    ///   recognized shape or the lookup finds nothing.
    /// - [`AnalysisError::ChannelNotFound`] when the platform returns no
    ///   channel for the resolved id.
    /// - [`AnalysisError::PlatformUnavailable`] on transport failure against
    ///   the platform API.
    /// - [`AnalysisError::Persistence`] when a write fails after successful
    ///   aggregation; resubmitting creates a new analysis.
    pub async fn analyze(&self, channel_url: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let identity = self.youtube.resolve_channel(channel_url).await?;
        let snapshot = self.youtube.get_channel(&identity.channel_id).await?;

        tracing::info!(
            channel_id = %identity.channel_id,
            subscribers = snapshot.subscriber_count,
            "starting channel analysis"
        );

        // Fan-out: the three fetches are independent; full join before
        // assembly.
        let (recent, top, insights) = tokio::join!(
            self.youtube
                .fetch_recent_videos(&identity.channel_id, self.recent_count),
            self.youtube
                .fetch_top_videos(&identity.channel_id, self.top_count),
            self.insights
                .fetch_insights(&identity.channel_id, snapshot.subscriber_count),
        );
        let recent = recent?;
        let top = top?;

        let averages = tubelens_youtube::compute_averages(&recent);
        let (new_analysis, new_videos) =
            assemble(&identity, &snapshot, &recent, &top, averages, insights);

        // Video rows reference the analysis row; only write them once the
        // parent insert has succeeded.
        let analysis = tubelens_db::insert_analysis(&self.pool, &new_analysis).await?;
        tubelens_db::insert_videos(&self.pool, analysis.id, &new_videos).await?;

        let videos = tubelens_db::list_videos_for_analysis(&self.pool, analysis.id).await?;
        let (top_videos, mut recent_videos): (Vec<VideoRow>, Vec<VideoRow>) =
            videos.into_iter().partition(|v| v.is_top_video);
        // The read-back is view-ranked, which is right for the top set; the
        // recent set is publish time descending.
        recent_videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        tracing::info!(
            analysis_id = %analysis.id,
            channel_id = %analysis.channel_id,
            engagement_rate = analysis.engagement_rate,
            "channel analysis persisted"
        );

        Ok(AnalysisOutcome {
            analysis,
            top_videos,
            recent_videos,
        })
    }
}
