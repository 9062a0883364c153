//! Bounded recent/top video sets and the engagement averages derived from
//! the recent set.

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::types::VideoStat;

/// Default bound for the most-recently-published set.
pub const DEFAULT_RECENT_COUNT: u32 = 10;
/// Default bound for the top-by-views set.
pub const DEFAULT_TOP_COUNT: u32 = 5;

/// The search endpoint cannot answer a tight top-K query, so the top set is
/// fetched as a larger candidate pool ordered by view count and truncated
/// before the statistics fetch.
const TOP_CANDIDATE_POOL: u32 = 50;

/// Rounded per-video means over the recent set. Zero when the set is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementAverages {
    pub avg_views: i64,
    pub avg_likes: i64,
    pub avg_comments: i64,
}

impl YoutubeClient {
    /// Fetches the `count` most recently published videos with statistics,
    /// descending publish time.
    ///
    /// An empty set is a valid state, not an error.
    ///
    /// # Errors
    ///
    /// Propagates [`YoutubeError`] from the search or statistics calls.
    pub async fn fetch_recent_videos(
        &self,
        channel_id: &str,
        count: u32,
    ) -> Result<Vec<VideoStat>, YoutubeError> {
        let ids = self.search_video_ids(channel_id, "date", count).await?;
        self.list_video_stats(&ids).await
    }

    /// Fetches the `count` highest-viewed videos with statistics.
    ///
    /// Pulls up to [`TOP_CANDIDATE_POOL`] candidates ordered by view count
    /// and truncates to `count` before fetching statistics.
    ///
    /// # Errors
    ///
    /// Propagates [`YoutubeError`] from the search or statistics calls.
    pub async fn fetch_top_videos(
        &self,
        channel_id: &str,
        count: u32,
    ) -> Result<Vec<VideoStat>, YoutubeError> {
        let mut ids = self
            .search_video_ids(channel_id, "viewCount", TOP_CANDIDATE_POOL)
            .await?;
        ids.truncate(count as usize);
        self.list_video_stats(&ids).await
    }

    /// Fetches both video sets concurrently. The two fetches have no
    /// ordering dependency between them.
    ///
    /// # Errors
    ///
    /// Propagates the first [`YoutubeError`] from either fetch.
    pub async fn fetch_video_sets(
        &self,
        channel_id: &str,
        recent_count: u32,
        top_count: u32,
    ) -> Result<(Vec<VideoStat>, Vec<VideoStat>), YoutubeError> {
        let (recent, top) = tokio::join!(
            self.fetch_recent_videos(channel_id, recent_count),
            self.fetch_top_videos(channel_id, top_count),
        );
        Ok((recent?, top?))
    }
}

/// Computes rounded per-video means over `videos` (the recent set).
///
/// All three averages are zero when the set is empty.
#[must_use]
pub fn compute_averages(videos: &[VideoStat]) -> EngagementAverages {
    if videos.is_empty() {
        return EngagementAverages {
            avg_views: 0,
            avg_likes: 0,
            avg_comments: 0,
        };
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let mean = |total: i64| -> i64 { (total as f64 / videos.len() as f64).round() as i64 };

    EngagementAverages {
        avg_views: mean(videos.iter().map(|v| v.view_count).sum()),
        avg_likes: mean(videos.iter().map(|v| v.like_count).sum()),
        avg_comments: mean(videos.iter().map(|v| v.comment_count).sum()),
    }
}
