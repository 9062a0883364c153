//! Pure merge of aggregator and normalizer outputs into persistable records.
//! No I/O happens here.

use tubelens_db::{NewAnalysis, NewVideo};
use tubelens_insights::InsightBundle;
use tubelens_youtube::{ChannelIdentity, ChannelSnapshot, EngagementAverages, VideoStat};

/// `round2((avg_likes + avg_comments) / avg_views * 100)`, or `0` when
/// `avg_views` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(averages: EngagementAverages) -> f64 {
    if averages.avg_views <= 0 {
        return 0.0;
    }
    let rate = (averages.avg_likes + averages.avg_comments) as f64 / averages.avg_views as f64
        * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Builds one analysis record and its video rows from the pipeline's three
/// fetch results.
///
/// Every entry of both sets becomes a video row tagged by its source set;
/// a video appearing in both sets yields two rows (duplication across sets
/// is preserved, not deduplicated). Top-tagged rows come first.
#[must_use]
pub fn assemble(
    identity: &ChannelIdentity,
    snapshot: &ChannelSnapshot,
    recent_videos: &[VideoStat],
    top_videos: &[VideoStat],
    averages: EngagementAverages,
    insights: InsightBundle,
) -> (NewAnalysis, Vec<NewVideo>) {
    let analysis = NewAnalysis {
        channel_id: identity.channel_id.clone(),
        channel_name: snapshot.title.clone(),
        channel_url: identity.channel_url.clone(),
        monthly_revenue: insights.monthly_revenue,
        profit_margin: insights.profit_margin,
        mcn_share: insights.mcn_share,
        avg_views: averages.avg_views,
        avg_likes: averages.avg_likes,
        avg_comments: averages.avg_comments,
        engagement_rate: engagement_rate(averages),
        risk_level: insights.risk_level.to_string(),
        total_subscribers: snapshot.subscriber_count,
        subscriber_growth: insights.subscriber_growth,
        subscriber_chart: serde_json::to_value(&insights.subscriber_chart)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new())),
        ai_insights: insights.ai_insights,
    };

    let videos = top_videos
        .iter()
        .map(|v| video_record(v, true))
        .chain(recent_videos.iter().map(|v| video_record(v, false)))
        .collect();

    (analysis, videos)
}

fn video_record(stat: &VideoStat, is_top_video: bool) -> NewVideo {
    NewVideo {
        video_id: stat.video_id.clone(),
        title: stat.title.clone(),
        thumbnail: stat.thumbnail.clone(),
        published_at: stat.published_at.clone(),
        view_count: stat.view_count,
        like_count: stat.like_count,
        comment_count: stat.comment_count,
        is_top_video,
    }
}
