//! YouTube Data API v3 response types and the domain types distilled from them.
//!
//! The API returns every statistics counter as a JSON *string* (`"12345"`),
//! and omits counters that are disabled or zero. All counter fields are
//! therefore modeled as `Option<String>` and coerced with a zero default.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

/// Envelope for `channels.list`: `{ "items": [ ... ] }`.
///
/// An absent or empty `items` array is how the API reports "no such channel";
/// it is not a deserialization error.
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ChannelStatistics {
    #[serde(default, rename = "subscriberCount")]
    pub subscriber_count: Option<String>,
}

// ---------------------------------------------------------------------------
// search.list
// ---------------------------------------------------------------------------

/// Envelope for `search.list` with `part=id`: items carry only video ids.
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

/// Search results can reference channels or playlists too; only entries with
/// a `videoId` are kept.
#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

/// Envelope for `videos.list` with `part=snippet,statistics`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoStatistics {
    #[serde(default, rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(default, rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(default, rename = "commentCount")]
    pub comment_count: Option<String>,
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Channel display name and subscriber count at fetch time.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    pub channel_id: String,
    pub title: String,
    pub subscriber_count: i64,
}

/// One video's identity and counters, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStat {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub published_at: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
}

/// Coerces a YouTube string counter, treating absence or garbage as zero.
/// A video with no recorded likes/comments is valid, not an error.
pub(crate) fn parse_count(raw: Option<&String>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

impl VideoStat {
    pub(crate) fn from_item(item: VideoItem) -> Self {
        let (title, published_at, thumbnail) = match item.snippet {
            Some(snippet) => (
                snippet.title,
                snippet.published_at,
                snippet.thumbnails.medium.map(|t| t.url).unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        let stats = item.statistics;
        Self {
            video_id: item.id,
            title,
            thumbnail,
            published_at,
            view_count: parse_count(stats.as_ref().and_then(|s| s.view_count.as_ref())),
            like_count: parse_count(stats.as_ref().and_then(|s| s.like_count.as_ref())),
            comment_count: parse_count(stats.as_ref().and_then(|s| s.comment_count.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_coerces_strings() {
        assert_eq!(parse_count(Some(&"12345".to_string())), 12345);
        assert_eq!(parse_count(Some(&"not-a-number".to_string())), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn video_stat_defaults_missing_statistics_to_zero() {
        let item: VideoItem = serde_json::from_value(serde_json::json!({
            "id": "vid1",
            "snippet": {
                "title": "A video",
                "publishedAt": "2025-06-01T00:00:00Z"
            }
        }))
        .expect("deserialize video item");

        let stat = VideoStat::from_item(item);
        assert_eq!(stat.video_id, "vid1");
        assert_eq!(stat.title, "A video");
        assert_eq!(stat.view_count, 0);
        assert_eq!(stat.like_count, 0);
        assert_eq!(stat.comment_count, 0);
    }

    #[test]
    fn video_stat_picks_medium_thumbnail() {
        let item: VideoItem = serde_json::from_value(serde_json::json!({
            "id": "vid2",
            "snippet": {
                "title": "Thumb",
                "publishedAt": "2025-06-01T00:00:00Z",
                "thumbnails": { "medium": { "url": "https://i.ytimg.com/vi/vid2/mq.jpg" } }
            },
            "statistics": { "viewCount": "10", "likeCount": "2", "commentCount": "1" }
        }))
        .expect("deserialize video item");

        let stat = VideoStat::from_item(item);
        assert_eq!(stat.thumbnail, "https://i.ytimg.com/vi/vid2/mq.jpg");
        assert_eq!(stat.view_count, 10);
        assert_eq!(stat.like_count, 2);
        assert_eq!(stat.comment_count, 1);
    }
}
