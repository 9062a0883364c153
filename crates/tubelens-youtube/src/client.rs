//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API-key management and typed response
//! deserialization. Quota-denied and other API-level failures arrive as
//! non-2xx statuses and surface as [`YoutubeError::Http`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::YoutubeError;
use crate::types::{
    ChannelListResponse, ChannelSnapshot, SearchListResponse, VideoListResponse, VideoStat,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the YouTube Data API v3.
///
/// Manages the HTTP client, API key, and base URL. Use [`YoutubeClient::new`]
/// for production or [`YoutubeClient::with_base_url`] to point at a mock
/// server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production YouTube API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubelens/0.1 (channel-analysis)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends the resource segment instead of replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| YoutubeError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Looks up a channel id by a single filter parameter (`forHandle` or
    /// `forUsername`). Returns `None` when the API reports zero items.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn lookup_channel_id(
        &self,
        param: &str,
        value: &str,
    ) -> Result<Option<String>, YoutubeError> {
        let url = self.build_url("channels", &[("part", "id"), (param, value)])?;
        let body = self.request_json(&url).await?;

        let envelope: ChannelListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("channels({param}={value})"),
                source: e,
            })?;

        Ok(envelope.items.into_iter().next().map(|item| item.id))
    }

    /// Fetches channel metadata (display name, subscriber count) by id.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if the API returns zero items.
    /// - [`YoutubeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelSnapshot, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[("part", "snippet,statistics"), ("id", channel_id)],
        )?;
        let body = self.request_json(&url).await?;

        let envelope: ChannelListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("channels(id={channel_id})"),
                source: e,
            })?;

        let Some(item) = envelope.items.into_iter().next() else {
            return Err(YoutubeError::ChannelNotFound(channel_id.to_owned()));
        };

        Ok(ChannelSnapshot {
            channel_id: item.id,
            title: item.snippet.map(|s| s.title).unwrap_or_default(),
            subscriber_count: crate::types::parse_count(
                item.statistics
                    .as_ref()
                    .and_then(|s| s.subscriber_count.as_ref()),
            ),
        })
    }

    /// Searches a channel's videos and returns their ids in API order.
    ///
    /// `order` is one of the API's search orderings (`date`, `viewCount`).
    /// An empty result set is valid and returns an empty vec.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_video_ids(
        &self,
        channel_id: &str,
        order: &str,
        max_results: u32,
    ) -> Result<Vec<String>, YoutubeError> {
        let max = max_results.to_string();
        let url = self.build_url(
            "search",
            &[
                ("part", "id"),
                ("channelId", channel_id),
                ("maxResults", &max),
                ("order", order),
                ("type", "video"),
            ],
        )?;
        let body = self.request_json(&url).await?;

        let envelope: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("search(channelId={channel_id}, order={order})"),
                source: e,
            })?;

        Ok(envelope
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    /// Batch-fetches snippet and statistics for the given video ids.
    ///
    /// Returns an empty vec without a network call when `ids` is empty.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_video_stats(&self, ids: &[String]) -> Result<Vec<VideoStat>, YoutubeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let url = self.build_url(
            "videos",
            &[("part", "snippet,statistics"), ("id", &joined)],
        )?;
        let body = self.request_json(&url).await?;

        let envelope: VideoListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("videos(id={joined})"),
                source: e,
            })?;

        Ok(envelope.items.into_iter().map(VideoStat::from_item).collect())
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending `key` last.
    fn build_url(&self, resource: &str, extra: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| YoutubeError::Api(format!("invalid resource '{resource}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}
