//! HTTP client for the analytics webhook.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::InsightsError;
use crate::normalize::normalize_insights;
use crate::types::InsightBundle;

/// Client for the external analytics webhook.
///
/// The webhook takes `POST {"channelId": ...}` and answers with an untrusted
/// JSON document. One call per analysis, no retries.
pub struct InsightsClient {
    client: Client,
    webhook_url: Url,
}

impl InsightsClient {
    /// Creates a client for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InsightsError::InvalidUrl`] if
    /// `webhook_url` does not parse.
    pub fn new(webhook_url: &str, timeout_secs: u64) -> Result<Self, InsightsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubelens/0.1 (channel-analysis)")
            .build()?;

        let webhook_url = Url::parse(webhook_url)
            .map_err(|_| InsightsError::InvalidUrl(webhook_url.to_owned()))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Fetches and normalizes insights for a channel. Never fails.
    ///
    /// Transport errors, non-2xx statuses, and unparsable bodies all
    /// collapse to [`InsightBundle::fallback`]. Failures are logged at
    /// `warn` but are invisible to the caller.
    pub async fn fetch_insights(
        &self,
        channel_id: &str,
        current_subscribers: i64,
    ) -> InsightBundle {
        match self.try_fetch(channel_id).await {
            Ok(doc) => normalize_insights(&doc, current_subscribers),
            Err(err) => {
                tracing::warn!(
                    channel_id,
                    error = %err,
                    "analytics webhook unavailable; using fallback insights"
                );
                InsightBundle::fallback(current_subscribers)
            }
        }
    }

    async fn try_fetch(&self, channel_id: &str) -> Result<serde_json::Value, InsightsError> {
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&serde_json::json!({ "channelId": channel_id }))
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
