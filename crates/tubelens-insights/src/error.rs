use thiserror::Error;

/// Internal failure modes of the analytics webhook call.
///
/// These never cross the crate boundary as errors: [`fetch_insights`]
/// absorbs them into the fallback bundle and logs them for operability.
///
/// [`fetch_insights`]: crate::InsightsClient::fetch_insights
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Network failure or non-2xx status from the webhook.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook URL could not be parsed at construction time.
    #[error("invalid webhook URL '{0}'")]
    InvalidUrl(String),

    /// The response body was not valid JSON.
    #[error("unparsable webhook response: {0}")]
    Deserialize(#[from] serde_json::Error),
}
