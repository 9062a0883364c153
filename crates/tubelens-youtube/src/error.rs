use thiserror::Error;

/// Errors returned by the YouTube Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// non-2xx statuses surfaced via `error_for_status`.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// No recognized URL shape matched, or the handle/username lookup
    /// returned zero items.
    #[error("could not resolve a channel id from URL '{0}'")]
    UnresolvableChannel(String),

    /// The channels endpoint acknowledged the id but returned no item.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// Client misconfiguration, e.g. an unparsable base URL.
    #[error("youtube API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
