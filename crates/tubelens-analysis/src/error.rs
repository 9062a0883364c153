use thiserror::Error;
use tubelens_youtube::YoutubeError;

/// Failure modes of one analysis request.
///
/// Insights failures never appear here: the analytics webhook is best-effort
/// and is absorbed into a fallback bundle inside `tubelens-insights`.
/// Nothing in this pipeline is retried automatically.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No URL pattern matched, or the handle/username lookup returned
    /// nothing. A user error: check the URL.
    #[error("could not resolve a channel from '{0}'")]
    UnresolvableChannel(String),

    /// The platform acknowledged the id but returned no channel.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// Transport-level failure talking to the video platform. Fatal to the
    /// request; there is no fallback for channel or video data.
    #[error("video platform unavailable: {0}")]
    PlatformUnavailable(#[source] YoutubeError),

    /// Write failure after successful aggregation. The caller may safely
    /// resubmit; resubmission creates a new analysis.
    #[error("persistence failure: {0}")]
    Persistence(#[from] tubelens_db::DbError),
}

impl From<YoutubeError> for AnalysisError {
    fn from(err: YoutubeError) -> Self {
        match err {
            YoutubeError::UnresolvableChannel(url) => AnalysisError::UnresolvableChannel(url),
            YoutubeError::ChannelNotFound(id) => AnalysisError::ChannelNotFound(id),
            other => AnalysisError::PlatformUnavailable(other),
        }
    }
}
