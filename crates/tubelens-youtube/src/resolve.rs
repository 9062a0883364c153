//! Channel identity resolution from free-form channel URLs.
//!
//! Three URL shapes are recognized, tried in order with first match winning:
//! a literal `/channel/UC...` id (no network call), an `@handle`, and the
//! legacy `/c/name` custom URL. The direct-id shape always takes precedence
//! because it is unambiguous and needs no lookup.

use std::sync::LazyLock;

use regex::Regex;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;

static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"channel/(UC[\w-]+)").expect("valid regex"));
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w.-]+)").expect("valid regex"));
static LEGACY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/c/([\w-]+)").expect("valid regex"));

/// A resolved channel identifier paired with the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentity {
    pub channel_id: String,
    pub channel_url: String,
}

/// The URL shape a submitted channel URL matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlShape {
    /// `/channel/UC...` — the id is embedded literally.
    ChannelId(String),
    /// `@name` — needs one `channels.list forHandle` lookup.
    Handle(String),
    /// `/c/name` — needs one `channels.list forUsername` lookup.
    LegacyName(String),
}

/// Classifies a channel URL without any network call.
///
/// Returns `None` when no recognized shape matches.
#[must_use]
pub fn match_channel_url(url: &str) -> Option<UrlShape> {
    if let Some(caps) = CHANNEL_ID_RE.captures(url) {
        return Some(UrlShape::ChannelId(caps[1].to_owned()));
    }
    if let Some(caps) = HANDLE_RE.captures(url) {
        return Some(UrlShape::Handle(caps[1].to_owned()));
    }
    if let Some(caps) = LEGACY_RE.captures(url) {
        return Some(UrlShape::LegacyName(caps[1].to_owned()));
    }
    None
}

impl YoutubeClient {
    /// Resolves a free-form channel URL to a [`ChannelIdentity`].
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::UnresolvableChannel`] when no URL shape matches or
    ///   the handle/username lookup returns zero items.
    /// - [`YoutubeError::Http`] / [`YoutubeError::Deserialize`] from the
    ///   lookup call for the non-literal shapes.
    pub async fn resolve_channel(&self, url: &str) -> Result<ChannelIdentity, YoutubeError> {
        let shape = match_channel_url(url)
            .ok_or_else(|| YoutubeError::UnresolvableChannel(url.to_owned()))?;

        let channel_id = match shape {
            UrlShape::ChannelId(id) => id,
            UrlShape::Handle(handle) => self
                .lookup_channel_id("forHandle", &handle)
                .await?
                .ok_or_else(|| YoutubeError::UnresolvableChannel(url.to_owned()))?,
            UrlShape::LegacyName(name) => self
                .lookup_channel_id("forUsername", &name)
                .await?
                .ok_or_else(|| YoutubeError::UnresolvableChannel(url.to_owned()))?,
        };

        tracing::debug!(channel_id, url, "resolved channel identity");

        Ok(ChannelIdentity {
            channel_id,
            channel_url: url.to_owned(),
        })
    }
}
