//! YouTube Data API v3 client: channel URL resolution, channel metadata,
//! and bounded recent/top video statistics.

mod aggregate;
mod client;
mod error;
mod resolve;
mod types;

pub use aggregate::{
    compute_averages, EngagementAverages, DEFAULT_RECENT_COUNT, DEFAULT_TOP_COUNT,
};
pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use resolve::{match_channel_url, ChannelIdentity, UrlShape};
pub use types::{ChannelSnapshot, VideoStat};
