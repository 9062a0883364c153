//! Client and defensive normalizer for the external channel-analytics
//! webhook.
//!
//! The webhook's response shape is unversioned: any subset of fields, any
//! nesting, any type. Every extracted field pairs an explicit extraction
//! path with a named default, and a dead webhook degrades to a fallback
//! bundle, never to a request failure.

mod client;
mod error;
mod normalize;
mod types;

pub use client::InsightsClient;
pub use error::InsightsError;
pub use normalize::normalize_insights;
pub use types::{ChartPoint, InsightBundle, RiskLevel};
