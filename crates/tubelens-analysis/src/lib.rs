//! Channel analysis orchestration: resolve a channel URL, aggregate platform
//! statistics, normalize external insights, assemble one analysis record,
//! and persist it with its video rows.

mod assemble;
mod error;
mod pipeline;

pub use assemble::{assemble, engagement_rate};
pub use error::AnalysisError;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
