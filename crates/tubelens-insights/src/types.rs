use serde::{Deserialize, Serialize};

/// Revenue-risk level reported by the analytics webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    /// Parses a risk string case-insensitively; anything unrecognized is
    /// [`RiskLevel::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of the subscriber projection series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub value: f64,
    pub label: String,
}

/// Normalized output of the analytics webhook. Every field has a
/// deterministic fallback used when the source field is absent, malformed,
/// or of the wrong shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    /// Estimated monthly revenue in currency units.
    pub monthly_revenue: f64,
    /// Profit margin, percent.
    pub profit_margin: f64,
    /// Revenue share taken by a multi-channel network, percent.
    pub mcn_share: f64,
    pub risk_level: RiskLevel,
    /// Human-readable growth label, e.g. `+15.3% (12mo projection)`.
    pub subscriber_growth: String,
    /// Projection series: four points when the webhook supplied 3/6/12-month
    /// projections, otherwise a single current-count point.
    pub subscriber_chart: Vec<ChartPoint>,
    /// Narrative commentary, possibly multi-line.
    pub ai_insights: String,
}

pub(crate) const NEUTRAL_GROWTH_LABEL: &str = "n/a";
pub(crate) const CURRENT_POINT_LABEL: &str = "Now";
pub(crate) const DEFAULT_AI_INSIGHTS: &str =
    "No analytics insights are available for this channel.";

impl InsightBundle {
    /// The all-defaults bundle: zero financials, unknown risk, a
    /// single-point series anchored at the current subscriber count.
    #[must_use]
    pub fn fallback(current_subscribers: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let current = current_subscribers as f64;
        Self {
            monthly_revenue: 0.0,
            profit_margin: 0.0,
            mcn_share: 0.0,
            risk_level: RiskLevel::Unknown,
            subscriber_growth: NEUTRAL_GROWTH_LABEL.to_owned(),
            subscriber_chart: vec![ChartPoint {
                value: current,
                label: CURRENT_POINT_LABEL.to_owned(),
            }],
            ai_insights: DEFAULT_AI_INSIGHTS.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("LOW"), RiskLevel::Low);
        assert_eq!(RiskLevel::parse("Medium"), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse("high"), RiskLevel::High);
    }

    #[test]
    fn risk_level_parse_unrecognized_is_unknown() {
        assert_eq!(RiskLevel::parse("severe"), RiskLevel::Unknown);
        assert_eq!(RiskLevel::parse(""), RiskLevel::Unknown);
    }

    #[test]
    fn fallback_bundle_has_zero_financials_and_unknown_risk() {
        let bundle = InsightBundle::fallback(1_000);
        assert_eq!(bundle.monthly_revenue, 0.0);
        assert_eq!(bundle.profit_margin, 0.0);
        assert_eq!(bundle.mcn_share, 0.0);
        assert_eq!(bundle.risk_level, RiskLevel::Unknown);
        assert_eq!(bundle.subscriber_growth, "n/a");
        assert_eq!(bundle.subscriber_chart.len(), 1);
        assert_eq!(bundle.subscriber_chart[0].value, 1_000.0);
        assert_eq!(bundle.subscriber_chart[0].label, "Now");
    }
}
