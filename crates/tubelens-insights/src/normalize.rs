//! Tolerant-reader normalization of the webhook's loosely-typed response.
//!
//! One extraction function per field, each with an explicit default.
//! Numeric-looking fields may arrive as JSON strings and are coerced;
//! coercion failure is treated identically to absence. Normalization never
//! fails for a missing or malformed field.

use serde_json::Value;

use crate::types::{
    ChartPoint, InsightBundle, RiskLevel, CURRENT_POINT_LABEL, DEFAULT_AI_INSIGHTS,
    NEUTRAL_GROWTH_LABEL,
};

/// Normalizes a raw webhook document into an [`InsightBundle`].
///
/// `current_subscribers` anchors the projection series and is the sole
/// series point when the webhook supplies no usable projections.
#[must_use]
pub fn normalize_insights(doc: &Value, current_subscribers: i64) -> InsightBundle {
    let (subscriber_growth, subscriber_chart) = growth_projection(doc, current_subscribers);

    InsightBundle {
        monthly_revenue: number_at(doc, &["revenue", "monthly"]).unwrap_or(0.0),
        profit_margin: number_at(doc, &["revenue", "margin"]).unwrap_or(0.0),
        mcn_share: number_at(doc, &["revenue", "mcnShare"]).unwrap_or(0.0),
        risk_level: risk_level(doc),
        subscriber_growth,
        subscriber_chart,
        ai_insights: narrative(doc),
    }
}

/// Walks `path` into `doc` and coerces the leaf to a number.
///
/// Accepts JSON numbers and numeric strings; anything else is `None`.
fn number_at(doc: &Value, path: &[&str]) -> Option<f64> {
    let mut node = doc;
    for key in path {
        node = node.get(key)?;
    }
    match node {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn risk_level(doc: &Value) -> RiskLevel {
    doc.get("risk")
        .and_then(Value::as_str)
        .map_or(RiskLevel::Unknown, RiskLevel::parse)
}

/// Extracts the narrative insight text.
///
/// The field may be a single string, or an object carrying a `summary`
/// string and an optional `recommendations` list. The object form renders as
/// the summary, a blank line, a literal `### Recommendations` heading, and
/// each recommendation on its own line in source order.
fn narrative(doc: &Value) -> String {
    match doc.get("aiInsights") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => {
            let Some(summary) = obj.get("summary").and_then(Value::as_str) else {
                return DEFAULT_AI_INSIGHTS.to_owned();
            };

            let recommendations: Vec<&str> = obj
                .get("recommendations")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            if recommendations.is_empty() {
                return summary.to_owned();
            }

            let mut text = String::from(summary);
            text.push_str("\n\n### Recommendations");
            for rec in recommendations {
                text.push('\n');
                text.push_str(rec);
            }
            text
        }
        _ => DEFAULT_AI_INSIGHTS.to_owned(),
    }
}

/// Builds the growth label and projection series.
///
/// When all of `subscribers.projections.{threeMonth,sixMonth,twelveMonth}`
/// coerce to numbers and the current count is positive, the series has
/// exactly four points and the label is the rounded 12-month growth percent.
/// Otherwise: single-point series, neutral label.
fn growth_projection(doc: &Value, current_subscribers: i64) -> (String, Vec<ChartPoint>) {
    #[allow(clippy::cast_precision_loss)]
    let current = current_subscribers as f64;

    let fallback = || {
        (
            NEUTRAL_GROWTH_LABEL.to_owned(),
            vec![ChartPoint {
                value: current,
                label: CURRENT_POINT_LABEL.to_owned(),
            }],
        )
    };

    if current_subscribers <= 0 {
        return fallback();
    }

    let three = number_at(doc, &["subscribers", "projections", "threeMonth"]);
    let six = number_at(doc, &["subscribers", "projections", "sixMonth"]);
    let twelve = number_at(doc, &["subscribers", "projections", "twelveMonth"]);

    let (Some(three), Some(six), Some(twelve)) = (three, six, twelve) else {
        return fallback();
    };

    let growth_pct = ((twelve - current) / current * 100.0 * 10.0).round() / 10.0;
    let label = format!("{growth_pct:+.1}% (12mo projection)");

    let chart = vec![
        ChartPoint {
            value: current,
            label: CURRENT_POINT_LABEL.to_owned(),
        },
        ChartPoint {
            value: three,
            label: "3mo".to_owned(),
        },
        ChartPoint {
            value: six,
            label: "6mo".to_owned(),
        },
        ChartPoint {
            value: twelve,
            label: "12mo".to_owned(),
        },
    ];

    (label, chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_yields_fallback_bundle() {
        let bundle = normalize_insights(&json!({}), 500);
        assert_eq!(bundle, InsightBundle::fallback(500));
    }

    #[test]
    fn extracts_nested_revenue_fields() {
        let doc = json!({
            "revenue": { "monthly": 1665.0, "margin": 42.5, "mcnShare": 15 },
            "risk": "low"
        });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.monthly_revenue, 1665.0);
        assert_eq!(bundle.profit_margin, 42.5);
        assert_eq!(bundle.mcn_share, 15.0);
        assert_eq!(bundle.risk_level, RiskLevel::Low);
    }

    #[test]
    fn coerces_numeric_strings() {
        let doc = json!({ "revenue": { "monthly": "1234.5", "margin": " 40 " } });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.monthly_revenue, 1234.5);
        assert_eq!(bundle.profit_margin, 40.0);
    }

    #[test]
    fn coercion_failure_is_treated_as_absence() {
        let doc = json!({
            "revenue": { "monthly": "lots", "margin": [1, 2], "mcnShare": null },
            "risk": 7
        });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.monthly_revenue, 0.0);
        assert_eq!(bundle.profit_margin, 0.0);
        assert_eq!(bundle.mcn_share, 0.0);
        assert_eq!(bundle.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn narrative_plain_string_passes_through() {
        let doc = json!({ "aiInsights": "Steady channel." });
        let bundle = normalize_insights(&doc, 1);
        assert_eq!(bundle.ai_insights, "Steady channel.");
    }

    #[test]
    fn narrative_object_concatenates_summary_and_recommendations() {
        let doc = json!({
            "aiInsights": {
                "summary": "Good channel",
                "recommendations": ["Post more", "Engage fans"]
            }
        });
        let bundle = normalize_insights(&doc, 1);
        assert_eq!(
            bundle.ai_insights,
            "Good channel\n\n### Recommendations\nPost more\nEngage fans"
        );
    }

    #[test]
    fn narrative_object_without_recommendations_is_just_summary() {
        let doc = json!({ "aiInsights": { "summary": "Solid fundamentals" } });
        let bundle = normalize_insights(&doc, 1);
        assert_eq!(bundle.ai_insights, "Solid fundamentals");
    }

    #[test]
    fn narrative_object_without_summary_uses_default() {
        let doc = json!({ "aiInsights": { "recommendations": ["Do things"] } });
        let bundle = normalize_insights(&doc, 1);
        assert_eq!(bundle.ai_insights, DEFAULT_AI_INSIGHTS);
    }

    #[test]
    fn narrative_wrong_type_uses_default() {
        let doc = json!({ "aiInsights": 42 });
        let bundle = normalize_insights(&doc, 1);
        assert_eq!(bundle.ai_insights, DEFAULT_AI_INSIGHTS);
    }

    #[test]
    fn full_projections_build_four_point_series() {
        let doc = json!({
            "subscribers": {
                "projections": { "threeMonth": 1050, "sixMonth": 1100, "twelveMonth": 1200 }
            }
        });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.subscriber_chart.len(), 4);
        assert_eq!(bundle.subscriber_chart[0].value, 1_000.0);
        assert_eq!(bundle.subscriber_chart[0].label, "Now");
        assert_eq!(bundle.subscriber_chart[1].value, 1_050.0);
        assert_eq!(bundle.subscriber_chart[1].label, "3mo");
        assert_eq!(bundle.subscriber_chart[3].value, 1_200.0);
        assert_eq!(bundle.subscriber_chart[3].label, "12mo");
        // (1200 - 1000) / 1000 * 100 = 20.0
        assert_eq!(bundle.subscriber_growth, "+20.0% (12mo projection)");
    }

    #[test]
    fn growth_percent_rounds_to_one_decimal() {
        let doc = json!({
            "subscribers": {
                "projections": { "threeMonth": "310", "sixMonth": "320", "twelveMonth": "346" }
            }
        });
        let bundle = normalize_insights(&doc, 300);
        // (346 - 300) / 300 * 100 = 15.333... -> 15.3
        assert_eq!(bundle.subscriber_growth, "+15.3% (12mo projection)");
    }

    #[test]
    fn negative_growth_keeps_sign() {
        let doc = json!({
            "subscribers": {
                "projections": { "threeMonth": 950, "sixMonth": 920, "twelveMonth": 900 }
            }
        });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.subscriber_growth, "-10.0% (12mo projection)");
    }

    #[test]
    fn partial_projections_fall_back_to_single_point() {
        let doc = json!({
            "subscribers": { "projections": { "threeMonth": 1050, "sixMonth": 1100 } }
        });
        let bundle = normalize_insights(&doc, 1_000);
        assert_eq!(bundle.subscriber_growth, NEUTRAL_GROWTH_LABEL);
        assert_eq!(bundle.subscriber_chart.len(), 1);
        assert_eq!(bundle.subscriber_chart[0].value, 1_000.0);
    }

    #[test]
    fn zero_current_subscribers_never_divides() {
        let doc = json!({
            "subscribers": {
                "projections": { "threeMonth": 10, "sixMonth": 20, "twelveMonth": 30 }
            }
        });
        let bundle = normalize_insights(&doc, 0);
        assert_eq!(bundle.subscriber_growth, NEUTRAL_GROWTH_LABEL);
        assert_eq!(bundle.subscriber_chart.len(), 1);
    }
}
