//! Per-agent analysis summaries
//!
//! The summary attached to each processed file is a fixed template keyed only by
//! the agent label. Real analysis happens in the chat round-trip with the LLM.

use serde::Serialize;
use serde_json::{json, Value};

use crate::routing::AgentLabel;

/// Canned analysis attached to a processed document
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentAnalysis {
    /// One-line summary
    pub result: String,
    /// Insight bullet points
    pub insights: Vec<String>,
    /// Recommendation bullet points
    pub recommendations: Vec<String>,
    /// Confidence score, 0-100
    pub confidence: u8,
    /// Headline metrics for the agent's domain
    pub key_metrics: Value,
}

/// Build the analysis summary for `label`
pub fn analyze(label: AgentLabel) -> AgentAnalysis {
    let (insights, recommendations, confidence, key_metrics): (Vec<&str>, Vec<&str>, u8, Value) =
        match label {
            AgentLabel::Crm => (
                vec![
                    "Customer engagement patterns show strong potential",
                    "Lead conversion opportunities identified",
                    "Customer satisfaction metrics are trackable",
                ],
                vec![
                    "Implement automated lead scoring system",
                    "Develop customer retention strategies",
                    "Create personalized engagement campaigns",
                ],
                92,
                json!({ "totalLeads": 1250, "conversionRate": 18.5, "customerSatisfaction": 4.2 }),
            ),
            AgentLabel::Sales => (
                vec![
                    "Revenue trends show consistent growth patterns",
                    "Product performance varies across segments",
                    "Sales cycle optimization opportunities exist",
                ],
                vec![
                    "Focus on high-performing product lines",
                    "Optimize sales funnel conversion rates",
                    "Implement predictive sales forecasting",
                ],
                89,
                json!({ "totalRevenue": 2450000, "growthRate": 15.3, "avgDealSize": 12500 }),
            ),
            AgentLabel::Marketing => (
                vec![
                    "Campaign performance shows strong ROI potential",
                    "Audience segmentation opportunities identified",
                    "Channel effectiveness varies significantly",
                ],
                vec![
                    "Reallocate budget to high-performing channels",
                    "Develop targeted audience segments",
                    "Implement A/B testing for campaigns",
                ],
                87,
                json!({ "campaignROI": 3.2, "clickThroughRate": 2.8, "conversionRate": 4.1 }),
            ),
            AgentLabel::Feedback => (
                vec![
                    "Customer sentiment analysis reveals key themes",
                    "Product satisfaction scores are measurable",
                    "Support ticket patterns show improvement areas",
                ],
                vec![
                    "Address common customer pain points",
                    "Implement proactive customer support",
                    "Develop customer success programs",
                ],
                94,
                json!({ "satisfactionScore": 4.1, "npsScore": 67, "responseTime": 2.3 }),
            ),
            AgentLabel::Operations => (
                vec![
                    "Process efficiency metrics show optimization potential",
                    "Resource utilization patterns identified",
                    "Bottleneck analysis reveals key constraints",
                ],
                vec![
                    "Automate repetitive manual processes",
                    "Optimize resource allocation strategies",
                    "Implement continuous improvement frameworks",
                ],
                85,
                json!({ "efficiency": 78.5, "utilization": 82.3, "costSavings": 125000 }),
            ),
            AgentLabel::General => (
                vec![
                    "Document contains valuable business data",
                    "Key patterns identified in the content",
                    "Actionable metrics extracted successfully",
                ],
                vec![
                    "Consider implementing data-driven decision making",
                    "Monitor key performance indicators regularly",
                    "Establish clear measurement frameworks",
                ],
                80,
                json!({}),
            ),
        };

    AgentAnalysis {
        result: format!(
            "{} summary ready; detailed analysis is produced in chat",
            label.display_name()
        ),
        insights: insights.iter().map(|s| s.to_string()).collect(),
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        confidence,
        key_metrics,
    }
}
