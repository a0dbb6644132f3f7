//! One full dashboard computation: filter, then aggregate.
//!
//! The front end calls [`run`] after every input change; nothing is carried
//! over between runs except the load cache owned by the caller.

use serde::Serialize;

use crate::data::aggregate::{
    best_content_type, campaign_summary, content_performance, engagement_rate_by_platform,
    hourly_engagement, monthly_trend, CampaignSummary, ContentPerformance, GroupMean,
    SummaryMetrics, TrendPoint,
};
use crate::data::filter::{Dimension, FilterSelection, FilteredView};
use crate::data::model::Dataset;

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub summary: SummaryMetrics,
    pub best_content_type: Option<String>,
    pub platform_engagement: Vec<GroupMean<String>>,
    pub content_performance: Vec<ContentPerformance>,
    pub campaigns: Vec<CampaignSummary>,
    pub hourly: Vec<GroupMean<u32>>,
    pub trend: Vec<TrendPoint>,
}

impl DashboardReport {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        Self {
            summary: SummaryMetrics::compute(view),
            best_content_type: best_content_type(view),
            platform_engagement: engagement_rate_by_platform(view),
            content_performance: content_performance(view),
            campaigns: campaign_summary(view),
            hourly: hourly_engagement(view),
            trend: monthly_trend(view),
        }
    }
}

/// Filter `dataset` by `selection` and aggregate the result.
pub fn run(dataset: &Dataset, selection: &FilterSelection) -> DashboardReport {
    let view = FilteredView::new(dataset, selection);
    DashboardReport::from_view(&view)
}

/// "Platform: …  Content Type: …  Year: …" line describing the selection.
pub fn selection_summary(selection: &FilterSelection) -> String {
    Dimension::ALL
        .iter()
        .map(|&dim| {
            let values = selection.values(dim);
            let shown = if values.is_empty() {
                "(none)".to_string()
            } else {
                values.join(", ")
            };
            format!("{}: {shown}", dim.label())
        })
        .collect::<Vec<_>>()
        .join("  •  ")
}
