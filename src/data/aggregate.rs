use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::Record;

// ---------------------------------------------------------------------------
// NaN-skipping accumulators
// ---------------------------------------------------------------------------

/// Running mean over non-NaN values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, v: f64) {
        if !v.is_nan() {
            self.sum += v;
            self.count += 1;
        }
    }

    /// NaN when nothing was pushed.
    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let mut m = Mean::default();
    values.for_each(|v| m.push(v));
    m.value()
}

/// Sum over non-NaN values; 0.0 for nothing.
fn sum_of(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).sum()
}

/// Group by `key` (records where it is `None` are left out) and average each
/// of the `N` values independently. Keys come back sorted.
fn group_means<'a, K: Ord, const N: usize>(
    records: impl Iterator<Item = &'a Record>,
    key: impl Fn(&Record) -> Option<K>,
    values: impl Fn(&Record) -> [f64; N],
) -> BTreeMap<K, [f64; N]> {
    let mut groups: BTreeMap<K, [Mean; N]> = BTreeMap::new();
    for rec in records {
        let Some(k) = key(rec) else {
            continue;
        };
        let acc = groups.entry(k).or_insert([Mean::default(); N]);
        for (m, v) in acc.iter_mut().zip(values(rec)) {
            m.push(v);
        }
    }
    groups
        .into_iter()
        .map(|(k, acc)| (k, acc.map(|m| m.value())))
        .collect()
}

// ---------------------------------------------------------------------------
// Summary KPIs
// ---------------------------------------------------------------------------

/// Scalar KPIs over a filtered view. Totals are 0 and averages NaN when the
/// view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub rows: usize,
    pub total_engagement: f64,
    pub avg_engagement_rate: f64,
    pub total_ad_spend: f64,
    pub total_revenue: f64,
    pub avg_roi: f64,
}

impl SummaryMetrics {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        Self {
            rows: view.len(),
            total_engagement: sum_of(view.records().map(|r| r.engagement)),
            avg_engagement_rate: mean_of(view.records().map(|r| r.engagement_rate)),
            total_ad_spend: sum_of(view.records().map(|r| r.ad_spend)),
            total_revenue: sum_of(view.records().map(|r| r.revenue)),
            avg_roi: mean_of(view.records().map(|r| r.roi)),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped series
// ---------------------------------------------------------------------------

/// One group and its mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPerformance {
    pub content_type: String,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub campaign_name: String,
    pub ad_spend: f64,
    pub revenue: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub engagement: f64,
}

impl TrendPoint {
    /// `YYYY-MM`, used as the chart axis label.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Mean engagement rate per platform.
pub fn engagement_rate_by_platform(view: &FilteredView<'_>) -> Vec<GroupMean<String>> {
    group_means(view.records(), |r| r.platform.clone(), |r| [r.engagement_rate])
        .into_iter()
        .map(|(key, [mean])| GroupMean { key, mean })
        .collect()
}

/// Mean likes / comments / shares / engagement per content type.
pub fn content_performance(view: &FilteredView<'_>) -> Vec<ContentPerformance> {
    group_means(
        view.records(),
        |r| r.content_type.clone(),
        |r| [r.likes, r.comments, r.shares, r.engagement],
    )
    .into_iter()
    .map(
        |(content_type, [likes, comments, shares, engagement])| ContentPerformance {
            content_type,
            likes,
            comments,
            shares,
            engagement,
        },
    )
    .collect()
}

/// Mean spend / revenue / ROI per campaign; posts outside a campaign are
/// left out.
pub fn campaign_summary(view: &FilteredView<'_>) -> Vec<CampaignSummary> {
    group_means(
        view.records(),
        |r| r.campaign_name.clone(),
        |r| [r.ad_spend, r.revenue, r.roi],
    )
    .into_iter()
    .map(|(campaign_name, [ad_spend, revenue, roi])| CampaignSummary {
        campaign_name,
        ad_spend,
        revenue,
        roi,
    })
    .collect()
}

/// Mean engagement per posting hour, ascending.
pub fn hourly_engagement(view: &FilteredView<'_>) -> Vec<GroupMean<u32>> {
    group_means(view.records(), |r| r.post_hour, |r| [r.engagement])
        .into_iter()
        .map(|(key, [mean])| GroupMean { key, mean })
        .collect()
}

/// Mean engagement per calendar month, oldest first.
pub fn monthly_trend(view: &FilteredView<'_>) -> Vec<TrendPoint> {
    group_means(view.records(), |r| Some((r.year, r.month)), |r| [r.engagement])
        .into_iter()
        .map(|((year, month), [engagement])| TrendPoint {
            year,
            month,
            engagement,
        })
        .collect()
}

/// Content type with the highest mean engagement rate. Groups whose mean is
/// NaN are skipped; on a tie the lexicographically smallest name wins.
pub fn best_content_type(view: &FilteredView<'_>) -> Option<String> {
    let means = group_means(view.records(), |r| r.content_type.clone(), |r| [r.engagement_rate]);

    let mut best: Option<(String, f64)> = None;
    for (content_type, [mean]) in means {
        if mean.is_nan() {
            continue;
        }
        // Keys ascend, so a strict comparison keeps the first name on ties.
        if best.as_ref().map_or(true, |(_, top)| mean > *top) {
            best = Some((content_type, mean));
        }
    }
    best.map(|(name, _)| name)
}
