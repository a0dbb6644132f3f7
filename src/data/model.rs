use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Header names of the canonical schema.
pub mod columns {
    pub const DATE: &str = "date";
    pub const PLATFORM: &str = "platform";
    pub const CONTENT_TYPE: &str = "content_type";
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const POST_HOUR: &str = "post_hour";
    pub const ENGAGEMENT: &str = "engagement";
    pub const ENGAGEMENT_RATE: &str = "engagement_rate";
    pub const LIKES: &str = "likes";
    pub const COMMENTS: &str = "comments";
    pub const SHARES: &str = "shares";
    pub const AD_SPEND: &str = "ad_spend";
    pub const ROI: &str = "roi";
    pub const CAMPAIGN_NAME: &str = "campaign_name";
    /// Derived on load, written on export.
    pub const REVENUE: &str = "revenue_generated";

    /// Columns every source must provide.
    pub const REQUIRED: [&str; 11] = [
        DATE,
        PLATFORM,
        CONTENT_TYPE,
        POST_HOUR,
        ENGAGEMENT,
        ENGAGEMENT_RATE,
        LIKES,
        COMMENTS,
        SHARES,
        AD_SPEND,
        ROI,
    ];

    /// Columns the record stores in typed fields (everything else is an extra).
    pub const KNOWN: [&str; 15] = [
        DATE,
        PLATFORM,
        CONTENT_TYPE,
        YEAR,
        MONTH,
        POST_HOUR,
        ENGAGEMENT,
        ENGAGEMENT_RATE,
        LIKES,
        COMMENTS,
        SHARES,
        AD_SPEND,
        ROI,
        CAMPAIGN_NAME,
        REVENUE,
    ];
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single post and its engagement / spend figures.
///
/// Numeric fields use `f64::NAN` for missing cells so that sums and means can
/// skip them the same way a dataframe would.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub date: NaiveDate,
    pub year: i32,
    /// 1–12.
    pub month: u32,
    /// 0–23, `None` when the cell is empty.
    pub post_hour: Option<u32>,
    pub engagement: f64,
    pub engagement_rate: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub ad_spend: f64,
    pub roi: f64,
    pub campaign_name: Option<String>,
    /// Filled in by [`crate::data::derive::derive_revenue`].
    pub revenue: f64,
    /// Source columns outside the canonical schema, kept verbatim for export.
    pub extras: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table plus the distinct values of each filter dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Header names in source order.
    pub columns: Vec<String>,
    pub platforms: BTreeSet<String>,
    pub content_types: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

impl Dataset {
    /// Build the per-dimension value indices from the loaded records.
    pub fn from_records(records: Vec<Record>, columns: Vec<String>) -> Self {
        let mut platforms = BTreeSet::new();
        let mut content_types = BTreeSet::new();
        let mut years = BTreeSet::new();

        for rec in &records {
            if let Some(p) = &rec.platform {
                platforms.insert(p.clone());
            }
            if let Some(c) = &rec.content_type {
                content_types.insert(c.clone());
            }
            years.insert(rec.year);
        }

        Dataset {
            records,
            columns,
            platforms,
            content_types,
            years,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source carried a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}
