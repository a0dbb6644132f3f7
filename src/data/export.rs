use std::path::Path;

use serde::Serialize;

use super::error::{DataError, Result};
use super::filter::FilteredView;
use super::model::{columns, Record};

/// File name offered when saving the filtered rows.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_social_media_data.csv";

/// Header row for an export: the source columns in source order, then the
/// derived revenue column unless the source already had one.
pub fn export_columns(view: &FilteredView<'_>) -> Vec<String> {
    let mut cols = view.dataset.columns.clone();
    if !view.dataset.has_column(columns::REVENUE) {
        cols.push(columns::REVENUE.to_string());
    }
    cols
}

/// Serialise the view as comma-separated text with a header row.
///
/// NaN and missing values are written as empty cells, so re-loading the
/// output gives the same values back.
pub fn to_csv(view: &FilteredView<'_>) -> Result<String> {
    let headers = export_columns(view);
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&headers)?;

    for rec in view.records() {
        wtr.write_record(headers.iter().map(|col| cell(rec, col)))?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Write [`to_csv`] output to `path`.
pub fn write_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let text = to_csv(view)?;
    std::fs::write(path, text)?;
    log::info!("Exported {} rows to {}", view.len(), path.display());
    Ok(())
}

/// Pretty JSON for a report; NaN becomes `null`.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn cell(rec: &Record, column: &str) -> String {
    match column {
        columns::DATE => rec.date.format("%Y-%m-%d").to_string(),
        columns::PLATFORM => rec.platform.clone().unwrap_or_default(),
        columns::CONTENT_TYPE => rec.content_type.clone().unwrap_or_default(),
        columns::YEAR => rec.year.to_string(),
        columns::MONTH => rec.month.to_string(),
        columns::POST_HOUR => rec.post_hour.map(|h| h.to_string()).unwrap_or_default(),
        columns::ENGAGEMENT => number(rec.engagement),
        columns::ENGAGEMENT_RATE => number(rec.engagement_rate),
        columns::LIKES => number(rec.likes),
        columns::COMMENTS => number(rec.comments),
        columns::SHARES => number(rec.shares),
        columns::AD_SPEND => number(rec.ad_spend),
        columns::ROI => number(rec.roi),
        columns::CAMPAIGN_NAME => rec.campaign_name.clone().unwrap_or_default(),
        columns::REVENUE => number(rec.revenue),
        other => rec.extras.get(other).cloned().unwrap_or_default(),
    }
}

fn number(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}
