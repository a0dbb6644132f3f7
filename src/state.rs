use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use social_pulse::config::AppConfig;
use social_pulse::data::cache::DatasetCache;
use social_pulse::data::export;
use social_pulse::data::filter::{Dimension, FilterSelection, FilteredView};
use social_pulse::data::loader::SourceFile;
use social_pulse::data::model::Dataset;
use social_pulse::pipeline::DashboardReport;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard tabs below the KPI row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Engagement,
    Content,
    CampaignRoi,
    BestTime,
    Trends,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Engagement,
        Tab::Content,
        Tab::CampaignRoi,
        Tab::BestTime,
        Tab::Trends,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Engagement => "Engagement",
            Tab::Content => "Content",
            Tab::CampaignRoi => "Campaign ROI",
            Tab::BestTime => "Best Time",
            Tab::Trends => "Trends",
        }
    }
}

/// The full UI state, independent of rendering. Every input change goes
/// through one of the methods here, which re-run the pipeline.
pub struct AppState {
    pub config: AppConfig,

    cache: DatasetCache,

    /// File picked by the user; `None` means "use the fallback path".
    pub upload: Option<SourceFile>,

    /// Loaded dataset (None while awaiting data or after a failed load).
    pub dataset: Option<Arc<Dataset>>,

    /// Allowed values per filter dimension.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Aggregates for the current selection.
    pub report: Option<DashboardReport>,

    /// Colour per platform.
    pub color_map: Option<ColorMap>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Why the last load failed; kept apart from the missing-source state.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            upload: None,
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            report: None,
            color_map: None,
            tab: Tab::default(),
            status_message: None,
            load_error: None,
        }
    }

    /// Resolve the current source through the cache. A different dataset
    /// resets the selection to "everything"; the same one keeps it.
    pub fn reload(&mut self) {
        match self
            .cache
            .get_or_load(self.upload.as_ref(), &self.config.fallback_path)
        {
            Ok(Some(dataset)) => {
                let changed = self
                    .dataset
                    .as_ref()
                    .map_or(true, |old| !Arc::ptr_eq(old, &dataset));
                if changed {
                    self.set_dataset(dataset);
                }
                self.status_message = None;
                self.load_error = None;
            }
            Ok(None) => {
                self.clear_dataset();
                self.status_message = None;
                self.load_error = None;
            }
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.clear_dataset();
                self.status_message = Some(format!("Error: {e}"));
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Use a file from disk as the upload and load it.
    pub fn open_file(&mut self, path: &Path) {
        match SourceFile::from_path(path) {
            Ok(src) => {
                self.upload = Some(src);
                self.reload();
            }
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the upload and go back to the fallback file.
    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.reload();
    }

    /// Force a re-parse of the current source.
    pub fn force_reload(&mut self) {
        self.cache.invalidate();
        self.dataset = None;
        self.reload();
    }

    /// Ingest a newly loaded dataset, initialise filters and colour.
    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        self.color_map = Some(ColorMap::new(&dataset.platforms));
        self.dataset = Some(dataset);
        self.refilter();
    }

    fn clear_dataset(&mut self) {
        self.dataset = None;
        self.selection = FilterSelection::default();
        self.visible_indices.clear();
        self.report = None;
        self.color_map = None;
    }

    /// Recompute the visible rows and the report after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let view = FilteredView::new(ds, &self.selection);
            self.report = Some(DashboardReport::from_view(&view));
            self.visible_indices = view.indices;
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        self.selection.toggle(dim, value);
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(dim, ds);
            self.refilter();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.select_none(dim);
        self.refilter();
    }

    /// The filtered rows, if a dataset is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset.as_ref().map(|ds| FilteredView {
            dataset: ds,
            indices: self.visible_indices.clone(),
        })
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let view = self.view().context("no dataset loaded")?;
        export::write_csv(&view, path)
            .with_context(|| format!("writing {}", path.display()))
    }

    pub fn export_report(&self, path: &Path) -> Result<()> {
        let report = self.report.as_ref().context("no dataset loaded")?;
        let json = export::to_json(report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "date,platform,content_type,year,post_hour,engagement,engagement_rate,likes,comments,shares,ad_spend,roi\n\
2023-01-10,A,x,2023,9,100,2,1,1,1,100,0.5\n\
2024-03-05,B,y,2024,20,50,4,1,1,1,200,0\n";

    fn state_with_fallback(dir: &tempfile::TempDir) -> AppState {
        let path = dir.path().join("posts.csv");
        std::fs::write(&path, CSV).unwrap();
        AppState::new(AppConfig {
            fallback_path: path,
            ..AppConfig::default()
        })
    }

    #[test]
    fn awaiting_data_when_no_source_exists() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(AppConfig {
            fallback_path: dir.path().join("absent.csv"),
            ..AppConfig::default()
        });
        state.reload();
        assert!(state.dataset.is_none());
        assert!(state.report.is_none());
        assert!(state.status_message.is_none());
        assert!(state.load_error.is_none());
    }

    #[test]
    fn reload_keeps_selection_when_source_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_fallback(&dir);
        state.reload();
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_filter_value(Dimension::Platform, "B");
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.report.as_ref().unwrap().summary.rows, 1);

        state.reload();
        assert_eq!(state.visible_indices, vec![0]);
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.summary.total_ad_spend, 100.0);
        assert_eq!(report.summary.total_revenue, 150.0);
    }

    #[test]
    fn select_none_then_all_restores_the_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_fallback(&dir);
        state.reload();

        state.select_none(Dimension::Year);
        assert!(state.visible_indices.is_empty());
        assert!(state.report.as_ref().unwrap().summary.avg_roi.is_nan());

        state.select_all(Dimension::Year);
        assert_eq!(state.visible_indices.len(), 2);
    }

    #[test]
    fn bad_upload_surfaces_an_error_and_halts() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_fallback(&dir);
        state.reload();

        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "platform\nA\n").unwrap();
        state.open_file(&bad);

        assert!(state.dataset.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("date"), "{msg}");
        assert!(state.report.is_none());
        let load_error = state.load_error.as_deref().unwrap();
        assert!(load_error.contains("required column 'date'"), "{load_error}");

        state.clear_upload();
        assert!(state.dataset.is_some());
        assert!(state.status_message.is_none());
        assert!(state.load_error.is_none());
    }

    #[test]
    fn exports_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_fallback(&dir);
        state.reload();

        let csv_path = dir.path().join("out.csv");
        state.export_csv(&csv_path).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().ends_with("revenue_generated"));

        let json_path = dir.path().join("report.json");
        state.export_report(&json_path).unwrap();
        let json = std::fs::read_to_string(&json_path).unwrap();
        assert!(json.contains("\"best_content_type\": \"y\""), "{json}");
    }
}
