use std::path::PathBuf;

use crate::data::export::DEFAULT_EXPORT_NAME;

/// Fallback dataset read when nothing has been uploaded.
pub const DEFAULT_DATA_PATH: &str = "social_media_engagement_enhanced.csv";
pub const DEFAULT_CURRENCY: &str = "₹";

pub const ENV_DATA_PATH: &str = "SOCIAL_PULSE_DATA";
pub const ENV_CURRENCY: &str = "SOCIAL_PULSE_CURRENCY";
pub const ENV_EXPORT_NAME: &str = "SOCIAL_PULSE_EXPORT_NAME";

/// Runtime settings; everything has a default so the app starts with no
/// environment at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Dataset loaded when no file has been uploaded.
    pub fallback_path: PathBuf,
    /// Symbol shown in front of spend and revenue figures.
    pub currency: String,
    /// Suggested file name for CSV exports.
    pub export_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fallback_path: PathBuf::from(DEFAULT_DATA_PATH),
            currency: DEFAULT_CURRENCY.to_string(),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key → value lookup. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            fallback_path: get(ENV_DATA_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.fallback_path),
            currency: get(ENV_CURRENCY).unwrap_or(defaults.currency),
            export_name: get(ENV_EXPORT_NAME).unwrap_or(defaults.export_name),
        }
    }
}
