//! Social Pulse: load a table of social-media posts, filter it by platform,
//! content type and year, and compute the engagement / spend / ROI figures a
//! dashboard shows.
//!
//! The binary (`src/main.rs`) is an egui front end over this library; every
//! computation lives here and is a plain synchronous function.

pub mod config;
pub mod data;
pub mod pipeline;

pub use data::error::DataError;
pub use data::filter::{FilterSelection, FilteredView};
pub use data::model::{Dataset, Record};
pub use pipeline::DashboardReport;
