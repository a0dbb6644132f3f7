pub mod dashboard;
pub mod format;
pub mod panels;
pub mod plot;
