/// Data layer: core types, loading, derivation, filtering and aggregation.
///
/// Architecture:
/// ```text
///  upload (.csv / .tsv / .xlsx / .ods / .parquet)  or  fallback path
///        │
///        ▼
///   ┌──────────┐      ┌─────────┐
///   │  loader   │ ◄──  │  cache   │  keyed by SHA-256 of the source
///   └──────────┘      └─────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  revenue = ad_spend × (1 + roi)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  platform × content_type × year → FilteredView
///   └──────────┘
///        │
///        ├──────────────► export (CSV / JSON)
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + grouped series
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod derive;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
