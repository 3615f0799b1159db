/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (countries, continents)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → Datasets (sources capitalized)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection + SourceCatalog → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group / sum / pivot → DashboardViews
///   └───────────┘
/// ```

pub mod aggregate;
pub mod category;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
