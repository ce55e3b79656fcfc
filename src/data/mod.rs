/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, validate against Schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  load once, share Arc<Datasets>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  department / job role / age → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  group counts, correlations, KPIs, histograms, boxes
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  per-tab bundles for the UI
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod store;
pub mod summary;
