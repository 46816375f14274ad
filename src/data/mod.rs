/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (headers + cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  typed StudentRecord / BranchSummaryRecord
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / branch selectors → borrowed view
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  per-chart statistics
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
