/// Data layer: table types, loading, caching and descriptive statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, canonicalize headers → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one parsed Dataset per path
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  rankings, correlation, histogram, KDE
///   └──────────┘
/// ```

pub mod cache;
pub mod columns;
pub mod loader;
pub mod model;
pub mod stats;
