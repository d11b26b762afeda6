/// Data layer: core types, loading, inspection and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, ordered column names
///   └──────────┘
///        │                    │
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │ inspect   │        │  filter   │  condition → matching rows
///   └──────────┘        └──────────┘
///   column types,
///   distinct values
/// ```
pub mod coerce;
pub mod filter;
pub mod inspect;
pub mod loader;
pub mod model;
