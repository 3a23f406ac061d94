/// Data layer: record types, loading, and slicing.
///
/// Architecture:
/// ```text
///  all_checkpoint_fronts.csv      seed_<n>_solution_1.txt
///              │                            │
///              ▼                            ▼
///        ┌──────────┐                ┌──────────┐
///        │  loader  │                │  loader  │
///        └──────────┘                └──────────┘
///              │                            │
///              ▼                            ▼
///        ┌────────────┐            Vec<GanttRecord>
///        │ FrontTable │
///        └────────────┘
///              │
///              ▼
///        ┌──────────┐
///        │  filter  │  rank → generation → seed → policy / mode
///        └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::DataError;
