#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filters and aggregations over cleaned sighting datasets.
//!
//! Everything here is a read-only consumer of the
//! [`CleanSighting`](ufo_map_sighting_models::CleanSighting) slice produced by
//! [`ufo_map_ingest`]: the table, map, and chart views all draw from these
//! functions instead of re-deriving anything from the raw source.

pub mod counts;
pub mod filter;
pub mod stats;

pub use counts::{
    CategoryCount, GroupBy, MapPoint, YearCount, count_by, count_by_year, map_points,
};
pub use filter::SightingFilter;
pub use stats::{ColumnStats, DatasetSummary, describe};
