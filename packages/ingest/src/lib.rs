#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading, cleaning, and classification of UFO sighting data.
//!
//! The cleaning pipeline in [`pipeline`] is a pure function from raw
//! [`SightingRecord`]s to [`CleanSighting`]s: rows with unusable coordinates
//! are dropped, every surviving row gets a [`SettlementType`]. Everything
//! that touches the outside world (reading files, downloading URLs, caching)
//! lives in [`source`] and [`cache`] and wraps the pipeline.
//!
//! [`SightingRecord`]: ufo_map_sighting_models::SightingRecord
//! [`CleanSighting`]: ufo_map_sighting_models::CleanSighting
//! [`SettlementType`]: ufo_map_sighting_models::SettlementType

pub mod cache;
pub mod classify;
pub mod config;
pub mod parsing;
pub mod pipeline;
pub mod progress;
pub mod source;

pub use classify::classify_settlement;
pub use parsing::{coerce_coordinates, is_valid_coordinate};
pub use pipeline::{
    CleanDataset, IngestReport, build_clean_dataset, build_clean_dataset_with_report,
    filter_valid,
};
pub use source::{LoadOptions, SourceLocation, load_clean_dataset};

/// Source-level failures.
///
/// Row-level problems (bad coordinates, blank cities) never show up here;
/// they are handled inside the pipeline. Every variant means the source as a
/// whole could not be used, which callers must tell apart from a source that
/// was read fine but yielded no sightings.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (unreachable host, non-success status, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file not found, unreadable, bad gzip stream).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header row at all.
    #[error("Source {location} is empty")]
    Empty {
        /// Where the source was read from.
        location: String,
    },

    /// A column the pipeline cannot work without is absent from the header.
    #[error("Required column '{column}' is missing from the source header")]
    MissingColumn {
        /// Header name that was expected.
        column: String,
    },

    /// Column mapping configuration could not be parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
