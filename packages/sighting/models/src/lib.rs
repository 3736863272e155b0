#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! UFO sighting record types and the settlement classification taxonomy.
//!
//! A [`SightingRecord`] is one untouched row of the source CSV. The cleaning
//! pipeline turns the rows with usable coordinates into [`CleanSighting`]s,
//! which every downstream view (tables, maps, charts) consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Settlement classification derived from a sighting's city name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SettlementType {
    /// Fallback when no keyword matches (including an empty city name)
    Urban,
    /// City name mentions "rural"
    Suburban,
    /// City name mentions "country"
    Rural,
}

impl SettlementType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Urban, Self::Suburban, Self::Rural]
    }
}

/// One row of the raw sighting source, every field still text.
///
/// Cells are trimmed of surrounding whitespace when read, so every field
/// (including [`extra`](Self::extra)) holds the trimmed text, and cells that
/// are absent or blank after trimming are `None`. Bytes that are not valid
/// UTF-8 are replaced with `U+FFFD`. Columns outside the [`ColumnMapping`]
/// are carried in [`extra`](Self::extra) otherwise unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingRecord {
    /// Zero-based index of the data row in the source (row identity).
    pub row: u64,
    /// Free-text UFO shape (e.g. "light", "disk").
    pub shape: Option<String>,
    /// Country code or name.
    pub country: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// City name as written in the source.
    pub city: Option<String>,
    /// Sighting date/time as written in the source.
    pub date_time: Option<String>,
    /// Latitude text, not yet parsed.
    pub latitude: Option<String>,
    /// Longitude text, not yet parsed.
    pub longitude: Option<String>,
    /// Every other column, keyed by header.
    pub extra: BTreeMap<String, String>,
}

/// A sighting with validated coordinates and a derived settlement type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanSighting {
    /// The source row this sighting was derived from, unchanged.
    pub record: SightingRecord,
    /// Latitude (WGS84), always within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude (WGS84), always within `[-180, 180]`.
    pub longitude: f64,
    /// Lowercased city text. Only used for classification.
    pub city_normalized: String,
    /// Settlement type derived from [`city_normalized`](Self::city_normalized).
    pub settlement_type: SettlementType,
}

impl CleanSighting {
    /// Row identity of the source record.
    #[must_use]
    pub const fn row(&self) -> u64 {
        self.record.row
    }
}

/// Header names of the known columns in the source CSV.
///
/// Defaults match the published UFO sightings dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Shape column.
    pub shape: String,
    /// Country column.
    pub country: String,
    /// State/province column.
    pub state: String,
    /// City column (required).
    pub city: String,
    /// Date/time column.
    pub date_time: String,
    /// Latitude column (required).
    pub latitude: String,
    /// Longitude column (required).
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            shape: "UFO_shape".to_string(),
            country: "country".to_string(),
            state: "state/province".to_string(),
            city: "city".to_string(),
            date_time: "Date_time".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Columns that must be present in the header row for a source to be
    /// usable at all.
    #[must_use]
    pub fn required(&self) -> [&str; 3] {
        [
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.city.as_str(),
        ]
    }
}
