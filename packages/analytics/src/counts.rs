//! Categorical counts and map points for chart and map views.

use std::collections::BTreeMap;

use chrono::Datelike as _;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use ufo_map_ingest::parsing::parse_sighting_datetime;
use ufo_map_sighting_models::CleanSighting;

/// Label used for sightings with no value in the grouped column.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Column to group sightings by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupBy {
    /// Country column.
    Country,
    /// State/province column.
    State,
    /// UFO shape column.
    Shape,
    /// Derived settlement type.
    SettlementType,
}

impl GroupBy {
    fn key<'a>(self, sighting: &'a CleanSighting) -> &'a str {
        let value = match self {
            Self::Country => sighting.record.country.as_deref(),
            Self::State => sighting.record.state.as_deref(),
            Self::Shape => sighting.record.shape.as_deref(),
            Self::SettlementType => Some(sighting.settlement_type.as_ref()),
        };
        value.unwrap_or(UNKNOWN_CATEGORY)
    }
}

/// Number of sightings in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value.
    pub category: String,
    /// Number of sightings.
    pub count: u64,
}

/// Number of sightings in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of sightings.
    pub count: u64,
}

/// A point on the sightings map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Counts sightings per value of `group_by`, largest first. Ties are ordered
/// by category name.
#[must_use]
pub fn count_by(sightings: &[CleanSighting], group_by: GroupBy) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for sighting in sightings {
        *counts.entry(group_by.key(sighting)).or_default() += 1;
    }

    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order within equal counts.
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Counts sightings per year of their date/time column, oldest first.
/// Sightings whose date cannot be parsed are skipped.
#[must_use]
pub fn count_by_year(sightings: &[CleanSighting]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    let mut skipped = 0_u64;

    for sighting in sightings {
        match sighting
            .record
            .date_time
            .as_deref()
            .and_then(parse_sighting_datetime)
        {
            Some(dt) => *counts.entry(dt.year()).or_default() += 1,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} sightings with unparseable dates");
    }

    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Coordinates of every sighting, in dataset order.
#[must_use]
pub fn map_points(sightings: &[CleanSighting]) -> Vec<MapPoint> {
    sightings
        .iter()
        .map(|s| MapPoint {
            latitude: s.latitude,
            longitude: s.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ufo_map_ingest::build_clean_dataset;
    use ufo_map_sighting_models::SightingRecord;

    use super::*;

    fn sighting(country: Option<&str>, city: &str, date: &str) -> SightingRecord {
        SightingRecord {
            country: country.map(str::to_string),
            state: Some("tx".to_string()),
            city: Some(city.to_string()),
            date_time: Some(date.to_string()),
            latitude: Some("30".to_string()),
            longitude: Some("-97".to_string()),
            ..SightingRecord::default()
        }
    }

    fn dataset() -> Vec<CleanSighting> {
        build_clean_dataset(vec![
            sighting(Some("us"), "Metropolis", "10/10/1949 20:30"),
            sighting(Some("gb"), "Rural Ridge", "10/10/1956 21:00"),
            sighting(Some("us"), "Country Club", "3/1/1956 01:00"),
            sighting(None, "Metropolis", "garbage"),
        ])
    }

    #[test]
    fn counts_by_country_with_unknown_bucket() {
        let counts = count_by(&dataset(), GroupBy::Country);
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "us".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "gb".to_string(),
                    count: 1
                },
                CategoryCount {
                    category: "unknown".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn counts_by_settlement_type() {
        let counts = count_by(&dataset(), GroupBy::SettlementType);
        let labels: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(labels, vec![("urban", 2), ("rural", 1), ("suburban", 1)]);
    }

    #[test]
    fn counts_by_year_skip_bad_dates() {
        assert_eq!(
            count_by_year(&dataset()),
            vec![
                YearCount {
                    year: 1949,
                    count: 1
                },
                YearCount {
                    year: 1956,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn map_points_follow_dataset_order() {
        let points = map_points(&dataset());
        assert_eq!(points.len(), 4);
        assert!((points[0].latitude - 30.0).abs() < f64::EPSILON);
        assert!((points[0].longitude - -97.0).abs() < f64::EPSILON);
    }

    #[test]
    fn group_by_parses_from_snake_case() {
        assert_eq!(
            "settlement_type".parse::<GroupBy>().unwrap(),
            GroupBy::SettlementType
        );
    }
}
