//! Descriptive statistics for the numeric sighting columns.

use serde::{Deserialize, Serialize};
use ufo_map_sighting_models::CleanSighting;

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Number of values.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1). `None` with fewer than two values.
    pub std: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Largest value.
    pub max: f64,
}

/// Quantile `q` of an ascending slice, interpolating linearly between the
/// two nearest ranks. `sorted` must be non-empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl ColumnStats {
    /// Computes statistics over `values`. Returns `None` for an empty input.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.len() > 1).then(|| {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        });
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count: values.len() as u64,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Summary of a clean dataset, mirroring the dashboard's "basic statistics"
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Number of sightings.
    pub count: u64,
    /// Latitude statistics.
    pub latitude: Option<ColumnStats>,
    /// Longitude statistics.
    pub longitude: Option<ColumnStats>,
}

/// Describes the coordinate columns of a dataset.
#[must_use]
pub fn describe(sightings: &[CleanSighting]) -> DatasetSummary {
    let latitudes: Vec<f64> = sightings.iter().map(|s| s.latitude).collect();
    let longitudes: Vec<f64> = sightings.iter().map(|s| s.longitude).collect();

    DatasetSummary {
        count: sightings.len() as u64,
        latitude: ColumnStats::from_values(&latitudes),
        longitude: ColumnStats::from_values(&longitudes),
    }
}

#[cfg(test)]
mod tests {
    use ufo_map_ingest::build_clean_dataset;
    use ufo_map_sighting_models::SightingRecord;

    use super::*;

    fn at(lat: &str, lon: &str) -> SightingRecord {
        SightingRecord {
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
            ..SightingRecord::default()
        }
    }

    #[test]
    fn describes_coordinates() {
        let data = build_clean_dataset(vec![at("10", "-100"), at("20", "-80"), at("30", "-90")]);

        let summary = describe(&data);

        assert_eq!(summary.count, 3);
        let lat = summary.latitude.unwrap();
        assert!((lat.mean - 20.0).abs() < 1e-9);
        assert!((lat.std.unwrap() - 10.0).abs() < 1e-9);
        assert!((lat.min - 10.0).abs() < f64::EPSILON);
        assert!((lat.max - 30.0).abs() < f64::EPSILON);
        assert!((lat.median - 20.0).abs() < 1e-9);
        let lon = summary.longitude.unwrap();
        assert!((lon.mean - -90.0).abs() < 1e-9);
        assert!((lon.min - -100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_value_has_no_std() {
        let stats = ColumnStats::from_values(&[5.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_none());
        assert!((stats.median - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quartiles_interpolate_between_ranks() {
        let stats = ColumnStats::from_values(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert!((stats.min - 10.0).abs() < f64::EPSILON);
        assert!((stats.p25 - 17.5).abs() < 1e-9);
        assert!((stats.median - 25.0).abs() < 1e-9);
        assert!((stats.p75 - 32.5).abs() < 1e-9);
        assert!((stats.max - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quartiles_land_on_ranks_for_odd_counts() {
        let stats = ColumnStats::from_values(&[3.0, 1.0, 2.0, 5.0, 4.0]).unwrap();
        assert!((stats.p25 - 2.0).abs() < 1e-9);
        assert!((stats.median - 3.0).abs() < 1e-9);
        assert!((stats.p75 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_has_no_stats() {
        let summary = describe(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.latitude.is_none());
        assert!(summary.longitude.is_none());
    }
}
