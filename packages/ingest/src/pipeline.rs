//! The cleaning pipeline: raw rows in, validated and classified sightings
//! out.
//!
//! [`filter_valid`] is the only step that drops rows. Nothing here performs
//! I/O or holds state between calls.

use serde::Serialize;
use ufo_map_sighting_models::{CleanSighting, SightingRecord};

use crate::classify::{classify_normalized, normalize_city};
use crate::parsing::{coerce_coordinates, is_valid_coordinate};

/// A raw record that passed coordinate validation, with its parsed
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    /// The untouched source row.
    pub record: SightingRecord,
    /// Parsed latitude.
    pub latitude: f64,
    /// Parsed longitude.
    pub longitude: f64,
}

/// Row counts for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Rows handed to the pipeline.
    pub rows_read: u64,
    /// Rows that made it into the clean dataset.
    pub rows_kept: u64,
    /// Rows excluded for missing or out-of-range coordinates.
    pub rows_dropped: u64,
}

/// The output of a pipeline run over one source.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanDataset {
    /// Clean sightings in source order.
    pub sightings: Vec<CleanSighting>,
    /// Row counts.
    pub report: IngestReport,
}

impl CleanDataset {
    /// Whether no sightings survived cleaning.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Number of clean sightings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sightings.len()
    }
}

/// Keeps the records whose coordinates parse and fall within range,
/// preserving input order.
#[must_use]
pub fn filter_valid(records: Vec<SightingRecord>) -> Vec<ValidRecord> {
    records
        .into_iter()
        .filter_map(|record| {
            let (lat, lon) = coerce_coordinates(&record);
            if !is_valid_coordinate(lat, lon) {
                log::trace!(
                    "Dropping row {}: latitude={:?} longitude={:?}",
                    record.row,
                    record.latitude,
                    record.longitude
                );
                return None;
            }
            Some(ValidRecord {
                record,
                latitude: lat?,
                longitude: lon?,
            })
        })
        .collect()
}

/// Filters out rows with bad coordinates and attaches the normalized city and
/// settlement type to every survivor. No other field is altered.
#[must_use]
pub fn build_clean_dataset(records: Vec<SightingRecord>) -> Vec<CleanSighting> {
    filter_valid(records)
        .into_iter()
        .map(|valid| {
            let city_normalized = normalize_city(valid.record.city.as_deref());
            let settlement_type = classify_normalized(&city_normalized);
            CleanSighting {
                record: valid.record,
                latitude: valid.latitude,
                longitude: valid.longitude,
                city_normalized,
                settlement_type,
            }
        })
        .collect()
}

/// Same as [`build_clean_dataset`], plus row counts.
#[must_use]
pub fn build_clean_dataset_with_report(records: Vec<SightingRecord>) -> CleanDataset {
    let rows_read = records.len() as u64;
    let sightings = build_clean_dataset(records);
    let rows_kept = sightings.len() as u64;
    let report = IngestReport {
        rows_read,
        rows_kept,
        rows_dropped: rows_read - rows_kept,
    };

    if report.rows_dropped > 0 {
        log::debug!(
            "Dropped {} of {rows_read} rows with missing or out-of-range coordinates",
            report.rows_dropped
        );
    }

    CleanDataset { sightings, report }
}

#[cfg(test)]
mod tests {
    use ufo_map_sighting_models::SettlementType;

    use super::*;

    fn row(row: u64, city: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> SightingRecord {
        SightingRecord {
            row,
            shape: Some("light".to_string()),
            country: Some("us".to_string()),
            state: Some("tx".to_string()),
            city: city.map(str::to_string),
            date_time: Some("10/10/1949 20:30".to_string()),
            latitude: lat.map(str::to_string),
            longitude: lon.map(str::to_string),
            ..SightingRecord::default()
        }
    }

    #[test]
    fn keeps_only_valid_rows_in_input_order() {
        let records = vec![
            row(1, Some("Metropolis"), Some("29.88"), Some("-97.94")),
            row(2, Some("Rural Ridge"), None, Some("-97.94")),
            row(3, Some("Rural Ridge"), Some("-33.86"), Some("151.2")),
            row(4, Some("Metropolis"), Some("29.88"), None),
            row(5, Some("Metropolis"), Some(""), Some("10")),
        ];

        let clean = build_clean_dataset(records);

        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].row(), 1);
        assert_eq!(clean[1].row(), 3);
        assert_eq!(clean[0].settlement_type, SettlementType::Urban);
        assert_eq!(clean[1].settlement_type, SettlementType::Suburban);
    }

    #[test]
    fn boundary_coordinates_survive() {
        let records = vec![
            row(0, None, Some("90.0"), Some("180.0")),
            row(1, None, Some("90.0001"), Some("0")),
            row(2, None, Some("abc"), Some("0")),
        ];

        let clean = build_clean_dataset(records);

        assert_eq!(clean.len(), 1);
        assert_eq!(clean[0].row(), 0);
        assert!((clean[0].latitude - 90.0).abs() < f64::EPSILON);
        assert!((clean[0].longitude - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn output_is_subset_of_input() {
        let records: Vec<SightingRecord> = (0_u32..20)
            .map(|i| {
                let lat = format!("{}", f64::from(i) * 10.0 - 95.0);
                row(i.into(), Some("Somewhere"), Some(&lat), Some("0"))
            })
            .collect();
        let input_rows: Vec<u64> = records.iter().map(|r| r.row).collect();

        let clean = build_clean_dataset(records);

        assert!(clean.len() <= input_rows.len());
        assert!(clean.iter().all(|s| input_rows.contains(&s.row())));
        assert!(clean.windows(2).all(|w| w[0].row() < w[1].row()));
    }

    #[test]
    fn passes_other_fields_through_unchanged() {
        let mut record = row(9, Some("Springfield Country Club"), Some("39.78"), Some("-89.65"));
        record
            .extra
            .insert("description".to_string(), "Bright light".to_string());
        let original = record.clone();

        let clean = build_clean_dataset(vec![record]);

        assert_eq!(clean[0].record, original);
        assert_eq!(clean[0].city_normalized, "springfield country club");
        assert_eq!(clean[0].settlement_type, SettlementType::Rural);
    }

    #[test]
    fn is_deterministic() {
        let records = vec![
            row(0, Some("Metropolis"), Some("1"), Some("2")),
            row(1, None, Some("x"), Some("2")),
            row(2, Some("Rural Ridge"), Some("3"), Some("4")),
        ];

        assert_eq!(
            build_clean_dataset(records.clone()),
            build_clean_dataset(records)
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let dataset = build_clean_dataset_with_report(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.report, IngestReport::default());
    }

    #[test]
    fn report_counts_dropped_rows() {
        let records = vec![
            row(0, None, Some("1"), Some("2")),
            row(1, None, Some("100"), Some("2")),
            row(2, None, None, None),
        ];

        let dataset = build_clean_dataset_with_report(records);

        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.report,
            IngestReport {
                rows_read: 3,
                rows_kept: 1,
                rows_dropped: 2,
            }
        );
    }
}
