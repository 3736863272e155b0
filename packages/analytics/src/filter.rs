//! Multi-select filtering by shape and country.
//!
//! Matches the dashboard's selector behavior: a sighting is shown only when
//! its shape is among the selected shapes *and* its country is among the
//! selected countries. An empty selection on either side matches nothing,
//! and the view shows its "no matching data" warning. A side with no
//! selection at all (`None`) is not filtered, so sightings missing that
//! value still pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ufo_map_sighting_models::CleanSighting;

/// Selected shapes and countries. `None` on a side accepts any value,
/// including a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingFilter {
    /// Shapes to keep, or `None` for any shape.
    pub shapes: Option<BTreeSet<String>>,
    /// Countries to keep, or `None` for any country.
    pub countries: Option<BTreeSet<String>>,
}

impl SightingFilter {
    /// Creates a filter that selects exactly these values on both sides.
    #[must_use]
    pub fn new<S, C>(shapes: S, countries: C) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::any().with_shapes(shapes).with_countries(countries)
    }

    /// A filter that passes every sighting.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            shapes: None,
            countries: None,
        }
    }

    /// Restricts the filter to these shapes.
    #[must_use]
    pub fn with_shapes<S>(mut self, shapes: S) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
    {
        self.shapes = Some(shapes.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the filter to these countries.
    #[must_use]
    pub fn with_countries<C>(mut self, countries: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a single sighting passes the filter. On a side with a
    /// selection, sightings missing that value never pass.
    #[must_use]
    pub fn matches(&self, sighting: &CleanSighting) -> bool {
        let selected = |set: Option<&BTreeSet<String>>, value: Option<&str>| {
            set.is_none_or(|set| value.is_some_and(|v| set.contains(v)))
        };
        selected(self.shapes.as_ref(), sighting.record.shape.as_deref())
            && selected(self.countries.as_ref(), sighting.record.country.as_deref())
    }

    /// Returns the matching sightings, in dataset order.
    #[must_use]
    pub fn apply<'a>(&self, sightings: &'a [CleanSighting]) -> Vec<&'a CleanSighting> {
        let matched: Vec<&CleanSighting> = sightings.iter().filter(|s| self.matches(s)).collect();
        log::debug!(
            "Filter kept {} of {} sightings",
            matched.len(),
            sightings.len()
        );
        matched
    }
}

/// Distinct shapes in first-seen order, for populating a selector.
#[must_use]
pub fn unique_shapes(sightings: &[CleanSighting]) -> Vec<&str> {
    unique(sightings.iter().map(|s| s.record.shape.as_deref()))
}

/// Distinct countries in first-seen order, for populating a selector.
#[must_use]
pub fn unique_countries(sightings: &[CleanSighting]) -> Vec<&str> {
    unique(sightings.iter().map(|s| s.record.country.as_deref()))
}

fn unique<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values
        .flatten()
        .filter(|value| seen.insert(*value))
        .collect()
}

#[cfg(test)]
mod tests {
    use ufo_map_ingest::build_clean_dataset;
    use ufo_map_sighting_models::SightingRecord;

    use super::*;

    fn sighting(shape: Option<&str>, country: Option<&str>) -> SightingRecord {
        SightingRecord {
            shape: shape.map(str::to_string),
            country: country.map(str::to_string),
            city: Some("Metropolis".to_string()),
            latitude: Some("10".to_string()),
            longitude: Some("20".to_string()),
            ..SightingRecord::default()
        }
    }

    fn dataset() -> Vec<CleanSighting> {
        build_clean_dataset(vec![
            sighting(Some("light"), Some("us")),
            sighting(Some("disk"), Some("us")),
            sighting(Some("light"), Some("gb")),
            sighting(None, Some("us")),
            sighting(Some("light"), Some("us")),
        ])
    }

    #[test]
    fn requires_both_shape_and_country() {
        let data = dataset();
        let filter = SightingFilter::new(["light"], ["us"]);

        let matched = filter.apply(&data);

        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|s| s.record.shape.as_deref() == Some("light")));
        assert!(matched.iter().all(|s| s.record.country.as_deref() == Some("us")));
    }

    #[test]
    fn multi_select_unions_values_within_a_column() {
        let data = dataset();
        let filter = SightingFilter::new(["light", "disk"], ["us", "gb"]);
        assert_eq!(filter.apply(&data).len(), 4);
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let data = dataset();
        assert!(
            SightingFilter::new(Vec::<String>::new(), Vec::<String>::new())
                .apply(&data)
                .is_empty()
        );
        assert!(
            SightingFilter::new(["light"], Vec::<String>::new())
                .apply(&data)
                .is_empty()
        );
    }

    #[test]
    fn unselected_side_accepts_missing_values() {
        let records = [
            sighting(Some("light"), Some("us")),
            sighting(Some("light"), None),
            sighting(Some("disk"), None),
            sighting(None, Some("gb")),
        ];
        let data = build_clean_dataset(
            (0_u64..)
                .zip(records)
                .map(|(row, record)| SightingRecord { row, ..record })
                .collect(),
        );

        let by_shape = SightingFilter::any().with_shapes(["light"]);
        let rows: Vec<u64> = by_shape.apply(&data).iter().map(|s| s.row()).collect();
        assert_eq!(rows, vec![0, 1]);

        let by_country = SightingFilter::any().with_countries(["gb"]);
        let rows: Vec<u64> = by_country.apply(&data).iter().map(|s| s.row()).collect();
        assert_eq!(rows, vec![3]);
    }

    #[test]
    fn any_filter_passes_everything() {
        let data = dataset();
        assert_eq!(SightingFilter::any().apply(&data).len(), data.len());
        assert_eq!(SightingFilter::default(), SightingFilter::any());
    }

    #[test]
    fn lists_unique_values_in_first_seen_order() {
        let data = dataset();
        assert_eq!(unique_shapes(&data), vec!["light", "disk"]);
        assert_eq!(unique_countries(&data), vec!["us", "gb"]);
    }
}
