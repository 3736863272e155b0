//! Field-level parsing for raw sighting rows.
//!
//! Coordinate and date coercion never fail loudly: text that cannot be
//! interpreted comes back as `None` and the caller decides what to do.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use ufo_map_sighting_models::SightingRecord;

/// Valid latitude range (inclusive).
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range (inclusive).
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Parses a single coordinate string. Returns `None` if missing, blank,
/// unparseable, or not finite (`NaN`/`inf` are rejected here rather than
/// leaking into range checks).
#[must_use]
pub fn parse_coordinate(s: Option<&str>) -> Option<f64> {
    let value = s?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses the latitude and longitude text of a record.
///
/// Knows nothing about valid ranges; see [`is_valid_coordinate`].
#[must_use]
pub fn coerce_coordinates(record: &SightingRecord) -> (Option<f64>, Option<f64>) {
    (
        parse_coordinate(record.latitude.as_deref()),
        parse_coordinate(record.longitude.as_deref()),
    )
}

/// Returns `true` iff both coordinates are present and inside their
/// geographic ranges. Bounds are inclusive.
#[must_use]
pub fn is_valid_coordinate(lat: Option<f64>, lon: Option<f64>) -> bool {
    match (lat, lon) {
        (Some(lat), Some(lon)) => LATITUDE_RANGE.contains(&lat) && LONGITUDE_RANGE.contains(&lon),
        _ => false,
    }
}

/// Parses a sighting date/time string.
///
/// Accepts ISO 8601 (`2004-10-10T20:30:00`, with or without fractional
/// seconds or a space separator) and the US locale form used by the published
/// dataset (`10/10/1949 20:30`, or a bare `10/10/1949`). The dataset writes
/// midnight as `24:00`; that rolls over to `00:00` on the following day.
#[must_use]
pub fn parse_sighting_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if let Some((date, time)) = s.split_once(' ')
        && time.trim() == "24:00"
    {
        let date = NaiveDate::parse_from_str(date, "%m/%d/%Y").ok()?;
        return date
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(NaiveTime::MIN));
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}
