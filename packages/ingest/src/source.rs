//! Reading sighting sources from disk or over HTTP.
//!
//! A source is a CSV (optionally gzip-compressed) reachable by a local path
//! or an `http(s)` URL. The bytes are parsed into [`SightingRecord`]s using a
//! [`ColumnMapping`] and then handed to the pure cleaning pipeline.
//!
//! Every failure here is source-level: a missing file, an HTTP error status,
//! a header row without the latitude/longitude/city columns. A well-formed
//! source with no usable rows is *not* an error and yields an empty
//! [`CleanDataset`].

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;

use ufo_map_sighting_models::{ColumnMapping, SightingRecord};

use crate::SourceError;
use crate::pipeline::{CleanDataset, build_clean_dataset_with_report};
use crate::progress::ProgressCallback;

/// Where a sighting source lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceLocation {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl SourceLocation {
    /// Interprets a caller-supplied location string. Anything starting with
    /// `http://` or `https://` is a URL, everything else a path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Whether the location name ends in `.gz`.
    #[must_use]
    pub fn looks_gzipped(&self) -> bool {
        match self {
            Self::Path(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gz")),
            Self::Url(url) => url
                .split(['?', '#'])
                .next()
                .is_some_and(|path| path.to_ascii_lowercase().ends_with(".gz")),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Options for loading a source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header names of the known columns.
    pub mapping: ColumnMapping,
    /// Field delimiter (default: comma).
    pub delimiter: u8,
    /// Force gzip decompression on or off. `None` decides from the `.gz`
    /// suffix.
    pub gzip: Option<bool>,
    /// Maximum number of data rows to read.
    pub limit: Option<u64>,
    /// Additional HTTP headers for URL sources.
    pub headers: BTreeMap<String, String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mapping: ColumnMapping::default(),
            delimiter: b',',
            gzip: None,
            limit: None,
            headers: BTreeMap::new(),
        }
    }
}

impl LoadOptions {
    /// Uses the given column mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Caps the number of data rows read.
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Forces gzip decompression on or off.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.gzip = Some(gzipped);
        self
    }

    /// Adds an HTTP header to URL requests.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_owned(), value.to_owned());
        self
    }
}

/// Reads the raw bytes of a source, decompressing gzip if needed.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if a path cannot be read or the gzip stream is
/// corrupt, and [`SourceError::Http`] if a URL is unreachable or answers
/// with a non-success status.
pub async fn fetch_source(
    location: &SourceLocation,
    options: &LoadOptions,
) -> Result<Vec<u8>, SourceError> {
    let bytes = match location {
        SourceLocation::Path(path) => tokio::fs::read(path).await?,
        SourceLocation::Url(url) => {
            let client = build_client(&options.headers)?;
            let response = client.get(url).send().await?.error_for_status()?;
            response.bytes().await?.to_vec()
        }
    };

    log::debug!("Read {} bytes from {location}", bytes.len());

    if options.gzip.unwrap_or_else(|| location.looks_gzipped()) {
        let mut decoder = flate2::read::GzDecoder::new(bytes.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        log::debug!("Decompressed to {} bytes", decompressed.len());
        return Ok(decompressed);
    }

    Ok(bytes)
}

/// Builds a [`reqwest::Client`] sending the given headers.
fn build_client(headers: &BTreeMap<String, String>) -> Result<reqwest::Client, SourceError> {
    let mut header_map = reqwest::header::HeaderMap::new();
    for (key, value) in headers {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            SourceError::Config {
                message: format!("invalid header name '{key}': {e}"),
            }
        })?;
        let val = reqwest::header::HeaderValue::from_str(value).map_err(|e| SourceError::Config {
            message: format!("invalid header value '{value}': {e}"),
        })?;
        header_map.insert(name, val);
    }
    Ok(reqwest::Client::builder()
        .default_headers(header_map)
        .build()?)
}

/// Header positions of the mapped columns.
struct ColumnIndices {
    shape: Option<usize>,
    country: Option<usize>,
    state: Option<usize>,
    city: usize,
    date_time: Option<usize>,
    latitude: usize,
    longitude: usize,
}

impl ColumnIndices {
    fn resolve(headers: &[String], mapping: &ColumnMapping) -> Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            shape: find(&mapping.shape),
            country: find(&mapping.country),
            state: find(&mapping.state),
            city: require(&mapping.city)?,
            date_time: find(&mapping.date_time),
            latitude: require(&mapping.latitude)?,
            longitude: require(&mapping.longitude)?,
        })
    }

    fn is_mapped(&self, index: usize) -> bool {
        [
            self.shape,
            self.country,
            self.state,
            Some(self.city),
            self.date_time,
            Some(self.latitude),
            Some(self.longitude),
        ]
        .contains(&Some(index))
    }
}

/// Decodes a raw cell, replacing invalid UTF-8 with `U+FFFD`, and trims it.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_owned()
}

/// Returns the trimmed cell at `index`, or `None` if absent or blank.
fn cell(record: &csv::ByteRecord, index: Option<usize>) -> Option<String> {
    let value = decode(record.get(index?)?);
    (!value.is_empty()).then_some(value)
}

/// Parses CSV into raw sighting records.
///
/// `label` names the source in errors and log lines.
///
/// # Errors
///
/// Returns [`SourceError::Empty`] if there is no header row,
/// [`SourceError::MissingColumn`] if a required column is absent, and
/// [`SourceError::Csv`] if the CSV itself is malformed. Cells that are not
/// valid UTF-8 are decoded lossily rather than failing the source.
pub fn read_records<R: std::io::Read>(
    reader: R,
    label: &str,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<SightingRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(decode).collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Empty {
            location: label.to_string(),
        });
    }

    let columns = ColumnIndices::resolve(&headers, &options.mapping)?;

    let mut records = Vec::new();

    for (row, result) in (0_u64..).zip(reader.byte_records()) {
        if let Some(max) = options.limit
            && row >= max
        {
            log::info!("[{label}] Reached limit of {max} rows, stopping");
            break;
        }

        let record = result?;
        if std::str::from_utf8(record.as_slice()).is_err() {
            log::debug!("[{label}] Row {row} has invalid UTF-8, decoding lossily");
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !columns.is_mapped(*i))
            .map(|(i, header)| {
                (header.clone(), record.get(i).map(decode).unwrap_or_default())
            })
            .collect();

        records.push(SightingRecord {
            row,
            shape: cell(&record, columns.shape),
            country: cell(&record, columns.country),
            state: cell(&record, columns.state),
            city: cell(&record, Some(columns.city)),
            date_time: cell(&record, columns.date_time),
            latitude: cell(&record, Some(columns.latitude)),
            longitude: cell(&record, Some(columns.longitude)),
            extra,
        });
        progress.inc(1);
    }

    log::info!("[{label}] Parsed {} rows", records.len());

    Ok(records)
}

/// Parses already-fetched source bytes and runs the cleaning pipeline.
///
/// # Errors
///
/// See [`read_records`].
pub fn clean_source_bytes(
    bytes: &[u8],
    label: &str,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CleanDataset, SourceError> {
    let records = read_records(bytes, label, options, progress)?;
    let dataset = build_clean_dataset_with_report(records);

    if dataset.is_empty() {
        log::warn!("[{label}] No sightings with valid coordinates");
    }

    log::info!(
        "[{label}] Clean dataset: {} of {} rows kept",
        dataset.report.rows_kept,
        dataset.report.rows_read
    );
    progress.finish(format!(
        "[{label}] {} clean sightings",
        dataset.report.rows_kept
    ));

    Ok(dataset)
}

/// Fetches a source, parses it, and runs the cleaning pipeline.
///
/// # Errors
///
/// Returns a [`SourceError`] for any source-level failure. An empty result
/// is `Ok`.
pub async fn load_clean_dataset(
    location: &SourceLocation,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CleanDataset, SourceError> {
    log::info!("Loading sightings from {location}");
    progress.set_message(format!("Loading {location}"));

    let bytes = fetch_source(location, options).await?;
    clean_source_bytes(&bytes, &location.to_string(), options, progress)
}
