//! Column mapping configuration.
//!
//! Sources that do not use the published dataset's header names can supply a
//! TOML file naming their columns. Any key left out keeps its default:
//!
//! ```toml
//! shape = "shape"
//! state = "region"
//! date_time = "observed_at"
//! ```

use std::path::Path;

use ufo_map_sighting_models::ColumnMapping;

use crate::SourceError;

/// Parses a [`ColumnMapping`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or has fields of
/// the wrong type.
pub fn parse_mapping_toml(toml_str: &str) -> Result<ColumnMapping, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

/// Reads and parses a [`ColumnMapping`] TOML file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Config`] if it does not parse.
pub fn load_mapping(path: &Path) -> Result<ColumnMapping, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    let mapping = parse_mapping_toml(&contents)?;
    log::debug!("Loaded column mapping from {}", path.display());
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(parse_mapping_toml("").unwrap(), ColumnMapping::default());
    }

    #[test]
    fn overrides_only_given_columns() {
        let mapping = parse_mapping_toml("shape = \"shape\"\nstate = \"region\"\n").unwrap();
        assert_eq!(mapping.shape, "shape");
        assert_eq!(mapping.state, "region");
        assert_eq!(mapping.latitude, "latitude");
    }

    #[test]
    fn rejects_wrong_types() {
        let err = parse_mapping_toml("latitude = 5").unwrap_err();
        assert!(matches!(err, SourceError::Config { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_mapping(Path::new("/definitely/not/here/mapping.toml")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
