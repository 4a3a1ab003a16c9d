//! Input loaders for the rainfall map.
//!
//! Submodules:
//! - `rainfall`: IMD-style district rainfall JSON → `RainfallRecord`s.
//! - `boundaries`: district GeoJSON → `BoundaryFeature`s.
//!
//! Loaders only parse. They do not normalize names or judge values; that is
//! the reconciler's job.

pub mod boundaries;
pub mod rainfall;

use std::fmt;

/// Errors that can arise while reading an input file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io { path: String, source: std::io::Error },
    /// The contents were not valid JSON, or not the expected shape.
    Parse { path: String, message: String },
    /// No district-name property could be identified in a GeoJSON file.
    NoNameProperty { path: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "Could not read {}: {}", path, source),
            LoadError::Parse { path, message } => write!(f, "Parse error in {}: {}", path, message),
            LoadError::NoNameProperty { path } => {
                write!(f, "Could not identify a district name property in {}", path)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub(crate) fn read_file(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}
