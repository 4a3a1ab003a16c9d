//! District rainfall map for Maharashtra and Goa.
//!
//! Reconciles monthly district rainfall figures against district boundary
//! polygons and classifies each district by rainfall intensity.
//!
//! Modules:
//! - `model`: shared types (records, features, month, fatal errors).
//! - `reconcile`: name normalization, alias table, record → feature matching.
//! - `classify`: intensity thresholds, colors, legend.
//! - `ingest`: rainfall JSON and boundary GeoJSON loaders.
//! - `config`: TOML run configuration with environment overrides.
//! - `export`: resolved mapping JSON and annotated GeoJSON for map builders.
//! - `report`: console matching report.
//! - `pipeline`: wires the above into one batch run.
//! - `logging`: stage-tagged console/file logging.

pub mod classify;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
