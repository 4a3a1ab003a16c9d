//! Output documents for rendering collaborators.
//!
//! Two files are written per run:
//!
//! - `<month>_rainfall_resolved.json`: every district with its value,
//!   category and color, plus the diagnostics lists and the legend.
//! - `<month>_rainfall_map.geojson`: the boundary features with the same
//!   information copied into their properties, ready for a choropleth
//!   builder (`DISTRICT`, `STATE`, `RAINFALL_MM`, `RAINFALL_DISPLAY`,
//!   `CATEGORY`, `COLOR`).
//!
//! Nothing here draws anything; tooltips, legends and image formats belong
//! to whichever map builder consumes these files.

use crate::classify::{legend, Category, LegendEntry};
use crate::logging::{self, Stage};
use crate::model::{FeatureId, Month};
use crate::reconcile::{Diagnostics, Reconciliation, ResolvedDistrict};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Resolved mapping document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DistrictOutput<'a> {
    pub feature_id: &'a FeatureId,
    pub district: &'a str,
    pub state: &'a str,
    pub rainfall_mm: Option<f64>,
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
}

impl<'a> From<&'a ResolvedDistrict> for DistrictOutput<'a> {
    fn from(d: &'a ResolvedDistrict) -> Self {
        DistrictOutput {
            feature_id: &d.feature_id,
            district: &d.canonical_name,
            state: &d.state,
            rainfall_mm: d.rainfall_mm,
            category: d.category(),
            label: d.display_label(),
            color: d.color(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDocument<'a> {
    pub month: Month,
    pub generated_at: String,
    pub districts: Vec<DistrictOutput<'a>>,
    pub diagnostics: &'a Diagnostics,
    pub legend: Vec<LegendEntry>,
}

pub fn resolved_document(reconciliation: &Reconciliation) -> ResolvedDocument<'_> {
    ResolvedDocument {
        month: reconciliation.month,
        generated_at: Utc::now().to_rfc3339(),
        districts: reconciliation.districts.iter().map(DistrictOutput::from).collect(),
        diagnostics: &reconciliation.diagnostics,
        legend: legend(),
    }
}

/// Tooltip text for a rainfall value.
pub fn rainfall_display(rainfall_mm: Option<f64>) -> String {
    match rainfall_mm {
        Some(mm) => format!("{:.1} mm", mm),
        None => "No data".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Annotated GeoJSON
// ---------------------------------------------------------------------------

/// Builds a FeatureCollection of the reconciled districts, each with its own
/// boundary geometry. Features outside the reconciliation (other states) are
/// left out.
pub fn annotated_geojson(reconciliation: &Reconciliation) -> Value {
    let annotated: Vec<Value> = reconciliation
        .districts
        .iter()
        .map(|d| {
            json!({
                "type": "Feature",
                "id": d.feature_id,
                "geometry": d.geometry,
                "properties": {
                    "DISTRICT": d.canonical_name,
                    "STATE": d.state,
                    "RAINFALL_MM": d.rainfall_mm,
                    "RAINFALL_DISPLAY": rainfall_display(d.rainfall_mm),
                    "CATEGORY": d.display_label(),
                    "COLOR": d.color(),
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": annotated,
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ExportError {
    Io { path: String, source: std::io::Error },
    Json(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => write!(f, "Could not write {}: {}", path, source),
            ExportError::Json(e) => write!(f, "Could not serialize output: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<String, ExportError> {
    let display = path.display().to_string();
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: display.clone(),
        source,
    })?;
    logging::info(Stage::Export, None, &format!("Saved {}", display));
    Ok(display)
}

/// Writes the output files into `dir` (created if missing) and returns
/// their paths.
pub fn write_outputs(
    reconciliation: &Reconciliation,
    dir: &str,
    include_geojson: bool,
) -> Result<Vec<String>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_string(),
        source,
    })?;

    let month = reconciliation.month;
    let mut written = Vec::new();

    let resolved_path = Path::new(dir).join(format!("{}_rainfall_resolved.json", month));
    written.push(write_json(&resolved_path, &resolved_document(reconciliation))?);

    if include_geojson {
        let geojson_path = Path::new(dir).join(format!("{}_rainfall_map.geojson", month));
        written.push(write_json(&geojson_path, &annotated_geojson(reconciliation))?);
    }

    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
