/// District rainfall JSON loader
///
/// Reads the "realized rainfall" tables published per month: a JSON array of
/// objects, one per district, e.g.
///
/// ```json
/// [
///   { "DISTRICT": "PUNE", "R/F": 182.4 },
///   { "DISTRICT": "BEED", "R/F": "71.0", "MONTH": "June 2025" }
/// ]
/// ```
///
/// `R/F` may be a number or a numeric string. Anything else (blank, "NA",
/// null) loads as NaN so the reconciler can report it rather than the
/// loader silently dropping the row. `MONTH` is optional; rows without it
/// belong to the month the caller passes in.

use super::{read_file, LoadError};
use crate::logging::{self, Stage};
use crate::model::{Month, RainfallRecord};
use serde::Deserialize;

// ============================================================================
// Source row
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRainfallRow {
    #[serde(rename = "DISTRICT")]
    district: String,
    #[serde(rename = "R/F", default)]
    rainfall: serde_json::Value,
    #[serde(rename = "MONTH", default)]
    month: Option<String>,
}

/// Interprets an `R/F` cell. Non-numeric cells become NaN.
fn parse_rainfall_value(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses rainfall JSON text. `source` names the input in error messages.
pub fn parse_rainfall_json(
    json: &str,
    default_month: Month,
    source: &str,
) -> Result<Vec<RainfallRecord>, LoadError> {
    let rows: Vec<RawRainfallRow> = serde_json::from_str(json).map_err(|e| LoadError::Parse {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let month = match row.month.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                text.parse::<Month>().map_err(|e| LoadError::Parse {
                    path: source.to_string(),
                    message: format!("row {}: {}", i, e),
                })?
            }
            _ => default_month,
        };

        let rainfall_mm = parse_rainfall_value(&row.rainfall);
        if rainfall_mm.is_nan() {
            logging::debug(
                Stage::Rainfall,
                Some(&row.district),
                &format!("Non-numeric R/F value: {}", row.rainfall),
            );
        }

        records.push(RainfallRecord {
            district_name: row.district,
            rainfall_mm,
            month,
        });
    }

    Ok(records)
}

/// Loads rainfall records from a file.
pub fn load_rainfall(path: &str, default_month: Month) -> Result<Vec<RainfallRecord>, LoadError> {
    let text = read_file(path)?;
    let records = parse_rainfall_json(&text, default_month, path)?;
    logging::info(
        Stage::Rainfall,
        None,
        &format!("Loaded {} rainfall records from {}", records.len(), path),
    );
    Ok(records)
}

// ============================================================================
// Tests
// ============================================================================
