/// RainfallRecord, BoundaryFeature, Month, FeatureId, FatalInputError
/// core data structures shared by ingest, reconcile and classify.
///
/// Core data types for the district rainfall map.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no matching or classification logic and no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Month identifier
// ---------------------------------------------------------------------------

/// Calendar month a rainfall dataset refers to.
///
/// Accepted spellings: `"2025-06"`, `"June 2025"`, `"June_2025"`, `"jun 2025"`.
/// Always displayed (and serialized) as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("month number out of range: {}", month));
        }
        Ok(Month { year, month })
    }

    /// English month name, e.g. "June".
    pub fn name(&self) -> &'static str {
        chrono::Month::try_from(self.month as u8)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Numeric form: YYYY-MM
        if let Some((y, m)) = trimmed.split_once('-') {
            if let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>()) {
                return Month::new(year, month);
            }
        }

        // Named form: "June 2025", "June_2025", "Jun 2025"
        let parts: Vec<&str> = trimmed
            .split(|c: char| c == ' ' || c == '_')
            .filter(|p| !p.is_empty())
            .collect();
        if let [name, year] = parts.as_slice() {
            let named = chrono::Month::from_str(name)
                .map_err(|_| format!("unrecognised month name: '{}'", name))?;
            let year = year
                .parse::<i32>()
                .map_err(|_| format!("unrecognised year: '{}'", year))?;
            return Month::new(year, named.number_from_month());
        }

        Err(format!("unrecognised month identifier: '{}'", s))
    }
}

impl TryFrom<String> for Month {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Rainfall records
// ---------------------------------------------------------------------------

/// One observed monthly rainfall total for a district, as given by the
/// meteorological dataset.
///
/// `district_name` is kept exactly as it appeared in the source so that
/// diagnostics can quote it back to whoever maintains the alias table.
/// `rainfall_mm` may be negative or non-finite if the source was malformed;
/// the reconciler rejects such records rather than the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRecord {
    pub district_name: String,
    pub rainfall_mm: f64,
    pub month: Month,
}

impl RainfallRecord {
    pub fn new(district_name: impl Into<String>, rainfall_mm: f64, month: Month) -> Self {
        RainfallRecord {
            district_name: district_name.into(),
            rainfall_mm,
            month,
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary features
// ---------------------------------------------------------------------------

/// Stable identifier of a boundary polygon, e.g. `"maharashtra/27"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        FeatureId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A district polygon from the boundary dataset.
///
/// `canonical_name` is the ground truth for matching. `geometry` is carried
/// through untouched as the GeoJSON geometry object; nothing in the core
/// looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub feature_id: FeatureId,
    pub canonical_name: String,
    pub state: String,
    pub geometry: serde_json::Value,
}

impl BoundaryFeature {
    pub fn new(
        feature_id: impl Into<String>,
        canonical_name: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        BoundaryFeature {
            feature_id: FeatureId::new(feature_id),
            canonical_name: canonical_name.into(),
            state: state.into(),
            geometry: serde_json::Value::Null,
        }
    }

    pub fn with_geometry(mut self, geometry: serde_json::Value) -> Self {
        self.geometry = geometry;
        self
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Input problems that leave nothing to reconcile. These abort the run;
/// every other problem is collected as a diagnostic instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FatalInputError {
    /// No boundary features fall inside the configured states.
    EmptyBoundaries { states: Vec<String> },
    /// No rainfall records exist for the requested month.
    EmptyRainfall { month: Month },
}

impl fmt::Display for FatalInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalInputError::EmptyBoundaries { states } => write!(
                f,
                "Boundary dataset has no features for states: {}",
                states.join(", ")
            ),
            FatalInputError::EmptyRainfall { month } => {
                write!(f, "Rainfall dataset has no records for month {}", month)
            }
        }
    }
}

impl std::error::Error for FatalInputError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
