//! Rainfall intensity thresholds.
//!
//! Categories follow the IMD convention for rainfall amounts, with inclusive
//! lower bounds:
//!
//!   15.6 – 64.4   Moderate
//!   64.5 – 115.5  Heavy
//!   115.6 – 204.4 Very Heavy
//!   ≥ 204.5       Extremely Heavy
//!
//! Source values carry one decimal place, so comparisons are done on the
//! value rounded to the nearest tenth of a millimetre, held as an integer.
//! That keeps 64.5 in Heavy even when it arrives as 64.49999999 after float
//! arithmetic, and guarantees every value lands in exactly one category.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bounds in tenths of a millimetre.
pub const MODERATE_MIN_TENTHS: i64 = 156;
pub const HEAVY_MIN_TENTHS: i64 = 645;
pub const VERY_HEAVY_MIN_TENTHS: i64 = 1156;
pub const EXTREMELY_HEAVY_MIN_TENTHS: i64 = 2045;

/// Rainfall intensity categories, in ascending order.
///
/// `Unclassified` covers both "below the Moderate threshold" and "no data";
/// [`ResolvedDistrict::display_label`](crate::reconcile::ResolvedDistrict::display_label)
/// tells the two apart for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Unclassified,
    Moderate,
    Heavy,
    VeryHeavy,
    ExtremelyHeavy,
}

impl Category {
    /// All categories from lowest to highest.
    pub const ALL: [Category; 5] = [
        Category::Unclassified,
        Category::Moderate,
        Category::Heavy,
        Category::VeryHeavy,
        Category::ExtremelyHeavy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Unclassified => "Unclassified",
            Category::Moderate => "Moderate",
            Category::Heavy => "Heavy",
            Category::VeryHeavy => "Very Heavy",
            Category::ExtremelyHeavy => "Extremely Heavy",
        }
    }

    /// Human-readable range, as printed in legends.
    pub fn range_text(&self) -> &'static str {
        match self {
            Category::Unclassified => "< 15.6 mm or no data",
            Category::Moderate => "15.6 – 64.4 mm",
            Category::Heavy => "64.5 – 115.5 mm",
            Category::VeryHeavy => "115.6 – 204.4 mm",
            Category::ExtremelyHeavy => "≥ 204.5 mm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rounds a millimetre value to an integer count of tenths.
///
/// Returns `None` for NaN and infinities.
pub fn to_tenths(rainfall_mm: f64) -> Option<i64> {
    if !rainfall_mm.is_finite() {
        return None;
    }
    Some((rainfall_mm * 10.0).round() as i64)
}

/// Classifies a rainfall amount.
///
/// `None` (no data), non-finite values and anything below 15.6 mm are
/// `Unclassified`. Pure and total: the same input always gives the same
/// category.
pub fn classify(rainfall_mm: Option<f64>) -> Category {
    let Some(tenths) = rainfall_mm.and_then(to_tenths) else {
        return Category::Unclassified;
    };

    if tenths >= EXTREMELY_HEAVY_MIN_TENTHS {
        Category::ExtremelyHeavy
    } else if tenths >= VERY_HEAVY_MIN_TENTHS {
        Category::VeryHeavy
    } else if tenths >= HEAVY_MIN_TENTHS {
        Category::Heavy
    } else if tenths >= MODERATE_MIN_TENTHS {
        Category::Moderate
    } else {
        Category::Unclassified
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
