/// Display colors and legend entries for rainfall categories.
///
/// Colors are fixed: a renderer given the same category always paints the
/// same fill, with no per-run state.

use super::thresholds::Category;
use serde::Serialize;

/// Neutral fill for districts that are unclassified or have no data.
pub const NEUTRAL_COLOR: &str = "#D3D3D3";

/// Fill color for a category, as a `#RRGGBB` hex string.
pub fn color_for(category: Category) -> &'static str {
    match category {
        Category::Unclassified => NEUTRAL_COLOR,
        Category::Moderate => "#FFFFE0",
        Category::Heavy => "#FFA500",
        Category::VeryHeavy => "#FF0000",
        Category::ExtremelyHeavy => "#8B0000",
    }
}

/// One row of a map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: Category,
    pub label: &'static str,
    pub range: &'static str,
    pub color: &'static str,
}

/// Legend rows ordered from lowest to highest intensity.
pub fn legend() -> Vec<LegendEntry> {
    Category::ALL
        .iter()
        .map(|&category| LegendEntry {
            category,
            label: category.label(),
            range: category.range_text(),
            color: color_for(category),
        })
        .collect()
}
