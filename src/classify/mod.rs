//! Rainfall intensity classification.
//!
//! Submodules:
//! - `thresholds`: the fixed mm boundaries and the `classify` function.
//! - `palette`: category colors and legend rows for renderers.

pub mod palette;
pub mod thresholds;

pub use palette::{color_for, legend, LegendEntry, NEUTRAL_COLOR};
pub use thresholds::{classify, Category};
