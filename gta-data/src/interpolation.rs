//! Per-year value resolution for a single cell.

use gta_grid::Cell;
use serde::{Deserialize, Serialize};

/// Weights applied to the previous, center and next year.
pub const SMOOTHING_WEIGHTS: [f64; 3] = [0.25, 0.5, 0.25];

/// Which value a query resolves for a cell and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleMode {
    /// The sample exactly as measured.
    Raw,
    /// The 3-point weighted average around the year.
    #[default]
    Smoothed,
}

/// The measured value for `year`, unsmoothed. `None` when the year is
/// absent from the series or recorded as NA.
pub fn raw_value(cell: &Cell, year: i32) -> Option<f64> {
    cell.value(year)
}

/// Smoothed value for `year`.
///
/// `0.25 * prev + 0.5 * center + 0.25 * next`, where a missing or NA
/// neighbour is replaced by the center value. A missing center yields
/// `None`: no value is ever produced for a year without data.
///
/// # Example
///
/// ```rust
/// use gta_data::interpolation::smoothed_value;
/// use gta_grid::{Cell, YearValue};
///
/// let cell = Cell::new(0, 0, vec![
///     YearValue::new(2000, Some(0.0)),
///     YearValue::new(2001, Some(1.0)),
///     YearValue::new(2002, Some(4.0)),
/// ]);
/// assert_eq!(smoothed_value(&cell, 2001), Some(1.5));
/// ```
pub fn smoothed_value(cell: &Cell, year: i32) -> Option<f64> {
    let c = cell.value(year)?;
    let p = cell.value(year - 1).unwrap_or(c);
    let n = cell.value(year + 1).unwrap_or(c);
    let [wp, wc, wn] = SMOOTHING_WEIGHTS;
    Some(wp * p + wc * c + wn * n)
}

/// Resolve the value of `cell` at `year` in the given mode.
pub fn sample(cell: &Cell, year: i32, mode: SampleMode) -> Option<f64> {
    match mode {
        SampleMode::Raw => raw_value(cell, year),
        SampleMode::Smoothed => smoothed_value(cell, year),
    }
}
