//! Data processing for anomaly grids.
//!
//! This crate turns raw cell series into forms suitable for charting:
//! - `interpolation`: raw and 3-point smoothed per-year values
//! - `color_scale`: piecewise-linear anomaly -> color mapping
//! - `aggregation`: yearly means, longitude histograms and lat x year matrices

pub mod aggregation;
pub mod color_scale;
pub mod interpolation;
