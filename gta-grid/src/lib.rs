//! Core grid types for global temperature anomaly data.
//!
//! A dataset is an ordered sequence of [`cell::Cell`]s, each holding a sparse
//! yearly anomaly series. Cells are addressed by their position in the
//! dataset ([`dataset::CellId`]); selections never key on `(lat, lon)`.

pub mod cell;
pub mod dataset;
pub mod loader;

pub use cell::{Cell, YearValue};
pub use dataset::{CellId, GridDataset};
