//! Immutable in-memory anomaly grid.

use crate::cell::Cell;
use gta_utils::error::GridError;
use std::collections::{BTreeSet, HashMap};

/// Stable handle of a cell: its position in the dataset's cell sequence.
pub type CellId = usize;

/// Range reported by [`GridDataset::global_range`] when the dataset holds no
/// measured value at all.
pub const FALLBACK_RANGE: (f64, f64) = (-3.0, 4.0);

/// Read-only anomaly grid.
///
/// Built once from an ordered list of cells; a `(lat, lon) -> CellId` index,
/// the distinct latitudes/longitudes and the global value range are
/// computed up front so every query afterwards is a lookup.
#[derive(Debug, Clone)]
pub struct GridDataset {
    cells: Vec<Cell>,
    index: HashMap<(i32, i32), CellId>,
    latitudes: Vec<i32>,
    longitudes: Vec<i32>,
    range: Option<(f64, f64)>,
    year_span: Option<(i32, i32)>,
}

impl GridDataset {
    /// Build a dataset from cells in their canonical order.
    ///
    /// Fails if two cells share the same `(lat, lon)` pair.
    pub fn new(cells: Vec<Cell>) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(cells.len());
        let mut latitudes = BTreeSet::new();
        let mut longitudes = BTreeSet::new();
        let mut range: Option<(f64, f64)> = None;
        let mut year_span: Option<(i32, i32)> = None;

        for (id, cell) in cells.iter().enumerate() {
            if index.insert((cell.lat, cell.lon), id).is_some() {
                return Err(GridError::DuplicateCell {
                    lat: cell.lat,
                    lon: cell.lon,
                }
                .into());
            }
            latitudes.insert(cell.lat);
            longitudes.insert(cell.lon);

            for v in cell.values() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
            if let (Some(first), Some(last)) = (cell.data().first(), cell.data().last()) {
                year_span = Some(match year_span {
                    Some((lo, hi)) => (lo.min(first.year), hi.max(last.year)),
                    None => (first.year, last.year),
                });
            }
        }

        log::debug!(
            "[GTA] dataset: {} cells, {} latitudes, {} longitudes",
            cells.len(),
            latitudes.len(),
            longitudes.len()
        );

        Ok(Self {
            cells,
            index,
            latitudes: latitudes.into_iter().collect(),
            longitudes: longitudes.into_iter().collect(),
            range,
            year_span,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over `(CellId, &Cell)` pairs in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate()
    }

    /// Cell by index, O(1).
    pub fn cell_at(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Index of the cell at exactly `(lat, lon)`.
    pub fn find_cell(&self, lat: i32, lon: i32) -> Option<CellId> {
        self.index.get(&(lat, lon)).copied()
    }

    /// Measured value of a cell for `year`, without smoothing.
    pub fn raw_value(&self, id: CellId, year: i32) -> Option<f64> {
        self.cell_at(id).and_then(|c| c.value(year))
    }

    /// `(min, max)` over every measured value of every cell, or
    /// [`FALLBACK_RANGE`] when the dataset has none.
    pub fn global_range(&self) -> (f64, f64) {
        self.range.unwrap_or(FALLBACK_RANGE)
    }

    /// Sorted distinct latitudes present in the dataset.
    pub fn latitudes(&self) -> &[i32] {
        &self.latitudes
    }

    /// Sorted distinct longitudes present in the dataset.
    pub fn longitudes(&self) -> &[i32] {
        &self.longitudes
    }

    /// First and last year found in any series.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        self.year_span
    }
}
