//! Aggregates feeding the chart views.
//!
//! Every aggregate is a mean over the cells that have a value, where a
//! value is resolved per [`SampleMode`]. Cells without data are left out of
//! the mean rather than counted as zero, and an aggregate with no
//! contributing cell is omitted from the result.
//!
//! Years passed in are clamped into the aggregator's [`YearRange`].

use crate::interpolation::{sample, SampleMode};
use gta_grid::{CellId, GridDataset};
use gta_selection::geometry::LatLonBounds;
use gta_selection::{AreaId, GroupId, SelectionState};
use gta_utils::years::YearRange;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Mean anomaly for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearMean {
    pub year: i32,
    pub value: f64,
}

/// One histogram bar: mean anomaly at a longitude across selected latitudes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LonMean {
    pub longitude: i32,
    pub value: f64,
    /// Cells at this longitude on the selected latitudes, with or without data.
    pub cell_ids: Vec<CellId>,
}

/// Extent and current mean of an area (hover tooltip payload).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub area_id: AreaId,
    pub name: String,
    pub bounds: LatLonBounds,
    pub year: i32,
    /// `None` when no cell of the area has data for the year.
    pub anomaly: Option<f64>,
}

/// Arithmetic mean; `None` for no values.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Read-only aggregation over a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    dataset: &'a GridDataset,
    years: YearRange,
    mode: SampleMode,
}

impl<'a> Aggregator<'a> {
    /// Smoothed values over the default year range.
    pub fn new(dataset: &'a GridDataset) -> Self {
        Self {
            dataset,
            years: YearRange::default(),
            mode: SampleMode::Smoothed,
        }
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_mode(mut self, mode: SampleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn mode(&self) -> SampleMode {
        self.mode
    }

    /// Value of one cell at a year; `None` for unknown cells or no data.
    pub fn cell_value(&self, id: CellId, year: i32) -> Option<f64> {
        let year = self.years.clamp(year);
        self.dataset
            .cell_at(id)
            .and_then(|cell| sample(cell, year, self.mode))
    }

    /// Mean over `cell_ids` at `year`.
    pub fn mean_at(&self, cell_ids: &[CellId], year: i32) -> Option<f64> {
        mean(cell_ids.iter().filter_map(|id| self.cell_value(*id, year)))
    }

    /// Mean over the cells for every year of the range. Years without any
    /// contributing cell are left out.
    pub fn yearly_series_for_cells(&self, cell_ids: &[CellId]) -> Vec<YearMean> {
        let cells: Vec<_> = cell_ids
            .iter()
            .filter_map(|id| self.dataset.cell_at(*id))
            .collect();
        let series: Vec<YearMean> = self
            .years
            .iter()
            .filter_map(|year| {
                mean(cells.iter().filter_map(|cell| sample(cell, year, self.mode)))
                    .map(|value| YearMean { year, value })
            })
            .collect();
        log::debug!(
            "[GTA] aggregation: yearly series over {} cells has {} years",
            cells.len(),
            series.len()
        );
        series
    }

    /// Yearly series of one area; `None` if the area does not exist.
    pub fn yearly_series_for_area(
        &self,
        state: &SelectionState,
        area_id: AreaId,
    ) -> Option<Vec<YearMean>> {
        let area = state.area(area_id)?;
        Some(self.yearly_series_for_cells(&area.cell_ids))
    }

    /// Yearly series over the union of a group's area cells; `None` if the
    /// group does not exist.
    pub fn yearly_series_for_group(
        &self,
        state: &SelectionState,
        group_id: GroupId,
    ) -> Option<Vec<YearMean>> {
        let cells = state.group_cell_ids(group_id)?;
        Some(self.yearly_series_for_cells(&cells))
    }

    /// Yearly series over every cell lying on one of `latitudes`.
    pub fn latitude_band_series(&self, latitudes: &[i32]) -> Vec<YearMean> {
        let wanted: HashSet<i32> = latitudes.iter().copied().collect();
        let cells: Vec<CellId> = self
            .dataset
            .iter()
            .filter(|(_, cell)| wanted.contains(&cell.lat))
            .map(|(id, _)| id)
            .collect();
        self.yearly_series_for_cells(&cells)
    }

    /// For each longitude in the dataset, the mean at `year` over cells on
    /// the selected latitudes. Sorted by longitude; longitudes without data
    /// are omitted.
    pub fn latitude_longitude_histogram(&self, latitudes: &[i32], year: i32) -> Vec<LonMean> {
        if latitudes.is_empty() {
            return Vec::new();
        }
        let year = self.years.clamp(year);
        let wanted: HashSet<i32> = latitudes.iter().copied().collect();

        let mut by_lon: BTreeMap<i32, (Vec<CellId>, Vec<f64>)> = BTreeMap::new();
        for (id, cell) in self.dataset.iter() {
            if !wanted.contains(&cell.lat) {
                continue;
            }
            let entry = by_lon.entry(cell.lon).or_default();
            entry.0.push(id);
            if let Some(v) = sample(cell, year, self.mode) {
                entry.1.push(v);
            }
        }

        by_lon
            .into_iter()
            .filter_map(|(longitude, (cell_ids, values))| {
                mean(values).map(|value| LonMean {
                    longitude,
                    value,
                    cell_ids,
                })
            })
            .collect()
    }

    /// Mean per `(latitude, year)` over all cells on that latitude. Pairs
    /// without data are absent from the map.
    pub fn latitude_by_year_matrix(
        &self,
        latitudes: &[i32],
        years: &[i32],
    ) -> BTreeMap<(i32, i32), f64> {
        let mut cells_by_lat: BTreeMap<i32, Vec<CellId>> = BTreeMap::new();
        let wanted: BTreeSet<i32> = latitudes.iter().copied().collect();
        for (id, cell) in self.dataset.iter() {
            if wanted.contains(&cell.lat) {
                cells_by_lat.entry(cell.lat).or_default().push(id);
            }
        }
        let years: BTreeSet<i32> = years.iter().map(|y| self.years.clamp(*y)).collect();

        let mut matrix = BTreeMap::new();
        for (lat, cells) in &cells_by_lat {
            for year in &years {
                if let Some(v) = self.mean_at(cells, *year) {
                    matrix.insert((*lat, *year), v);
                }
            }
        }
        log::debug!(
            "[GTA] aggregation: matrix {} latitudes x {} years, {} filled",
            cells_by_lat.len(),
            years.len(),
            matrix.len()
        );
        matrix
    }

    /// Extent of an area and its mean anomaly at `year`.
    pub fn area_summary(
        &self,
        state: &SelectionState,
        area_id: AreaId,
        year: i32,
    ) -> Option<AreaSummary> {
        let area = state.area(area_id)?;
        let cells: Vec<_> = area
            .cell_ids
            .iter()
            .filter_map(|id| self.dataset.cell_at(*id))
            .collect();
        let first = cells.first()?;

        let mut bounds = LatLonBounds {
            lat_min: first.lat as f64,
            lat_max: first.lat as f64,
            lon_min: first.lon as f64,
            lon_max: first.lon as f64,
        };
        for cell in &cells[1..] {
            bounds.lat_min = bounds.lat_min.min(cell.lat as f64);
            bounds.lat_max = bounds.lat_max.max(cell.lat as f64);
            bounds.lon_min = bounds.lon_min.min(cell.lon as f64);
            bounds.lon_max = bounds.lon_max.max(cell.lon as f64);
        }

        let year = self.years.clamp(year);
        Some(AreaSummary {
            area_id,
            name: area.name.clone(),
            bounds,
            year,
            anomaly: mean(cells.iter().filter_map(|c| sample(c, year, self.mode))),
        })
    }
}
