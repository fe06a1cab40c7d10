//! Map plane geometry.
//!
//! The map is a flat logical plane of `width x height` units: longitude
//! `[-180, 180]` runs left to right over `[0, width]` and latitude
//! `[90, -90]` runs top to bottom over `[0, height]`. Both mappings are
//! linear, so the inverse is exact.

use crate::state::{Area, AreaId, SelectionState};
use gta_grid::{Cell, CellId, GridDataset};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 1500.0;
pub const DEFAULT_HEIGHT: f64 = 700.0;
/// Grid resolution of the dataset, in degrees.
pub const DEFAULT_GRID_STEP: i32 = 4;
/// Outermost latitudes carrying grid cells.
pub const DEFAULT_LAT_EXTENT: (i32, i32) = (-88, 88);

/// A point in logical plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in logical plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Normalized rectangle spanning two corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        PixelRect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Inclusive lat/lon bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Size and grid resolution of the logical map plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneGeometry {
    pub width: f64,
    pub height: f64,
    pub grid_step: i32,
    pub lat_min: i32,
    pub lat_max: i32,
}

impl Default for PlaneGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            grid_step: DEFAULT_GRID_STEP,
            lat_min: DEFAULT_LAT_EXTENT.0,
            lat_max: DEFAULT_LAT_EXTENT.1,
        }
    }
}

impl PlaneGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Forward mapping: geographic position to plane point.
    pub fn lat_lon_to_pointer(&self, lat: f64, lon: f64) -> Point {
        Point {
            x: (lon + 180.0) / 360.0 * self.width,
            y: (90.0 - lat) / 180.0 * self.height,
        }
    }

    /// Inverse mapping: plane point to `(lat, lon)`.
    pub fn pointer_to_lat_lon(&self, p: Point) -> (f64, f64) {
        let lon = p.x / self.width * 360.0 - 180.0;
        let lat = 90.0 - p.y / self.height * 180.0;
        (lat, lon)
    }

    /// Convert a position on the rendered surface (which may be scaled)
    /// into plane coordinates.
    pub fn surface_to_logical(&self, p: Point, surface_width: f64, surface_height: f64) -> Point {
        if surface_width <= 0.0 || surface_height <= 0.0 {
            return p;
        }
        Point {
            x: p.x * self.width / surface_width,
            y: p.y * self.height / surface_height,
        }
    }

    /// Footprint of one grid cell on the plane, `(width, height)`.
    pub fn cell_size(&self) -> (f64, f64) {
        let step = self.grid_step as f64;
        (step / 360.0 * self.width, step / 180.0 * self.height)
    }

    /// Round a latitude to the grid step (halves round up) and clamp it to
    /// the latitude extent.
    pub fn snap_latitude(&self, lat: f64) -> i32 {
        let (lo, hi) = (self.lat_min.min(self.lat_max), self.lat_min.max(self.lat_max));
        let step = self.grid_step.max(1) as f64;
        let lat = lat.clamp(lo as f64, hi as f64);
        let snapped = ((lat / step) + 0.5).floor() * step;
        (snapped as i32).clamp(lo, hi)
    }

    /// Snapped latitude under a plane point.
    pub fn latitude_at(&self, p: Point) -> i32 {
        self.snap_latitude(self.pointer_to_lat_lon(p).0)
    }

    /// Lat/lon box covered by a rectangle given by two corners.
    pub fn rect_to_bounds(&self, a: Point, b: Point) -> LatLonBounds {
        let (lat_a, lon_a) = self.pointer_to_lat_lon(a);
        let (lat_b, lon_b) = self.pointer_to_lat_lon(b);
        LatLonBounds {
            lat_min: lat_a.min(lat_b),
            lat_max: lat_a.max(lat_b),
            lon_min: lon_a.min(lon_b),
            lon_max: lon_a.max(lon_b),
        }
    }

    /// Cells whose position falls inside the rectangle spanned by two
    /// plane corners (bounds inclusive), in dataset order.
    pub fn rect_to_cell_ids(&self, dataset: &GridDataset, a: Point, b: Point) -> Vec<CellId> {
        let bounds = self.rect_to_bounds(a, b);
        dataset
            .iter()
            .filter(|(_, cell)| bounds.contains(cell.lat as f64, cell.lon as f64))
            .map(|(id, _)| id)
            .collect()
    }

    /// Plane rectangle drawn for a cell, centered on its position.
    pub fn cell_footprint(&self, cell: &Cell) -> PixelRect {
        let (w, h) = self.cell_size();
        let center = self.lat_lon_to_pointer(cell.lat as f64, cell.lon as f64);
        PixelRect {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            width: w,
            height: h,
        }
    }

    /// Union of the footprints of an area's cells. `None` if none of its
    /// cells exist in the dataset.
    pub fn area_bounds(&self, dataset: &GridDataset, area: &Area) -> Option<PixelRect> {
        area.cell_ids
            .iter()
            .filter_map(|id| dataset.cell_at(*id))
            .map(|cell| self.cell_footprint(cell))
            .reduce(|acc, r| acc.union(&r))
    }

    /// First area, in draw order, whose bounding box contains the point.
    pub fn hit_test_area(
        &self,
        dataset: &GridDataset,
        state: &SelectionState,
        p: Point,
    ) -> Option<AreaId> {
        state
            .areas()
            .iter()
            .find(|area| {
                self.area_bounds(dataset, area)
                    .map(|r| r.contains(p))
                    .unwrap_or(false)
            })
            .map(|area| area.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Action;
    use gta_grid::YearValue;

    /// 3 x 3 block of cells at lat {0, 4, 8} x lon {0, 4, 8}; id = row * 3 + col.
    fn block() -> GridDataset {
        let mut cells = Vec::new();
        for lat in [0, 4, 8] {
            for lon in [0, 4, 8] {
                cells.push(Cell::new(lat, lon, vec![YearValue::new(2000, Some(0.0))]));
            }
        }
        GridDataset::new(cells).unwrap()
    }

    #[test]
    fn test_forward_mapping_corners() {
        let g = PlaneGeometry::default();
        assert_eq!(g.lat_lon_to_pointer(90.0, -180.0), Point::new(0.0, 0.0));
        assert_eq!(g.lat_lon_to_pointer(-90.0, 180.0), Point::new(1500.0, 700.0));
        assert_eq!(g.lat_lon_to_pointer(0.0, 0.0), Point::new(750.0, 350.0));
    }

    #[test]
    fn test_round_trip_within_half_cell() {
        let g = PlaneGeometry::default();
        let (cw, ch) = g.cell_size();
        let mut x = 0.0;
        while x <= g.width {
            let mut y = 0.0;
            while y <= g.height {
                let (lat, lon) = g.pointer_to_lat_lon(Point::new(x, y));
                let back = g.lat_lon_to_pointer(lat, lon);
                assert!((back.x - x).abs() <= cw / 2.0);
                assert!((back.y - y).abs() <= ch / 2.0);
                y += 37.3;
            }
            x += 41.7;
        }
    }

    #[test]
    fn test_surface_scaling() {
        let g = PlaneGeometry::default();
        let p = g.surface_to_logical(Point::new(375.0, 175.0), 750.0, 350.0);
        assert_eq!(p, Point::new(750.0, 350.0));
        // degenerate surface passes through
        assert_eq!(g.surface_to_logical(p, 0.0, 10.0), p);
    }

    #[test]
    fn test_snap_latitude() {
        let g = PlaneGeometry::default();
        assert_eq!(g.snap_latitude(5.9), 4);
        assert_eq!(g.snap_latitude(6.0), 8);
        assert_eq!(g.snap_latitude(-2.0), 0);
        assert_eq!(g.snap_latitude(-6.1), -8);
        assert_eq!(g.snap_latitude(89.9), 88);
        assert_eq!(g.snap_latitude(-90.0), -88);
        assert_eq!(g.latitude_at(Point::new(10.0, 350.0)), 0);
    }

    #[test]
    fn test_snap_latitude_far_out_of_range() {
        let g = PlaneGeometry::default();
        assert_eq!(g.snap_latitude(-1.0e10), -88);
        assert_eq!(g.snap_latitude(1.0e10), 88);
        assert_eq!(g.snap_latitude(f64::INFINITY), 88);
        assert_eq!(g.snap_latitude(f64::NEG_INFINITY), -88);
        assert_eq!(g.latitude_at(Point::new(0.0, -1.0e12)), 88);
    }

    #[test]
    fn test_rect_selects_inclusive_bounds() {
        let g = PlaneGeometry::default();
        let ds = block();
        // covers lat 4..8, lon 0..4
        let a = g.lat_lon_to_pointer(9.0, -1.0);
        let b = g.lat_lon_to_pointer(3.0, 5.0);
        assert_eq!(g.rect_to_cell_ids(&ds, a, b), vec![3, 4, 6, 7]);
        // corner order does not matter
        assert_eq!(g.rect_to_cell_ids(&ds, b, a), vec![3, 4, 6, 7]);
        // empty rectangle away from the block
        let far = g.lat_lon_to_pointer(-50.0, -100.0);
        assert!(g.rect_to_cell_ids(&ds, far, far).is_empty());
    }

    #[test]
    fn test_area_bounds_and_hit_test() {
        let g = PlaneGeometry::default();
        let ds = block();
        let state = SelectionState::new()
            .apply(Action::CreateAreaFromCells(vec![0, 1]))
            .0
            .apply(Action::CreateAreaFromCells(vec![1, 2, 8]))
            .0;

        let first = g.area_bounds(&ds, &state.areas()[0]).unwrap();
        let (cw, ch) = g.cell_size();
        assert!((first.width - (cw + 4.0 / 360.0 * 1500.0)).abs() < 1e-9);
        assert!((first.height - ch).abs() < 1e-9);

        // center of cell 1 lies in both boxes: draw order picks the first
        let on_cell_1 = g.lat_lon_to_pointer(0.0, 4.0);
        assert_eq!(g.hit_test_area(&ds, &state, on_cell_1), Some(1));
        // cell 8 (lat 8, lon 8) is only inside the second area
        let on_cell_8 = g.lat_lon_to_pointer(8.0, 8.0);
        assert_eq!(g.hit_test_area(&ds, &state, on_cell_8), Some(2));
        assert_eq!(g.hit_test_area(&ds, &state, Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_area_bounds_skips_unknown_cells() {
        let g = PlaneGeometry::default();
        let ds = block();
        let state = SelectionState::new()
            .apply(Action::CreateAreaFromCells(vec![500]))
            .0;
        assert_eq!(g.area_bounds(&ds, &state.areas()[0]), None);
        assert_eq!(g.hit_test_area(&ds, &state, Point::new(750.0, 350.0)), None);
    }
}
