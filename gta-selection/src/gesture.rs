//! Pointer interaction over the map.
//!
//! In `Areas` mode a press starts a rectangle drag and the release turns the
//! rectangle into a new area; moving without a press hover-tests existing
//! areas instead. Leaving the surface mid-drag cancels the rectangle. In
//! `Latitudes` mode a click adds the snapped latitude under the pointer.
//!
//! All positions are logical plane coordinates; use
//! [`PlaneGeometry::surface_to_logical`] to convert from surface pixels.

use crate::geometry::{PixelRect, PlaneGeometry, Point};
use crate::state::{AreaId, Outcome, SelectionMode};
use crate::store::SelectionStore;
use gta_grid::GridDataset;

/// Rectangle drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragGesture {
    #[default]
    Idle,
    Dragging { start: Point, current: Point },
}

impl DragGesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragGesture::Dragging { .. })
    }

    /// Begin a drag at `p`.
    pub fn press(&mut self, p: Point) {
        *self = DragGesture::Dragging { start: p, current: p };
    }

    /// Track the pointer while dragging. Returns the rectangle being drawn,
    /// or `None` when idle.
    pub fn update(&mut self, p: Point) -> Option<PixelRect> {
        match self {
            DragGesture::Dragging { start, current } => {
                *current = p;
                Some(PixelRect::from_corners(*start, p))
            }
            DragGesture::Idle => None,
        }
    }

    /// Finish the drag at `p`, returning its two corners.
    pub fn release(&mut self, p: Point) -> Option<(Point, Point)> {
        match std::mem::take(self) {
            DragGesture::Dragging { start, .. } => Some((start, p)),
            DragGesture::Idle => None,
        }
    }

    /// Abandon the drag. Returns true if one was in progress.
    pub fn cancel(&mut self) -> bool {
        matches!(std::mem::take(self), DragGesture::Dragging { .. })
    }

    /// Rectangle currently being drawn.
    pub fn rect(&self) -> Option<PixelRect> {
        match self {
            DragGesture::Dragging { start, current } => {
                Some(PixelRect::from_corners(*start, *current))
            }
            DragGesture::Idle => None,
        }
    }
}

/// What a pointer move did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEffect {
    /// No gesture applies in the current mode.
    None,
    /// Idle move: the area under the pointer, if any.
    Hover(Option<AreaId>),
    /// Drag in progress: the rectangle to draw.
    DragUpdated(PixelRect),
}

/// Connects pointer events on the map to a [`SelectionStore`].
#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    geometry: PlaneGeometry,
    gesture: DragGesture,
    hovered: Option<AreaId>,
}

impl MapInteraction {
    pub fn new(geometry: PlaneGeometry) -> Self {
        Self {
            geometry,
            gesture: DragGesture::Idle,
            hovered: None,
        }
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    /// Area currently under the pointer (idle hover only).
    pub fn hovered(&self) -> Option<AreaId> {
        self.hovered
    }

    pub fn pointer_down(&mut self, store: &SelectionStore, p: Point) {
        if store.state().mode() != SelectionMode::Areas {
            return;
        }
        self.gesture.press(p);
        self.hovered = None;
    }

    pub fn pointer_move(
        &mut self,
        dataset: &GridDataset,
        store: &SelectionStore,
        p: Point,
    ) -> PointerEffect {
        if store.state().mode() != SelectionMode::Areas {
            return PointerEffect::None;
        }
        if let Some(rect) = self.gesture.update(p) {
            self.hovered = None;
            return PointerEffect::DragUpdated(rect);
        }
        self.hovered = self.geometry.hit_test_area(dataset, store.state(), p);
        PointerEffect::Hover(self.hovered)
    }

    /// End a drag. Creates an area when the rectangle covers any cell and
    /// returns the store's outcome; `None` if no drag was in progress or
    /// the rectangle was empty.
    pub fn pointer_up(
        &mut self,
        dataset: &GridDataset,
        store: &mut SelectionStore,
        p: Point,
    ) -> Option<Outcome> {
        let (start, end) = self.gesture.release(p)?;
        if store.state().mode() != SelectionMode::Areas {
            return None;
        }
        let cell_ids = self.geometry.rect_to_cell_ids(dataset, start, end);
        if cell_ids.is_empty() {
            log::debug!("[GTA] gesture: drag released over no cells");
            return None;
        }
        log::debug!("[GTA] gesture: drag selected {} cells", cell_ids.len());
        Some(store.create_area_from_cells(&cell_ids))
    }

    /// Pointer left the surface: cancel any drag and clear the hover.
    pub fn pointer_leave(&mut self) {
        if self.gesture.cancel() {
            log::debug!("[GTA] gesture: drag cancelled");
        }
        self.hovered = None;
    }

    /// Click in `Latitudes` mode adds the snapped latitude under the pointer.
    pub fn click(&mut self, store: &mut SelectionStore, p: Point) -> Option<Outcome> {
        if store.state().mode() != SelectionMode::Latitudes {
            return None;
        }
        let lat = self.geometry.latitude_at(p);
        Some(store.add_latitude(lat))
    }
}
