//! Owned selection store.
//!
//! `SelectionStore` holds the current [`SelectionState`] and swaps it for the
//! reducer's successor in a single assignment, so a reader never sees a
//! half-applied action. Each store is an ordinary value: create as many as
//! needed and pass them to whatever drives them.

use crate::state::{Action, AreaId, GroupId, Outcome, SelectionMode, SelectionState};
use gta_grid::CellId;

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    state: SelectionState,
    /// Bumped after every applied action; views compare it to decide
    /// whether their derived aggregates are stale.
    revision: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, e.g. a restored snapshot.
    pub fn with_state(state: SelectionState) -> Self {
        Self { state, revision: 0 }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an action and report its outcome.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        log::trace!("[GTA] store: dispatch {:?}", action);
        let (next, outcome) = self.state.apply(action);
        if outcome.is_applied() {
            self.state = next;
            self.revision += 1;
        }
        outcome
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> Outcome {
        self.dispatch(Action::SetMode(mode))
    }

    pub fn add_latitude(&mut self, lat: i32) -> Outcome {
        self.dispatch(Action::AddLatitude(lat))
    }

    pub fn remove_latitude(&mut self, lat: i32) -> Outcome {
        self.dispatch(Action::RemoveLatitude(lat))
    }

    pub fn clear_latitudes(&mut self) -> Outcome {
        self.dispatch(Action::ClearLatitudes)
    }

    pub fn create_area_from_cells(&mut self, cell_ids: &[CellId]) -> Outcome {
        self.dispatch(Action::CreateAreaFromCells(cell_ids.to_vec()))
    }

    pub fn remove_area(&mut self, id: AreaId) -> Outcome {
        self.dispatch(Action::RemoveArea(id))
    }

    pub fn clear_areas(&mut self) -> Outcome {
        self.dispatch(Action::ClearAreas)
    }

    pub fn create_group_from_areas(&mut self, area_ids: &[AreaId]) -> Outcome {
        self.dispatch(Action::CreateGroupFromAreas(area_ids.to_vec()))
    }

    pub fn remove_group(&mut self, id: GroupId) -> Outcome {
        self.dispatch(Action::RemoveGroup(id))
    }

    pub fn clear_groups(&mut self) -> Outcome {
        self.dispatch(Action::ClearGroups)
    }

    pub fn toggle_active_group(&mut self, id: GroupId) -> Outcome {
        self.dispatch(Action::ToggleActiveGroup(id))
    }

    pub fn set_highlighted_cells(&mut self, cell_ids: &[CellId]) -> Outcome {
        self.dispatch(Action::SetHighlightedCells(cell_ids.to_vec()))
    }

    pub fn clear_highlight(&mut self) -> Outcome {
        self.dispatch(Action::ClearHighlight)
    }

    /// JSON snapshot of the current state.
    pub fn snapshot_json(&self) -> anyhow::Result<String> {
        self.state.to_json()
    }

    /// Rebuild a store from a snapshot written by [`SelectionStore::snapshot_json`].
    pub fn restore_json(json: &str) -> anyhow::Result<Self> {
        let state = SelectionState::from_json(json)?;
        log::info!(
            "[GTA] store: restored {} areas, {} groups",
            state.areas().len(),
            state.groups().len()
        );
        Ok(Self::with_state(state))
    }
}
