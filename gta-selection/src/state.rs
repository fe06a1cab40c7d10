//! Selection model and reducer.
//!
//! Areas and groups carry two keys: a stable `id` that every cross reference
//! uses, and a display `name` ("Zone 3", "Group 1") derived from the entry's
//! 1-based position. Names are regenerated after every structural change;
//! ids never are.
//!
//! State changes go through [`SelectionState::apply`], which returns a new
//! state and leaves the old one untouched.

use gta_grid::CellId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type AreaId = u32;
pub type GroupId = u32;

/// Colors handed out to areas and groups, cycled by id.
pub const CATEGORY_COLORS: [&str; 12] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#393b79", "#ad494a",
];

fn color_for_id(id: u32) -> String {
    let slot = (id.saturating_sub(1) as usize) % CATEGORY_COLORS.len();
    CATEGORY_COLORS[slot].to_string()
}

/// Which selection affordance is interactive on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Areas,
    Latitudes,
}

/// A rectangular map selection, stored as the cells it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    /// "Zone {rank}"
    pub name: String,
    pub color: String,
    pub cell_ids: Vec<CellId>,
}

/// A named set of areas compared together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// "Group {rank}"
    pub name: String,
    pub color: String,
    /// Sorted, de-duplicated area ids.
    pub area_ids: Vec<AreaId>,
}

/// A state transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    SetMode(SelectionMode),
    AddLatitude(i32),
    RemoveLatitude(i32),
    ClearLatitudes,
    CreateAreaFromCells(Vec<CellId>),
    RemoveArea(AreaId),
    ClearAreas,
    CreateGroupFromAreas(Vec<AreaId>),
    RemoveGroup(GroupId),
    ClearGroups,
    ToggleActiveGroup(GroupId),
    SetHighlightedCells(Vec<CellId>),
    ClearHighlight,
}

/// Why an action left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoOpReason {
    /// The action was given no cells or areas.
    EmptySelection,
    /// The referenced latitude, area or group does not exist.
    NotFound,
    /// A group with the same set of areas already exists.
    DuplicateGroup,
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied,
    AreaCreated(AreaId),
    GroupCreated(GroupId),
    NoOp(NoOpReason),
}

impl Outcome {
    /// True when the action changed (or idempotently confirmed) the state.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::NoOp(_))
    }
}

/// The complete selection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    mode: SelectionMode,
    selected_latitudes: Vec<i32>,
    areas: Vec<Area>,
    groups: Vec<Group>,
    active_group_ids: Vec<GroupId>,
    highlighted_cell_ids: Vec<CellId>,
    next_area_id: AreaId,
    next_group_id: GroupId,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Areas,
            selected_latitudes: Vec::new(),
            areas: Vec::new(),
            groups: Vec::new(),
            active_group_ids: Vec::new(),
            highlighted_cell_ids: Vec::new(),
            next_area_id: 1,
            next_group_id: 1,
        }
    }
}

/// Drop repeated entries, keeping the first occurrence of each.
fn dedup_preserving_order<T: Copy + Eq + std::hash::Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().copied().filter(|x| seen.insert(*x)).collect()
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────── Reads ─────────────────────

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected_latitudes(&self) -> &[i32] {
        &self.selected_latitudes
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn active_group_ids(&self) -> &[GroupId] {
        &self.active_group_ids
    }

    pub fn highlighted_cell_ids(&self) -> &[CellId] {
        &self.highlighted_cell_ids
    }

    pub fn next_area_id(&self) -> AreaId {
        self.next_area_id
    }

    pub fn next_group_id(&self) -> GroupId {
        self.next_group_id
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Active groups in activation order.
    pub fn active_groups(&self) -> impl Iterator<Item = &Group> {
        self.active_group_ids.iter().filter_map(|id| self.group(*id))
    }

    pub fn is_group_active(&self, id: GroupId) -> bool {
        self.active_group_ids.contains(&id)
    }

    /// Union of the cells of every area in a group, sorted.
    pub fn group_cell_ids(&self, id: GroupId) -> Option<Vec<CellId>> {
        let group = self.group(id)?;
        let mut cells: Vec<CellId> = group
            .area_ids
            .iter()
            .filter_map(|area_id| self.area(*area_id))
            .flat_map(|area| area.cell_ids.iter().copied())
            .collect();
        cells.sort_unstable();
        cells.dedup();
        Some(cells)
    }

    // ───────────────────── Transitions ─────────────────────

    /// Apply an action, returning the successor state and what happened.
    ///
    /// `self` is never modified. When the outcome is a no-op the returned
    /// state equals `self`.
    pub fn apply(&self, action: Action) -> (SelectionState, Outcome) {
        let mut next = self.clone();
        let outcome = next.reduce(action);
        (next, outcome)
    }

    fn reduce(&mut self, action: Action) -> Outcome {
        match action {
            Action::SetMode(mode) => {
                self.mode = mode;
                Outcome::Applied
            }
            Action::AddLatitude(lat) => {
                if !self.selected_latitudes.contains(&lat) {
                    self.selected_latitudes.push(lat);
                }
                Outcome::Applied
            }
            Action::RemoveLatitude(lat) => {
                let before = self.selected_latitudes.len();
                self.selected_latitudes.retain(|l| *l != lat);
                if self.selected_latitudes.len() == before {
                    return Outcome::NoOp(NoOpReason::NotFound);
                }
                Outcome::Applied
            }
            Action::ClearLatitudes => {
                self.selected_latitudes.clear();
                Outcome::Applied
            }
            Action::CreateAreaFromCells(cell_ids) => self.create_area(&cell_ids),
            Action::RemoveArea(id) => self.remove_area(id),
            Action::ClearAreas => {
                self.areas.clear();
                self.groups.clear();
                self.active_group_ids.clear();
                self.next_area_id = 1;
                self.next_group_id = 1;
                Outcome::Applied
            }
            Action::CreateGroupFromAreas(area_ids) => self.create_group(&area_ids),
            Action::RemoveGroup(id) => {
                let before = self.groups.len();
                self.groups.retain(|g| g.id != id);
                if self.groups.len() == before {
                    return Outcome::NoOp(NoOpReason::NotFound);
                }
                self.active_group_ids.retain(|g| *g != id);
                self.reindex_groups();
                Outcome::Applied
            }
            Action::ClearGroups => {
                self.groups.clear();
                self.active_group_ids.clear();
                self.next_group_id = 1;
                Outcome::Applied
            }
            Action::ToggleActiveGroup(id) => {
                if self.group(id).is_none() {
                    return Outcome::NoOp(NoOpReason::NotFound);
                }
                if self.active_group_ids.contains(&id) {
                    self.active_group_ids.retain(|g| *g != id);
                } else {
                    self.active_group_ids.push(id);
                }
                Outcome::Applied
            }
            Action::SetHighlightedCells(cell_ids) => {
                self.highlighted_cell_ids = dedup_preserving_order(&cell_ids);
                Outcome::Applied
            }
            Action::ClearHighlight => {
                self.highlighted_cell_ids.clear();
                Outcome::Applied
            }
        }
    }

    fn create_area(&mut self, cell_ids: &[CellId]) -> Outcome {
        let cell_ids = dedup_preserving_order(cell_ids);
        if cell_ids.is_empty() {
            return Outcome::NoOp(NoOpReason::EmptySelection);
        }
        let id = self.next_area_id;
        self.next_area_id += 1;
        self.areas.push(Area {
            id,
            name: String::new(),
            color: color_for_id(id),
            cell_ids,
        });
        self.reindex_areas();
        log::debug!("[GTA] selection: created area {} ({} areas)", id, self.areas.len());
        Outcome::AreaCreated(id)
    }

    fn remove_area(&mut self, id: AreaId) -> Outcome {
        let before = self.areas.len();
        self.areas.retain(|a| a.id != id);
        if self.areas.len() == before {
            return Outcome::NoOp(NoOpReason::NotFound);
        }

        for group in &mut self.groups {
            group.area_ids.retain(|a| *a != id);
        }
        let before_groups = self.groups.len();
        // stripping an area can empty a group or make it equal to an
        // earlier one; the earlier group survives
        let mut kept: Vec<Vec<AreaId>> = Vec::with_capacity(before_groups);
        self.groups.retain(|g| {
            if g.area_ids.is_empty() || kept.contains(&g.area_ids) {
                return false;
            }
            kept.push(g.area_ids.clone());
            true
        });
        if self.groups.len() != before_groups {
            log::debug!(
                "[GTA] selection: area {} removal dropped {} emptied or duplicate groups",
                id,
                before_groups - self.groups.len()
            );
        }

        let surviving: HashSet<GroupId> = self.groups.iter().map(|g| g.id).collect();
        self.active_group_ids.retain(|g| surviving.contains(g));

        self.reindex_areas();
        self.reindex_groups();
        Outcome::Applied
    }

    fn create_group(&mut self, area_ids: &[AreaId]) -> Outcome {
        if area_ids.is_empty() {
            return Outcome::NoOp(NoOpReason::EmptySelection);
        }
        let mut normalized: Vec<AreaId> = area_ids
            .iter()
            .copied()
            .filter(|id| self.area(*id).is_some())
            .collect();
        normalized.sort_unstable();
        normalized.dedup();
        if normalized.is_empty() {
            return Outcome::NoOp(NoOpReason::NotFound);
        }

        // group area_ids are stored normalized, so set equality is ==
        if self.groups.iter().any(|g| g.area_ids == normalized) {
            log::warn!(
                "[GTA] selection: group rejected, areas {:?} already grouped",
                normalized
            );
            return Outcome::NoOp(NoOpReason::DuplicateGroup);
        }

        let id = self.next_group_id;
        self.next_group_id += 1;
        self.groups.push(Group {
            id,
            name: String::new(),
            color: color_for_id(id),
            area_ids: normalized,
        });
        self.reindex_groups();
        Outcome::GroupCreated(id)
    }

    fn reindex_areas(&mut self) {
        for (i, area) in self.areas.iter_mut().enumerate() {
            area.name = format!("Zone {}", i + 1);
        }
    }

    fn reindex_groups(&mut self) {
        for (i, group) in self.groups.iter_mut().enumerate() {
            group.name = format!("Group {}", i + 1);
        }
    }

    // ───────────────────── Snapshots ─────────────────────

    /// Check every structural invariant of the model.
    pub fn validate(&self) -> anyhow::Result<()> {
        let area_ids: HashSet<AreaId> = self.areas.iter().map(|a| a.id).collect();
        if area_ids.len() != self.areas.len() {
            anyhow::bail!("duplicate area id");
        }
        let group_ids: HashSet<GroupId> = self.groups.iter().map(|g| g.id).collect();
        if group_ids.len() != self.groups.len() {
            anyhow::bail!("duplicate group id");
        }

        for (i, area) in self.areas.iter().enumerate() {
            if area.id >= self.next_area_id {
                anyhow::bail!("area id {} not below next id {}", area.id, self.next_area_id);
            }
            if area.name != format!("Zone {}", i + 1) {
                anyhow::bail!("area {} has stale name '{}'", area.id, area.name);
            }
            if dedup_preserving_order(&area.cell_ids).len() != area.cell_ids.len() {
                anyhow::bail!("area {} has repeated cells", area.id);
            }
        }

        for (i, group) in self.groups.iter().enumerate() {
            if group.id >= self.next_group_id {
                anyhow::bail!("group id {} not below next id {}", group.id, self.next_group_id);
            }
            if group.name != format!("Group {}", i + 1) {
                anyhow::bail!("group {} has stale name '{}'", group.id, group.name);
            }
            if group.area_ids.is_empty() {
                anyhow::bail!("group {} is empty", group.id);
            }
            if !group.area_ids.windows(2).all(|w| w[0] < w[1]) {
                anyhow::bail!("group {} area ids not normalized", group.id);
            }
            if let Some(missing) = group.area_ids.iter().find(|a| !area_ids.contains(a)) {
                anyhow::bail!("group {} references missing area {}", group.id, missing);
            }
            if self.groups[..i].iter().any(|g| g.area_ids == group.area_ids) {
                anyhow::bail!("group {} duplicates an earlier group", group.id);
            }
        }

        if let Some(g) = self.active_group_ids.iter().find(|g| !group_ids.contains(g)) {
            anyhow::bail!("active group {} does not exist", g);
        }
        Ok(())
    }

    /// Serialize the full state, ids and counters included.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a state written by [`SelectionState::to_json`], rejecting
    /// snapshots that break the model's invariants.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let state: SelectionState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &SelectionState, action: Action) -> (SelectionState, Outcome) {
        let (next, outcome) = state.apply(action);
        next.validate().unwrap();
        (next, outcome)
    }

    fn with_areas(n: usize) -> SelectionState {
        let mut state = SelectionState::new();
        for i in 0..n {
            state = state.apply(Action::CreateAreaFromCells(vec![i * 10, i * 10 + 1])).0;
        }
        state
    }

    #[test]
    fn test_initial_state() {
        let state = SelectionState::new();
        assert_eq!(state.mode(), SelectionMode::Areas);
        assert!(state.areas().is_empty());
        assert!(state.groups().is_empty());
        assert_eq!(state.next_area_id(), 1);
        assert_eq!(state.next_group_id(), 1);
        state.validate().unwrap();
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let state = SelectionState::new();
        let (next, outcome) = state.apply(Action::CreateAreaFromCells(vec![1, 2]));
        assert_eq!(outcome, Outcome::AreaCreated(1));
        assert!(state.areas().is_empty());
        assert_eq!(next.areas().len(), 1);
    }

    #[test]
    fn test_mode_keeps_other_selections() {
        let state = with_areas(1);
        let (state, _) = run(&state, Action::AddLatitude(8));
        let (state, _) = run(&state, Action::SetMode(SelectionMode::Latitudes));
        assert_eq!(state.mode(), SelectionMode::Latitudes);
        assert_eq!(state.areas().len(), 1);
        let (state, _) = run(&state, Action::SetMode(SelectionMode::Areas));
        assert_eq!(state.selected_latitudes(), &[8]);
    }

    #[test]
    fn test_add_latitude_idempotent() {
        let state = SelectionState::new();
        let (once, _) = run(&state, Action::AddLatitude(12));
        let (twice, _) = run(&once, Action::AddLatitude(12));
        assert_eq!(once, twice);
        assert_eq!(twice.selected_latitudes(), &[12]);

        let (removed, outcome) = run(&twice, Action::RemoveLatitude(12));
        assert_eq!(outcome, Outcome::Applied);
        assert!(removed.selected_latitudes().is_empty());
        let (_, outcome) = run(&removed, Action::RemoveLatitude(12));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));

        let (many, _) = run(&twice, Action::AddLatitude(-4));
        let (cleared, _) = run(&many, Action::ClearLatitudes);
        assert!(cleared.selected_latitudes().is_empty());
    }

    #[test]
    fn test_create_area_dedups_and_names() {
        let state = SelectionState::new();
        let (state, outcome) = run(&state, Action::CreateAreaFromCells(vec![4, 5, 4, 9, 5]));
        assert_eq!(outcome, Outcome::AreaCreated(1));
        let area = &state.areas()[0];
        assert_eq!(area.cell_ids, vec![4, 5, 9]);
        assert_eq!(area.name, "Zone 1");
        assert_eq!(area.color, CATEGORY_COLORS[0]);
        assert_eq!(state.next_area_id(), 2);
    }

    #[test]
    fn test_create_area_empty_is_noop() {
        let state = SelectionState::new();
        let (next, outcome) = run(&state, Action::CreateAreaFromCells(Vec::new()));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::EmptySelection));
        assert_eq!(next, state);
    }

    #[test]
    fn test_remove_area_reranks_keeps_ids() {
        let state = with_areas(3);
        let (state, outcome) = run(&state, Action::RemoveArea(2));
        assert_eq!(outcome, Outcome::Applied);
        let names: Vec<_> = state.areas().iter().map(|a| a.name.as_str()).collect();
        let ids: Vec<_> = state.areas().iter().map(|a| a.id).collect();
        assert_eq!(names, vec!["Zone 1", "Zone 2"]);
        assert_eq!(ids, vec![1, 3]);

        // ids are never reused
        let (state, outcome) = run(&state, Action::CreateAreaFromCells(vec![99]));
        assert_eq!(outcome, Outcome::AreaCreated(4));
        assert_eq!(state.areas()[2].name, "Zone 3");
    }

    #[test]
    fn test_remove_unknown_area_is_noop() {
        let state = with_areas(2);
        let (next, outcome) = run(&state, Action::RemoveArea(42));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));
        assert_eq!(next, state);
        let (once, _) = run(&state, Action::RemoveArea(1));
        let (twice, outcome) = run(&once, Action::RemoveArea(1));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_area_cascades_to_groups() {
        let state = with_areas(3);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1]));
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1, 2]));
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![3]));
        let (state, _) = run(&state, Action::ToggleActiveGroup(1));
        let (state, _) = run(&state, Action::ToggleActiveGroup(2));

        let (state, _) = run(&state, Action::RemoveArea(1));
        // group 1 emptied and deleted, group 2 keeps area 2
        let ids: Vec<_> = state.groups().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(state.group(2).unwrap().area_ids, vec![2]);
        assert_eq!(state.groups()[0].name, "Group 1");
        assert_eq!(state.groups()[1].name, "Group 2");
        assert_eq!(state.active_group_ids(), &[2]);
    }

    #[test]
    fn test_remove_area_can_create_duplicate_sets() {
        // {1,2} and {2} collapse to the same set once area 1 goes away
        let state = with_areas(2);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1, 2]));
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![2]));
        let (state, _) = run(&state, Action::RemoveArea(1));
        assert_eq!(state.groups().len(), 1);
        assert_eq!(state.groups()[0].id, 1);
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let state = with_areas(3);
        let (state, outcome) = run(&state, Action::CreateGroupFromAreas(vec![3, 1]));
        assert_eq!(outcome, Outcome::GroupCreated(1));
        assert_eq!(state.groups()[0].area_ids, vec![1, 3]);

        let (next, outcome) = run(&state, Action::CreateGroupFromAreas(vec![1, 3, 3]));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::DuplicateGroup));
        assert!(!outcome.is_applied());
        assert_eq!(next, state);

        let (next, outcome) = run(&state, Action::CreateGroupFromAreas(vec![1, 2, 3]));
        assert_eq!(outcome, Outcome::GroupCreated(2));
        assert_eq!(next.groups()[1].name, "Group 2");
    }

    #[test]
    fn test_group_ignores_unknown_areas() {
        let state = with_areas(2);
        let (state, outcome) = run(&state, Action::CreateGroupFromAreas(vec![2, 77]));
        assert_eq!(outcome, Outcome::GroupCreated(1));
        assert_eq!(state.groups()[0].area_ids, vec![2]);

        let (_, outcome) = run(&state, Action::CreateGroupFromAreas(vec![77]));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));
        let (_, outcome) = run(&state, Action::CreateGroupFromAreas(Vec::new()));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::EmptySelection));
    }

    #[test]
    fn test_remove_group_and_toggle() {
        let state = with_areas(2);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1]));
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![2]));
        let (state, _) = run(&state, Action::ToggleActiveGroup(2));
        assert!(state.is_group_active(2));
        let (state, _) = run(&state, Action::ToggleActiveGroup(1));
        let (state, _) = run(&state, Action::ToggleActiveGroup(1));
        assert_eq!(state.active_group_ids(), &[2]);

        let (state, outcome) = run(&state, Action::RemoveGroup(1));
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(state.groups()[0].id, 2);
        assert_eq!(state.groups()[0].name, "Group 1");
        assert_eq!(state.active_group_ids(), &[2]);

        let (state, _) = run(&state, Action::RemoveGroup(2));
        assert!(state.active_group_ids().is_empty());
        let (_, outcome) = run(&state, Action::RemoveGroup(2));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));
        let (_, outcome) = run(&state, Action::ToggleActiveGroup(9));
        assert_eq!(outcome, Outcome::NoOp(NoOpReason::NotFound));
    }

    #[test]
    fn test_clear_areas_and_groups() {
        let state = with_areas(2);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1, 2]));
        let (state, _) = run(&state, Action::ToggleActiveGroup(1));
        let (state, _) = run(&state, Action::AddLatitude(0));

        let (cleared_groups, _) = run(&state, Action::ClearGroups);
        assert!(cleared_groups.groups().is_empty());
        assert!(cleared_groups.active_group_ids().is_empty());
        assert_eq!(cleared_groups.next_group_id(), 1);
        assert_eq!(cleared_groups.areas().len(), 2);

        let (cleared, _) = run(&state, Action::ClearAreas);
        assert!(cleared.areas().is_empty());
        assert!(cleared.groups().is_empty());
        assert!(cleared.active_group_ids().is_empty());
        assert_eq!(cleared.next_area_id(), 1);
        assert_eq!(cleared.next_group_id(), 1);
        assert_eq!(cleared.selected_latitudes(), &[0]);
    }

    #[test]
    fn test_highlight() {
        let state = SelectionState::new();
        let (state, _) = run(&state, Action::SetHighlightedCells(vec![3, 1, 3]));
        assert_eq!(state.highlighted_cell_ids(), &[3, 1]);
        let (state, _) = run(&state, Action::SetHighlightedCells(vec![7]));
        assert_eq!(state.highlighted_cell_ids(), &[7]);
        let (state, _) = run(&state, Action::ClearHighlight);
        assert!(state.highlighted_cell_ids().is_empty());
    }

    #[test]
    fn test_group_cell_ids_union() {
        let state = SelectionState::new();
        let (state, _) = run(&state, Action::CreateAreaFromCells(vec![5, 1]));
        let (state, _) = run(&state, Action::CreateAreaFromCells(vec![1, 8]));
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1, 2]));
        assert_eq!(state.group_cell_ids(1), Some(vec![1, 5, 8]));
        assert_eq!(state.group_cell_ids(2), None);
        assert_eq!(state.active_groups().count(), 0);
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        // small LCG so the sequence is reproducible
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };

        let mut state = SelectionState::new();
        for _ in 0..2000 {
            let action = match next(9) {
                0 | 1 => {
                    Action::CreateAreaFromCells((0..next(4)).map(|_| next(50) as usize).collect())
                }
                2 => Action::RemoveArea(next(12) as u32),
                3 | 4 => {
                    Action::CreateGroupFromAreas((0..next(4)).map(|_| next(12) as u32).collect())
                }
                5 => Action::RemoveGroup(next(8) as u32),
                6 => Action::ToggleActiveGroup(next(8) as u32),
                7 => Action::AddLatitude(next(10) as i32 * 4),
                _ => {
                    if next(20) == 0 {
                        Action::ClearAreas
                    } else {
                        Action::RemoveLatitude(next(10) as i32 * 4)
                    }
                }
            };
            let (after, _) = state.apply(action.clone());
            after
                .validate()
                .unwrap_or_else(|e| panic!("{:?} broke invariants: {}", action, e));
            state = after;
        }
    }

    #[test]
    fn test_json_snapshot_roundtrip() {
        let state = with_areas(3);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1, 3]));
        let (state, _) = run(&state, Action::ToggleActiveGroup(1));
        let (state, _) = run(&state, Action::AddLatitude(-20));
        let (state, _) = run(&state, Action::SetMode(SelectionMode::Latitudes));

        let json = state.to_json().unwrap();
        assert!(json.contains("\"latitudes\""));
        let restored = SelectionState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_json_snapshot_rejects_dangling_group() {
        let state = with_areas(1);
        let (state, _) = run(&state, Action::CreateGroupFromAreas(vec![1]));
        let mut value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        value["groups"][0]["area_ids"] = serde_json::json!([5]);
        let err = SelectionState::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("missing area 5"));
    }
}
