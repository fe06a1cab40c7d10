//! Selection state and map interaction for anomaly grid views.
//!
//! This crate provides:
//! - `state`: the selection model and its reducer (areas, groups, latitudes)
//! - `store`: an owned store that applies actions atomically
//! - `geometry`: pointer <-> lat/lon mapping, rectangle selection, hit testing
//! - `gesture`: the drag/hover pointer state machine over the map
//! - `playback`: the auto-advancing year cursor

pub mod geometry;
pub mod gesture;
pub mod playback;
pub mod state;
pub mod store;

pub use state::{
    Action, Area, AreaId, Group, GroupId, NoOpReason, Outcome, SelectionMode, SelectionState,
};
pub use store::SelectionStore;
