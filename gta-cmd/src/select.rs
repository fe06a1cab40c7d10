//! Rectangle selection from the command line.
//!
//! Replays a press/drag/release over the map plane against a fresh store and
//! writes the resulting selection snapshot as JSON.

use crate::{open_output, DataArgs};
use gta_grid::GridDataset;
use gta_selection::geometry::{PlaneGeometry, Point};
use gta_selection::gesture::MapInteraction;
use gta_selection::{Outcome, SelectionStore};
use log::info;
use std::io::Write;

pub fn run_select(
    data: &DataArgs,
    from: &str,
    to: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let dataset = data.load()?;
    let from = parse_point(from)?;
    let to = parse_point(to)?;

    let store = select_rect(&dataset, PlaneGeometry::default(), from, to);
    match store.state().areas().last() {
        Some(area) => info!("[GTA] select: {} holds {} cells", area.name, area.cell_ids.len()),
        None => log::warn!("[GTA] select: rectangle covers no cells"),
    }

    let mut out = open_output(output)?;
    writeln!(out, "{}", store.snapshot_json()?)?;
    Ok(())
}

/// Drag from `from` to `to` on a new store and return it.
pub fn select_rect(
    dataset: &GridDataset,
    geometry: PlaneGeometry,
    from: Point,
    to: Point,
) -> SelectionStore {
    let mut store = SelectionStore::new();
    let mut map = MapInteraction::new(geometry);
    map.pointer_down(&store, from);
    map.pointer_move(dataset, &store, to);
    if let Some(Outcome::AreaCreated(id)) = map.pointer_up(dataset, &mut store, to) {
        log::debug!("[GTA] select: created area {}", id);
    }
    store
}

/// Parse `"x,y"`.
pub fn parse_point(s: &str) -> anyhow::Result<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected x,y but got {:?}", s))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}
