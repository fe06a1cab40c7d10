//! Dataset summary and color lookup.

use crate::DataArgs;
use gta_data::color_scale::ColorScale;
use gta_grid::GridDataset;

pub fn run_range(data: &DataArgs) -> anyhow::Result<()> {
    let dataset = data.load()?;
    println!("{}", describe(&dataset));
    Ok(())
}

pub fn run_color(value: f64, data: Option<&str>) -> anyhow::Result<()> {
    let scale = match data {
        Some(path) => ColorScale::from_dataset(&GridDataset::load_path(path)?),
        None => ColorScale::fixed(),
    };
    let color = scale.color_for(Some(value));
    let (min, max) = scale.range();
    log::debug!("[GTA] color: scale [{}, {}]", min, max);
    println!("{} {}", color.to_hex(), color.to_css());
    Ok(())
}

/// One-line summary of a dataset.
pub fn describe(dataset: &GridDataset) -> String {
    let (min, max) = dataset.global_range();
    let span = match dataset.year_span() {
        Some((first, last)) => format!("{}-{}", first, last),
        None => "none".to_string(),
    };
    format!(
        "cells={} latitudes={} longitudes={} years={} range=[{:.3}, {:.3}]",
        dataset.len(),
        dataset.latitudes().len(),
        dataset.longitudes().len(),
        span,
        min,
        max
    )
}
