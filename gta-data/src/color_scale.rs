//! Piecewise-linear anomaly color scale.
//!
//! Values are clamped into the scale range, bracketed by two anchors and
//! each channel is interpolated linearly. Missing values map to
//! [`Rgba::TRANSPARENT`], which no palette output can equal since palette
//! colors always carry [`PALETTE_ALPHA`].

use gta_grid::GridDataset;
use gta_utils::colors::format_hex_rgb;
use serde::{Deserialize, Serialize};

/// Alpha applied to every palette color.
pub const PALETTE_ALPHA: u8 = 200;

/// Anchor colors from cold to warm, spread evenly over the range.
pub const ANCHOR_COLORS: [[u8; 3]; 5] = [
    [0, 0, 130],
    [0, 120, 255],
    [255, 255, 255],
    [255, 180, 0],
    [200, 0, 0],
];

/// Range used by [`ColorScale::fixed`].
pub const FIXED_RANGE: (f64, f64) = (-2.0, 3.0);

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// "No data" sentinel.
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS `rgba(r, g, b, alpha)` with alpha in `[0, 1]`.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format_hex_rgb([self.r, self.g, self.b])
    }
}

/// A single anchor of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub t: f64,
    pub rgb: [u8; 3],
}

/// Continuous color scale over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    /// Five anchors spread evenly over `[min, max]` (bounds swapped if reversed).
    pub fn calibrated(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let span = max - min;
        let last = (ANCHOR_COLORS.len() - 1) as f64;
        let stops = ANCHOR_COLORS
            .iter()
            .enumerate()
            .map(|(i, rgb)| ColorStop {
                t: if i == ANCHOR_COLORS.len() - 1 {
                    max
                } else {
                    min + span * (i as f64 / last)
                },
                rgb: *rgb,
            })
            .collect();
        Self { stops }
    }

    /// Scale over the constant range [`FIXED_RANGE`].
    pub fn fixed() -> Self {
        Self::calibrated(FIXED_RANGE.0, FIXED_RANGE.1)
    }

    /// Scale calibrated to the dataset's observed min/max.
    pub fn from_dataset(dataset: &GridDataset) -> Self {
        let (min, max) = dataset.global_range();
        log::debug!("[GTA] color: calibrated to [{:.3}, {:.3}]", min, max);
        Self::calibrated(min, max)
    }

    /// Build a scale from explicit anchors. Requires at least two anchors
    /// with non-decreasing positions.
    pub fn with_stops(stops: Vec<ColorStop>) -> anyhow::Result<Self> {
        if stops.len() < 2 {
            anyhow::bail!("color scale needs at least two stops, got {}", stops.len());
        }
        if let Some(w) = stops.windows(2).find(|w| !(w[0].t <= w[1].t)) {
            anyhow::bail!(
                "color stops must be ordered: {} comes before {}",
                w[0].t,
                w[1].t
            );
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// `(min, max)` covered by the scale.
    pub fn range(&self) -> (f64, f64) {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first.t, last.t),
            _ => FIXED_RANGE,
        }
    }

    /// Color for an anomaly value; `None` (or NaN) is transparent.
    pub fn color_for(&self, value: Option<f64>) -> Rgba {
        let v = match value {
            Some(v) if !v.is_nan() => v,
            _ => return Rgba::TRANSPARENT,
        };
        let (min, max) = self.range();
        let t = v.clamp(min, max);

        for w in self.stops.windows(2) {
            let (p0, p1) = (w[0], w[1]);
            if t >= p0.t && t <= p1.t {
                let span = p1.t - p0.t;
                let f = if span > 0.0 { (t - p0.t) / span } else { 0.0 };
                let lerp = |i: usize| {
                    let c0 = p0.rgb[i] as f64;
                    let c1 = p1.rgb[i] as f64;
                    (c0 + f * (c1 - c0)).clamp(0.0, 255.0) as u8
                };
                return Rgba {
                    r: lerp(0),
                    g: lerp(1),
                    b: lerp(2),
                    a: PALETTE_ALPHA,
                };
            }
        }
        Rgba::TRANSPARENT
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::fixed()
    }
}
