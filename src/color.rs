use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a category column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new<'a>(unique_values: impl IntoIterator<Item = &'a Value>) -> Self {
        let values: BTreeSet<&Value> = unique_values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Heatmap colour scales
// ---------------------------------------------------------------------------

/// Three-stop gradient used to shade correlation heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// Blue → light grey → red.
    CoolWarm,
    /// Pale yellow → teal → dark blue.
    YellowGreenBlue,
}

impl ColorScale {
    fn stops(self) -> [(u8, u8, u8); 3] {
        match self {
            ColorScale::CoolWarm => [(59, 76, 192), (221, 221, 221), (180, 4, 38)],
            ColorScale::YellowGreenBlue => [(255, 255, 217), (65, 182, 196), (8, 29, 88)],
        }
    }

    /// Colour at `t` in `[0, 1]`, interpolated in linear RGB.
    pub fn sample(self, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let [lo, mid, hi] = self.stops().map(|(r, g, b)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        });
        let mixed = if t < 0.5 {
            lo.mix(mid, t * 2.0)
        } else {
            mid.mix(hi, (t - 0.5) * 2.0)
        };
        to_color32(Srgb::from_linear(mixed))
    }

    /// Cell colour for a correlation coefficient; `NaN` is grey.
    pub fn for_correlation(self, r: f64) -> Color32 {
        if r.is_nan() {
            return Color32::DARK_GRAY;
        }
        self.sample(((r + 1.0) / 2.0) as f32)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
