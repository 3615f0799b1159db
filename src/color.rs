use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            let hsl = Hsl::new(hue, 0.55, 0.6);
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
// Color mapping: series name → Color32
// ---------------------------------------------------------------------------

/// Maps series names (energy sources, continents, categories) to distinct
/// colours so the same name keeps its colour across charts.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map over the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let palette = generate_palette(names.len());
        ColorMap {
            mapping: names.into_iter().zip(palette).collect(),
        }
    }

    /// Look up the colour for a series name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale for the emissions map
// ---------------------------------------------------------------------------

const VIRIDIS_STOPS: [(f32, f32, f32); 5] = [
    (0.267, 0.005, 0.329),
    (0.230, 0.322, 0.546),
    (0.128, 0.567, 0.551),
    (0.369, 0.789, 0.383),
    (0.993, 0.906, 0.144),
];

/// Viridis-like colour for `t` in `[0, 1]` (clamped).
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_finite() {
        t.clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let scaled = t * (VIRIDIS_STOPS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let frac = scaled - i as f32;

    let stop = |(r, g, b): (f32, f32, f32)| -> LinSrgb { Srgb::new(r, g, b).into_linear() };
    let mixed = stop(VIRIDIS_STOPS[i]).mix(stop(VIRIDIS_STOPS[i + 1]), frac);
    to_color32(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        assert_ne!(p[0], p[3]);
    }

    #[test]
    fn color_map_is_stable_and_defaults_to_gray() {
        let cm = ColorMap::new(["Coal", "Solar"]);
        assert_eq!(cm.color_for("Coal"), cm.color_for("Coal"));
        assert_ne!(cm.color_for("Coal"), cm.color_for("Solar"));
        assert_eq!(cm.color_for("Geothermal"), Color32::GRAY);
    }

    #[test]
    fn viridis_endpoints_and_clamping() {
        assert_eq!(viridis(-1.0), viridis(0.0));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
        let high = viridis(1.0);
        assert!(high.r() > 200 && high.g() > 200);
    }
}
