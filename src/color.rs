use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Viridis ramp
// ---------------------------------------------------------------------------

/// Anchor colours of the viridis map at 0, 0.25, 0.5, 0.75 and 1.
const VIRIDIS_STOPS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Sample the viridis ramp at `t` in `[0, 1]` (clamped).
pub fn viridis(t: f32) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (VIRIDIS_STOPS.len() - 1) as f32;
    let scaled = t * segments;
    let i = (scaled.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let local = scaled - i as f32;

    let linear = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = linear(VIRIDIS_STOPS[i]).mix(linear(VIRIDIS_STOPS[i + 1]), local);
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);

    Rgb(rgb.red, rgb.green, rgb.blue)
}

/// `n` colours evenly spaced over the full ramp, first and last included.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis(0.0)],
        _ => (0..n).map(|i| viridis(i as f32 / (n - 1) as f32)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Rgb – backend-neutral colour
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour shared by the viewer and the PNG renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(128, 128, 128);
}

impl From<Rgb> for Color32 {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color32::from_rgb(r, g, b)
    }
}

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

// ---------------------------------------------------------------------------
// Color mapping: key → colour
// ---------------------------------------------------------------------------

/// Maps an ordered set of keys (policies, job ids) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Rgb>,
    default_color: Rgb,
}

impl<K: Ord + Clone> ColorMap<K> {
    /// Spread the ramp over `keys` in their sorted order.
    pub fn new<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let keys: std::collections::BTreeSet<K> = keys.into_iter().collect();
        let palette = generate_palette(keys.len());
        ColorMap {
            mapping: keys.into_iter().zip(palette).collect(),
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a key; unknown keys are gray.
    pub fn color_for(&self, key: &K) -> Rgb {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }

    /// Legend entries in key order.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&K, Rgb)> + '_ {
        self.mapping.iter().map(|(k, c)| (k, *c))
    }
}
