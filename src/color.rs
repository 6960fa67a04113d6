use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const HEALTHY_HEX: &str = "#27ae60";
pub const DISEASED_HEX: &str = "#e74c3c";

/// Parse `#rrggbb`; unparsable input falls back to grey.
pub fn hex_color(hex: &str) -> Color32 {
    Srgb::<u8>::from_str(hex)
        .map(|c| Color32::from_rgb(c.red, c.green, c.blue))
        .unwrap_or(Color32::GRAY)
}

/// Series colour for a diagnosis: green without disease, red with.
pub fn diagnosis_color(has_disease: bool) -> Color32 {
    hex_color(if has_disease { DISEASED_HEX } else { HEALTHY_HEX })
}

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a categorical chart to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_series_colours() {
        assert_eq!(diagnosis_color(false), Color32::from_rgb(0x27, 0xae, 0x60));
        assert_eq!(diagnosis_color(true), Color32::from_rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(hex_color("not a colour"), Color32::GRAY);
    }

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn unknown_label_is_grey() {
        let map = ColorMap::new(["Feminino", "Masculino"]);
        assert_ne!(map.color_for("Feminino"), map.color_for("Masculino"));
        assert_eq!(map.color_for("Outro"), Color32::GRAY);
    }
}
