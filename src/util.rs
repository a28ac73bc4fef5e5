use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;

pub fn stable_hash(id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

/// Consistent tint for an id: hue comes from the hash, saturation and
/// lightness stay fixed so every note reads on a dark background.
pub fn string_to_color(id: &str) -> Color32 {
    let hue = (stable_hash(id) % 360) as f32;
    hsl_to_color(hue, 0.70, 0.60)
}

pub fn hsl_to_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hue = hue.rem_euclid(360.0);
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;

    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

/// Adds `delta` to every RGB channel, saturating at the channel limits.
pub fn shift_brightness(color: Color32, delta: i16) -> Color32 {
    let shift = |channel: u8| (channel as i16 + delta).clamp(0, 255) as u8;
    Color32::from_rgba_unmultiplied(
        shift(color.r()),
        shift(color.g()),
        shift(color.b()),
        color.a(),
    )
}

pub fn format_distance(distance: f32) -> String {
    format!("{}u", distance.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_color_is_stable_per_id() {
        assert_eq!(string_to_color("note-7"), string_to_color("note-7"));
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_color(0.0, 1.0, 0.5), Color32::from_rgb(255, 0, 0));
        assert_eq!(hsl_to_color(120.0, 1.0, 0.5), Color32::from_rgb(0, 255, 0));
        assert_eq!(hsl_to_color(240.0, 1.0, 0.5), Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn shift_brightness_saturates() {
        let color = Color32::from_rgb(250, 10, 128);
        assert_eq!(shift_brightness(color, 20), Color32::from_rgb(255, 30, 148));
        assert_eq!(shift_brightness(color, -20), Color32::from_rgb(230, 0, 108));
    }

    #[test]
    fn format_distance_rounds() {
        assert_eq!(format_distance(41.6), "42u");
    }
}
