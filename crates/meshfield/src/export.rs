//! Portable style-code export.
//!
//! A static field exports as a CSS `background` value (plus a layered
//! radial-gradient approximation for closer visual parity); an animated
//! field exports as a JSON configuration object that can be fed back into a
//! fresh pipeline instance.

use serde::{Deserialize, Serialize};

/// Fallback gradient emitted when no palette is available.
const FALLBACK_GRADIENT: &str = "linear-gradient(45deg, #a259ff, #ff6b6b)";

/// Builds the CSS `linear-gradient` approximation of the static field.
///
/// Stop tables by palette size: one color degenerates to a two-stop
/// gradient of itself, two colors blend at 45 degrees, three at 135 degrees
/// with a centered middle stop, four at 45 degrees weighted toward the
/// edges, and larger palettes space their stops evenly.
pub fn generate_css_gradient(colors: &[String]) -> String {
    match colors {
        [] => FALLBACK_GRADIENT.to_string(),
        [color] => format!("linear-gradient(45deg, {color}, {color})"),
        [a, b] => format!("linear-gradient(45deg, {a}, {b})"),
        [a, b, c] => format!("linear-gradient(135deg, {a} 0%, {b} 50%, {c} 100%)"),
        [a, b, c, d] => {
            format!("linear-gradient(45deg, {a} 0%, {b} 25%, {c} 75%, {d} 100%)")
        }
        _ => {
            let stops = colors
                .iter()
                .enumerate()
                .map(|(index, color)| {
                    let percent = index as f32 / (colors.len() - 1) as f32 * 100.0;
                    format!("{color} {}", format_percent(percent))
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("linear-gradient(45deg, {stops})")
        }
    }
}

/// Renders the full exported stylesheet: the linear approximation plus a
/// layered multi-gradient variant that reads closer to the real field.
pub fn css_stylesheet(colors: &[String]) -> String {
    let pick = |index: usize| -> &str {
        colors
            .get(index)
            .or_else(|| colors.first())
            .map(String::as_str)
            .unwrap_or("#a259ff")
    };
    let last_pair = colors
        .get(4)
        .or_else(|| colors.get(1))
        .map(String::as_str)
        .unwrap_or_else(|| pick(0));

    format!(
        "/* CSS background approximation of mesh gradient */\n\
         .mesh-gradient-bg {{\n\
         \x20 background: {gradient};\n\
         \x20 min-height: 500px;\n\
         \x20 border-radius: 1.5rem;\n\
         }}\n\
         \n\
         /* Alternative: layered gradients for a closer approximation */\n\
         .mesh-gradient-layered {{\n\
         \x20 background:\n\
         \x20   radial-gradient(circle at 30% 30%, {p0} 0%, transparent 50%),\n\
         \x20   radial-gradient(circle at 70% 70%, {p1} 0%, transparent 50%),\n\
         \x20   radial-gradient(circle at 50% 50%, {p2} 0%, transparent 50%),\n\
         \x20   linear-gradient(45deg, {p3} 0%, {p4} 100%);\n\
         \x20 min-height: 500px;\n\
         \x20 border-radius: 1.5rem;\n\
         }}\n",
        gradient = generate_css_gradient(colors),
        p0 = pick(0),
        p1 = pick(1),
        p2 = pick(2),
        p3 = pick(3),
        p4 = last_pair,
    )
}

fn format_percent(percent: f32) -> String {
    if (percent - percent.round()).abs() < 1e-4 {
        format!("{}%", percent.round() as u32)
    } else {
        format!("{percent:.2}%")
    }
}

/// Serialized configuration of an animated field, suitable for feeding back
/// into a fresh pipeline instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub colors: Vec<String>,
    pub point_count: usize,
    pub animate: bool,
    pub width: u32,
    pub height: u32,
}

impl MeshConfig {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[&str]) -> Vec<String> {
        colors.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn empty_palette_uses_the_fallback() {
        assert_eq!(
            generate_css_gradient(&[]),
            "linear-gradient(45deg, #a259ff, #ff6b6b)"
        );
    }

    #[test]
    fn single_color_degenerates_to_a_flat_gradient() {
        assert_eq!(
            generate_css_gradient(&palette(&["#123456"])),
            "linear-gradient(45deg, #123456, #123456)"
        );
    }

    #[test]
    fn three_colors_blend_at_135_degrees() {
        assert_eq!(
            generate_css_gradient(&palette(&["#ff0000", "#00ff00", "#0000ff"])),
            "linear-gradient(135deg, #ff0000 0%, #00ff00 50%, #0000ff 100%)"
        );
    }

    #[test]
    fn four_colors_weight_the_edges() {
        assert_eq!(
            generate_css_gradient(&palette(&["#111111", "#222222", "#333333", "#444444"])),
            "linear-gradient(45deg, #111111 0%, #222222 25%, #333333 75%, #444444 100%)"
        );
    }

    #[test]
    fn larger_palettes_space_stops_evenly() {
        assert_eq!(
            generate_css_gradient(&palette(&["#1", "#2", "#3", "#4", "#5"])),
            "linear-gradient(45deg, #1 0%, #2 25%, #3 50%, #4 75%, #5 100%)"
        );
        let seven = generate_css_gradient(&palette(&["#1", "#2", "#3", "#4", "#5", "#6", "#7"]));
        assert!(seven.starts_with("linear-gradient(45deg, #1 0%, #2 16.67%,"));
        assert!(seven.ends_with("#7 100%)"));
    }

    #[test]
    fn stylesheet_contains_both_rules() {
        let sheet = css_stylesheet(&palette(&["#ff0000", "#00ff00", "#0000ff"]));
        assert!(sheet.contains(".mesh-gradient-bg"));
        assert!(sheet.contains(".mesh-gradient-layered"));
        assert!(sheet.contains("linear-gradient(135deg, #ff0000 0%, #00ff00 50%, #0000ff 100%)"));
        // Missing layered slots fall back to earlier palette entries.
        assert!(sheet.contains("radial-gradient(circle at 50% 50%, #0000ff 0%"));
        assert!(sheet.contains("linear-gradient(45deg, #ff0000 0%, #00ff00 100%)"));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = MeshConfig {
            colors: palette(&["#a259ff", "#ff6b6b"]),
            point_count: 2,
            animate: true,
            width: 900,
            height: 500,
        };
        let json = config.to_json().expect("serialize");
        assert_eq!(MeshConfig::from_json(&json).expect("parse"), config);
    }
}
