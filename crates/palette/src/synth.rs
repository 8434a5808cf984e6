//! Procedural color-harmony synthesis.
//!
//! Expands a partial, user-supplied color set into a full palette by scoring
//! candidate hues on a 5-degree grid against the colors already present. The
//! score combines angular distinctiveness, a harmony-strategy bonus, an
//! even-distribution bonus, and heavy penalties for near-duplicate hues; a
//! white-dominated input set switches to a pastel scoring path that avoids
//! harsh complements. Saturation and lightness are drawn from bounded random
//! ranges, with best-effort distinctness retries for large palettes.
//!
//! Randomness is injectable so callers (and tests) can pin a seeded
//! generator; see [`synthesize_with`].

use rand::Rng;

use crate::color::{hex_to_hsl, hsl_to_hex, Hsl};

/// Smallest palette the synthesizer will target.
pub const MIN_COLORS: usize = 2;
/// Largest palette the synthesizer will target.
pub const MAX_COLORS: usize = 7;

const HUE_STEP: usize = 5;
const DISTINCTNESS_ATTEMPTS: usize = 10;

/// Relationship rule set guiding which new hues score well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonyStrategy {
    /// Existing hues sit close together; prefer neighbors.
    Analogous,
    /// Moderate spread; reward 180-degree opposites.
    Complementary,
    /// Wide spread; reward +-120-degree offsets.
    Triadic,
}

impl HarmonyStrategy {
    /// Picks a strategy from the spread (max - min) of the user hues.
    pub fn from_hue_spread(spread: f32) -> Self {
        if spread < 60.0 {
            HarmonyStrategy::Analogous
        } else if spread > 180.0 {
            HarmonyStrategy::Triadic
        } else {
            HarmonyStrategy::Complementary
        }
    }
}

/// Statistics derived from the user-picked colors that steer synthesis.
#[derive(Debug, Clone, Copy)]
struct PaletteProfile {
    avg_hue: f32,
    hue_spread: f32,
    has_white: bool,
}

impl PaletteProfile {
    fn from_user(user_hsl: &[Hsl]) -> Self {
        if user_hsl.is_empty() {
            // Neutral seed values for a fully synthesized palette.
            return Self {
                avg_hue: 180.0,
                hue_spread: 0.0,
                has_white: false,
            };
        }
        let hues: Vec<f32> = user_hsl.iter().map(|c| c.h).collect();
        let min = hues.iter().copied().fold(f32::INFINITY, f32::min);
        let max = hues.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Self {
            avg_hue: hues.iter().sum::<f32>() / hues.len() as f32,
            hue_spread: max - min,
            has_white: user_hsl.iter().any(|c| c.l > 0.85 && c.s < 0.2),
        }
    }
}

/// Expands `user_colors` into a palette of up to `total_colors` entries.
///
/// User colors and synthesized colors are interleaved for visual
/// distribution, then deduplicated by exact value; the result may therefore
/// be shorter than requested when inputs collide. Uses the thread-local RNG;
/// see [`synthesize_with`] for a deterministic variant.
pub fn synthesize(user_colors: &[String], total_colors: usize) -> Vec<String> {
    synthesize_with(user_colors, total_colors, &mut rand::thread_rng())
}

/// [`synthesize`] with a caller-supplied random source.
pub fn synthesize_with<R: Rng + ?Sized>(
    user_colors: &[String],
    total_colors: usize,
    rng: &mut R,
) -> Vec<String> {
    let needed = total_colors.saturating_sub(user_colors.len());
    let user_hsl: Vec<Hsl> = user_colors.iter().map(|c| hex_to_hsl(c)).collect();
    let profile = PaletteProfile::from_user(&user_hsl);
    let strategy = HarmonyStrategy::from_hue_spread(profile.hue_spread);

    let mut existing_hues: Vec<f32> = user_hsl.iter().map(|c| c.h).collect();
    let mut auto_colors: Vec<String> = Vec::with_capacity(needed);
    let mut auto_hsl: Vec<Hsl> = Vec::with_capacity(needed);

    for index in 0..needed {
        let best_hue = best_candidate_hue(&existing_hues, strategy, index, &profile);
        let (s, l) = distinct_components(
            best_hue,
            total_colors,
            profile.has_white,
            &user_hsl,
            &auto_hsl,
            rng,
        );
        auto_colors.push(hsl_to_hex(best_hue, s, l));
        auto_hsl.push(Hsl { h: best_hue, s, l });
        existing_hues.push(best_hue);
    }

    dedup_in_order(interleave(user_colors, &auto_colors, total_colors), total_colors)
}

/// Scans the 5-degree hue grid and returns the maximum-scoring candidate.
///
/// Ties break toward the first candidate encountered in ascending hue order.
fn best_candidate_hue(
    existing: &[f32],
    strategy: HarmonyStrategy,
    index: usize,
    profile: &PaletteProfile,
) -> f32 {
    let mut best_hue = 0.0;
    let mut best_score = f32::NEG_INFINITY;
    for step in 0..(360 / HUE_STEP) {
        let hue = (step * HUE_STEP) as f32;
        let score = if profile.has_white {
            pastel_score(hue, existing, profile.avg_hue)
        } else {
            harmony_score(hue, existing, strategy, index)
                + avg_hue_bias(hue, profile.avg_hue, 20.0, 0.15)
        };
        if score > best_score {
            best_score = score;
            best_hue = hue;
        }
    }
    best_hue
}

/// Scores `hue` against all existing hues under the selected strategy.
fn harmony_score(hue: f32, existing: &[f32], strategy: HarmonyStrategy, index: usize) -> f32 {
    let min_dist = min_hue_distance(hue, existing);
    let mut score = distance_score(min_dist, existing.len());

    match strategy {
        HarmonyStrategy::Complementary => {
            for &e in existing {
                if hue_distance(hue, e + 180.0) < 30.0 {
                    score += 100.0;
                }
            }
        }
        HarmonyStrategy::Analogous => {
            if min_dist < 60.0 {
                score += 50.0;
            }
        }
        HarmonyStrategy::Triadic => {
            for &e in existing {
                if hue_distance(hue, e + 120.0) < 30.0 || hue_distance(hue, e + 240.0) < 30.0 {
                    score += 80.0;
                }
            }
        }
    }

    // Reward hues near the ideal evenly spaced slot for this index; the
    // weight grows with palette size, where crowding matters most.
    let ideal_spacing = 360.0 / (existing.len() + 1) as f32;
    let ideal_position = ideal_spacing * (index + 1) as f32;
    let distribution_weight = if existing.len() >= 5 { 100.0 } else { 50.0 };
    score += (distribution_weight - hue_distance(hue, ideal_position)).max(0.0);

    if min_dist < 30.0 {
        score -= 200.0;
    } else if min_dist < 45.0 {
        score -= 100.0;
    }
    score
}

/// Scoring path used when the user set contains white or a near-white.
///
/// Favors analogous and split-complementary hues, penalizes the narrow
/// near-complement band, and biases toward the average user hue.
fn pastel_score(hue: f32, existing: &[f32], avg_hue: f32) -> f32 {
    let min_dist = min_hue_distance(hue, existing);
    let mut score = 0.0;
    if min_dist < 60.0 {
        score += 100.0 - min_dist;
    }
    if min_dist > 150.0 && min_dist < 210.0 {
        score += 60.0 - (min_dist - 180.0).abs();
    }
    if min_dist > 170.0 && min_dist < 190.0 {
        score -= 80.0;
    }
    score += min_dist * 0.5;
    score + avg_hue_bias(hue, avg_hue, 40.0, 0.3)
}

/// Base distinctiveness term: minimum angular distance, weighted higher as
/// the palette fills up.
fn distance_score(min_dist: f32, existing_count: usize) -> f32 {
    let weight = if existing_count >= 5 { 1.5 } else { 0.5 };
    min_dist * weight
}

fn avg_hue_bias(hue: f32, avg_hue: f32, base: f32, falloff: f32) -> f32 {
    base - hue_distance(hue, avg_hue) * falloff
}

fn min_hue_distance(hue: f32, existing: &[f32]) -> f32 {
    existing
        .iter()
        .map(|&e| hue_distance(hue, e))
        .fold(f32::INFINITY, f32::min)
}

/// Shortest angular distance between two hues, in `[0, 180]`.
fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Draws saturation/lightness for a new color from the bounded ranges.
///
/// Palettes of six or more retry the draw until the candidate differs from
/// every existing color by more than 60 degrees of hue, 0.15 saturation, or
/// 0.15 lightness; the last draw is accepted if no attempt succeeds.
fn distinct_components<R: Rng + ?Sized>(
    hue: f32,
    total_colors: usize,
    has_white: bool,
    user_hsl: &[Hsl],
    auto_hsl: &[Hsl],
    rng: &mut R,
) -> (f32, f32) {
    let (mut s, mut l) = draw_components(has_white, rng);
    if total_colors >= 6 {
        for _ in 0..DISTINCTNESS_ATTEMPTS {
            let distinct = user_hsl.iter().chain(auto_hsl).all(|e| {
                hue_distance(hue, e.h) > 60.0
                    || (s - e.s).abs() > 0.15
                    || (l - e.l).abs() > 0.15
            });
            if distinct {
                break;
            }
            let (next_s, next_l) = draw_components(has_white, rng);
            s = next_s;
            l = next_l;
        }
    }
    (s, l)
}

fn draw_components<R: Rng + ?Sized>(has_white: bool, rng: &mut R) -> (f32, f32) {
    if has_white {
        // Narrower, lighter ranges keep synthesized colors pastel.
        (rng.gen_range(0.22..0.65), rng.gen_range(0.65..0.96))
    } else {
        (rng.gen_range(0.28..0.85), rng.gen_range(0.55..0.92))
    }
}

/// Alternates user and synthesized colors: user picks land on even output
/// positions while both pools last, synthesized colors fill the gaps, and
/// whichever pool remains drains last.
fn interleave(user: &[String], auto: &[String], total_colors: usize) -> Vec<String> {
    let mut palette = Vec::with_capacity(total_colors);
    let (mut u, mut a) = (0, 0);
    for i in 0..total_colors {
        let take_user = (i % 2 == 0 && u < user.len()) || a >= auto.len();
        if take_user && u < user.len() {
            palette.push(user[u].clone());
            u += 1;
        } else if a < auto.len() {
            palette.push(auto[a].clone());
            a += 1;
        } else {
            break;
        }
    }
    palette
}

/// Removes exact duplicates preserving first occurrence, then truncates.
///
/// A collision legitimately yields a palette shorter than requested; callers
/// must not assume the full length.
fn dedup_in_order(colors: Vec<String>, total_colors: usize) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(colors.len());
    for color in colors {
        if !result.contains(&color) {
            result.push(color);
        }
    }
    result.truncate(total_colors);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_hex6(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
    }

    #[test]
    fn fills_every_palette_size() {
        let mut rng = StdRng::seed_from_u64(7);
        for total in MIN_COLORS..=MAX_COLORS {
            let picks = total / 2;
            let user: Vec<String> = (0..picks)
                .map(|i| hsl_to_hex(i as f32 * 90.0, 0.7, 0.5))
                .collect();
            let palette = synthesize_with(&user, total, &mut rng);
            assert!(palette.len() <= total, "total={total}");
            assert!(!palette.is_empty());
            for color in &palette {
                assert!(is_hex6(color), "bad entry {color:?} at total={total}");
            }
            for (i, a) in palette.iter().enumerate() {
                for b in &palette[i + 1..] {
                    assert_ne!(a, b, "duplicate entry at total={total}");
                }
            }
        }
    }

    #[test]
    fn single_pick_expands_to_four_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let user = vec!["#a259ff".to_string()];
        let palette = synthesize_with(&user, 4, &mut rng);
        assert_eq!(palette.len(), 4);
        assert!(palette.contains(&"#a259ff".to_string()));
    }

    #[test]
    fn empty_user_set_synthesizes_everything() {
        let mut rng = StdRng::seed_from_u64(11);
        let palette = synthesize_with(&[], 5, &mut rng);
        assert_eq!(palette.len(), 5);
    }

    #[test]
    fn saturated_request_passes_through() {
        let user = vec!["#ff0000".to_string(), "#00ff00".to_string()];
        let mut rng = StdRng::seed_from_u64(3);
        let palette = synthesize_with(&user, 2, &mut rng);
        assert_eq!(palette, user);
    }

    #[test]
    fn user_picks_land_on_even_positions() {
        let user = vec!["#ff0000".to_string(), "#0000ff".to_string()];
        let mut rng = StdRng::seed_from_u64(19);
        let palette = synthesize_with(&user, 5, &mut rng);
        assert_eq!(palette[0], "#ff0000");
        assert_eq!(palette[2], "#0000ff");
    }

    #[test]
    fn exact_duplicates_shrink_the_palette() {
        let user = vec!["#ff0000".to_string(), "#ff0000".to_string()];
        let mut rng = StdRng::seed_from_u64(5);
        let palette = synthesize_with(&user, 2, &mut rng);
        assert_eq!(palette, vec!["#ff0000".to_string()]);
    }

    #[test]
    fn white_input_keeps_synthesized_colors_light() {
        let user = vec!["#ffffff".to_string()];
        let mut rng = StdRng::seed_from_u64(23);
        let palette = synthesize_with(&user, 3, &mut rng);
        assert_eq!(palette.len(), 3);
        for color in palette.iter().filter(|c| c.as_str() != "#ffffff") {
            let hsl = crate::color::hex_to_hsl(color);
            assert!(hsl.l > 0.6, "synthesized {color} too dark: l={}", hsl.l);
            assert!(hsl.s < 0.7, "synthesized {color} too saturated: s={}", hsl.s);
        }
    }

    #[test]
    fn base_distance_term_is_monotonic() {
        assert!(distance_score(170.0, 1) >= distance_score(10.0, 1));
        assert!(distance_score(170.0, 5) >= distance_score(10.0, 5));
    }

    #[test]
    fn strategy_follows_hue_spread() {
        assert_eq!(
            HarmonyStrategy::from_hue_spread(20.0),
            HarmonyStrategy::Analogous
        );
        assert_eq!(
            HarmonyStrategy::from_hue_spread(120.0),
            HarmonyStrategy::Complementary
        );
        assert_eq!(
            HarmonyStrategy::from_hue_spread(200.0),
            HarmonyStrategy::Triadic
        );
    }

    #[test]
    fn hue_distance_wraps() {
        assert_eq!(hue_distance(350.0, 10.0), 20.0);
        assert_eq!(hue_distance(0.0, 180.0), 180.0);
        assert_eq!(hue_distance(90.0, 90.0), 0.0);
    }

    #[test]
    fn near_duplicate_hues_score_below_distant_ones() {
        let existing = [0.0];
        let close = harmony_score(10.0, &existing, HarmonyStrategy::Analogous, 0);
        let far = harmony_score(90.0, &existing, HarmonyStrategy::Analogous, 0);
        assert!(far > close);
    }
}
