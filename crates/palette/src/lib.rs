//! Color conversion and procedural palette synthesis for meshfield.
//!
//! The crate is a leaf with two halves:
//!
//! - [`color`] holds pure hex/RGB/HSL conversions with a fail-closed white
//!   fallback for malformed input.
//! - [`synth`] expands a partial user color set into a full, visually
//!   balanced palette via a scored hue search with injectable randomness.
//!
//! Nothing here can fail toward a caller: bad input degrades to documented
//! fallback values so the rendering path never crashes on a color string.

pub mod color;
pub mod synth;

pub use color::{hex_to_hsl, hex_to_rgb01, hsl_to_hex, Hsl};
pub use synth::{synthesize, synthesize_with, HarmonyStrategy, MAX_COLORS, MIN_COLORS};
