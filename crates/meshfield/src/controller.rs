//! UI-facing control state.
//!
//! The controller holds the three knobs the shell exposes — point count,
//! user color picks, animate flag — and derives the full palette from them.
//! Every setter reports whether it changed anything so the caller knows to
//! recompute the palette and restart the frame scheduler.

use rand::rngs::StdRng;
use rand::SeedableRng;

use palette::{synthesize, synthesize_with, MAX_COLORS, MIN_COLORS};

/// Default pick used to pad missing user colors.
pub const DEFAULT_PICK: &str = "#a259ff";

#[derive(Debug, Clone)]
pub struct Controller {
    point_count: usize,
    user_colors: Vec<String>,
    animate: bool,
    seed: Option<u64>,
}

impl Controller {
    /// Builds a controller, clamping the point count to the supported range
    /// and sizing the pick list to `point_count / 2`.
    pub fn new(point_count: usize, user_colors: Vec<String>, animate: bool, seed: Option<u64>) -> Self {
        let mut controller = Self {
            point_count: point_count.clamp(MIN_COLORS, MAX_COLORS),
            user_colors: Vec::new(),
            animate,
            seed,
        };
        controller.user_colors = controller.fit_picks(user_colors);
        controller
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn animate(&self) -> bool {
        self.animate
    }

    pub fn user_colors(&self) -> &[String] {
        &self.user_colors
    }

    /// Number of palette slots the user fills directly.
    pub fn user_pick_count(&self) -> usize {
        self.point_count / 2
    }

    /// Updates the point count, resizing the pick list to match: surplus
    /// picks are dropped, missing ones are padded with [`DEFAULT_PICK`].
    pub fn set_point_count(&mut self, count: usize) -> bool {
        let count = count.clamp(MIN_COLORS, MAX_COLORS);
        if count == self.point_count {
            return false;
        }
        self.point_count = count;
        let taken = std::mem::take(&mut self.user_colors);
        self.user_colors = self.fit_picks(taken);
        true
    }

    /// Replaces the user picks, fitted to the current pick count.
    pub fn set_user_colors(&mut self, colors: Vec<String>) -> bool {
        let fitted = self.fit_picks(colors);
        if fitted == self.user_colors {
            return false;
        }
        self.user_colors = fitted;
        true
    }

    pub fn set_animate(&mut self, animate: bool) -> bool {
        if animate == self.animate {
            return false;
        }
        self.animate = animate;
        true
    }

    /// Synthesizes the full palette from the current picks.
    ///
    /// With a seed the palette is reproducible across runs; without one each
    /// call may shade the synthesized colors differently.
    pub fn palette(&self) -> Vec<String> {
        match self.seed {
            Some(seed) => synthesize_with(
                &self.user_colors,
                self.point_count,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => synthesize(&self.user_colors, self.point_count),
        }
    }

    fn fit_picks(&self, mut colors: Vec<String>) -> Vec<String> {
        let picks = self.user_pick_count();
        colors.truncate(picks);
        while colors.len() < picks {
            colors.push(DEFAULT_PICK.to_string());
        }
        colors
    }
}
