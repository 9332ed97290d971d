//! Per-query style generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Rgb, Style, SymbolSizes};
use crate::geometry::GeometryKind;

/// Lowest channel value drawn, keeps colors off pure black.
const MIN_CHANNEL: u8 = 1;

/// Highest channel value drawn, keeps colors off pure white.
const MAX_CHANNEL: u8 = 254;

/// Draws a random color per style from an injectable random source.
#[derive(Debug, Clone)]
pub struct StyleAssigner<R = StdRng> {
    rng: R,
    sizes: SymbolSizes,
}

impl<R: Rng> StyleAssigner<R> {
    /// Creates an assigner drawing from the given random source.
    pub fn new(rng: R, sizes: SymbolSizes) -> Self {
        Self { rng, sizes }
    }

    /// Draws a visible color.
    pub fn next_color(&mut self) -> Rgb {
        Rgb::new(
            self.rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
            self.rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
            self.rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
        )
    }

    /// Creates a style with a freshly drawn color for the given kind.
    pub fn new_style(&mut self, kind: GeometryKind) -> Style {
        let color = self.next_color();
        Style::new(kind, color, self.sizes)
    }

    pub fn sizes(&self) -> &SymbolSizes {
        &self.sizes
    }
}

impl StyleAssigner<StdRng> {
    /// Creates an assigner with a deterministic sequence of colors.
    pub fn from_seed(seed: u64, sizes: SymbolSizes) -> Self {
        Self::new(StdRng::seed_from_u64(seed), sizes)
    }

    /// Creates an assigner seeded from the operating system.
    pub fn from_entropy(sizes: SymbolSizes) -> Self {
        Self::new(StdRng::from_entropy(), sizes)
    }
}
