//! Seeded gradient noise sampled by the map generator.

use hex_tactics_core::MAX_NOISE_COORDINATE;
use noise::{NoiseFn, Perlin};

/// Deterministic two dimensional Perlin noise.
///
/// The permutation table is derived from the seed once, so a generator built
/// from the same seed always yields the same field.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    perlin: Perlin,
}

impl NoiseGenerator {
    /// Creates a noise field whose permutation table is derived from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            perlin: Perlin::new(folded),
        }
    }

    /// Samples the field at the provided point, returning a value in `[-1, 1]`.
    ///
    /// Points that are not finite or lie beyond [`MAX_NOISE_COORDINATE`] in
    /// either axis sample as `0.0`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !(within_field(x) && within_field(y)) {
            return 0.0;
        }
        let value = self.perlin.get([x, y]);
        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

fn within_field(coordinate: f64) -> bool {
    coordinate.is_finite() && coordinate.abs() <= MAX_NOISE_COORDINATE
}
