#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural terrain generation for Hex Tactics.
//!
//! A session's map is produced exactly once: every hex samples a seeded noise
//! field, receives a small jitter, is classified through the terrain catalog
//! and finally receives a render height. The same configuration always yields
//! the same map.

mod field;

use hex_tactics_core::{
    ConfigError, GameConfig, GridBounds, HexCoord, TerrainCatalog, Tile, TileMap, MAX_JITTER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use field::NoiseGenerator;

/// Parameters steering a single map generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    noise_scale: f64,
    jitter: f64,
    seed: u64,
}

impl Config {
    /// Creates a configuration from explicit parameters.
    ///
    /// The noise scale must be positive and finite, and the jitter must lie
    /// within `[0, MAX_JITTER]`.
    pub fn new(noise_scale: f64, jitter: f64, seed: u64) -> Result<Self, ConfigError> {
        if !(noise_scale.is_finite() && noise_scale > 0.0) {
            return Err(ConfigError::InvalidNoiseScale);
        }
        if !(0.0..=MAX_JITTER).contains(&jitter) {
            return Err(ConfigError::InvalidJitter);
        }
        Ok(Self {
            noise_scale,
            jitter,
            seed,
        })
    }

    /// Extracts the generation parameters from a session configuration.
    pub fn from_game(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::new(config.noise_scale, config.jitter, config.seed)
    }
}

/// Produces tile maps from a noise field and a terrain catalog.
#[derive(Clone, Debug)]
pub struct MapGenerator {
    config: Config,
    catalog: TerrainCatalog,
    noise: NoiseGenerator,
}

impl MapGenerator {
    /// Creates a generator for the provided parameters and catalog.
    #[must_use]
    pub fn new(config: Config, catalog: TerrainCatalog) -> Self {
        Self {
            noise: NoiseGenerator::new(config.seed),
            config,
            catalog,
        }
    }

    /// Raw noise value the generator assigns to the cell before jitter.
    #[must_use]
    pub fn sample(&self, cell: HexCoord) -> f64 {
        let scale = self.config.noise_scale;
        self.noise
            .sample(f64::from(cell.q()) / scale, f64::from(cell.r()) / scale)
    }

    /// Generates a complete map covering the provided bounds.
    #[must_use]
    pub fn generate(&self, bounds: GridBounds) -> TileMap {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut counts = [0usize; 4];

        let map = TileMap::from_fn(bounds, |cell| {
            let normalized = (self.sample(cell) + 1.0) / 2.0;
            let offset = (rng.gen::<f64>() * 2.0 - 1.0) * self.config.jitter;
            let kind = self.catalog.classify_normalized(normalized + offset);
            let profile = self.catalog.profile(kind);
            let height = profile.base_height + rng.gen::<f32>() * profile.height_variance;
            counts[kind.index()] += 1;
            Tile::from_profile(profile, height)
        });

        tracing::debug!(
            columns = bounds.columns(),
            rows = bounds.rows(),
            water = counts[0],
            grass = counts[1],
            forest = counts[2],
            mountain = counts[3],
            "generated terrain"
        );
        map
    }
}

/// Generates the map described by a session configuration, failing on the
/// first malformed option.
pub fn generate(config: &GameConfig) -> Result<TileMap, ConfigError> {
    config.validate()?;
    let bounds = config.bounds()?;
    let catalog = config.catalog()?;
    Ok(MapGenerator::new(Config::from_game(config)?, catalog).generate(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_parameters_are_rejected() {
        assert_eq!(Config::new(10.0, 0.5, 1), Err(ConfigError::InvalidJitter));
        assert_eq!(Config::new(10.0, -0.01, 1), Err(ConfigError::InvalidJitter));
        assert_eq!(Config::new(0.0, 0.0, 1), Err(ConfigError::InvalidNoiseScale));
        assert_eq!(Config::new(f64::NAN, 0.0, 1), Err(ConfigError::InvalidNoiseScale));
        assert!(Config::new(10.0, MAX_JITTER, 1).is_ok());
    }

    #[test]
    fn malformed_game_configuration_fails_before_sampling() {
        for noise_scale in [0.0, f64::NAN, 1e-300] {
            let config = GameConfig {
                noise_scale,
                ..GameConfig::default()
            };
            assert_eq!(generate(&config), Err(ConfigError::InvalidNoiseScale));
        }

        let config = GameConfig {
            jitter: 0.9,
            ..GameConfig::default()
        };
        assert_eq!(generate(&config), Err(ConfigError::InvalidJitter));
    }

    #[test]
    fn sample_scales_coordinates_before_lookup() {
        let config = Config::new(10.0, 0.0, 3).expect("valid parameters");
        let generator = MapGenerator::new(config, TerrainCatalog::default());
        let noise = NoiseGenerator::new(3);
        assert_eq!(generator.sample(HexCoord::new(7, 4)), noise.sample(0.7, 0.4));
    }
}
