//! world configuration, validated once before the app is built

use std::num::ParseIntError;

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::*;
use crate::physics::WorldBounds;

pub const SEED_ENV: &str = "SIDE_SCROLLER_SEED";
pub const WORLD_ENV: &str = "SIDE_SCROLLER_WORLD";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("chunk size must be a positive number of tiles, got {0}")]
    ChunkSize(i32),
    #[error("tile size must be a positive, finite number of pixels, got {0}")]
    TileSize(f32),
    #[error("viewport must be positive on both axes, got {0}x{1}")]
    Viewport(f32, f32),
    #[error("noise repeat period must be positive, got {0}")]
    NoisePeriod(i32),
    #[error("noise amplitude must not be negative, got {0}")]
    NoiseAmplitude(i32),
    #[error("plant chance must lie in [0, 1], got {0}")]
    PlantChance(f64),
    #[error("max fall speed {max_fall} px/frame would tunnel through {tile} px tiles")]
    FallSpeed { max_fall: f32, tile: f32 },
    #[error("finite world must be positive on both axes, got {0}x{1}")]
    WorldSize(f32, f32),
    #[error("SIDE_SCROLLER_SEED={value:?} is not a u64 seed: {source}")]
    Seed { value: String, source: ParseIntError },
    #[error("SIDE_SCROLLER_WORLD={0:?} is not of the form WIDTHxHEIGHT")]
    WorldSpec(String),
}

/// height‑field shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSettings {
    pub amplitude: i32,
    pub frequency: f64,
    pub period: i32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            amplitude: NOISE_AMPLITUDE,
            frequency: NOISE_FREQUENCY,
            period: NOISE_PERIOD,
        }
    }
}

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub seed: u64,
    pub chunk_size: i32,
    pub tile_size: f32,
    pub base_row: i32,
    pub plant_chance: f64,
    pub noise: NoiseSettings,
    pub viewport: Vec2,
    pub bounds: WorldBounds,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            chunk_size: CHUNK_SIZE,
            tile_size: TILE_SIZE,
            base_row: BASE_ROW,
            plant_chance: PLANT_CHANCE,
            noise: NoiseSettings::default(),
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            bounds: WorldBounds::Infinite,
        }
    }
}

impl WorldConfig {
    /// defaults plus environment overrides, validated
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_overrides(
            std::env::var(SEED_ENV).ok().as_deref(),
            std::env::var(WORLD_ENV).ok().as_deref(),
        )
    }

    pub fn from_overrides(seed: Option<&str>, world: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = seed {
            config.seed = raw.trim().parse().map_err(|source| ConfigError::Seed {
                value: raw.to_owned(),
                source,
            })?;
        }
        if let Some(raw) = world {
            config.bounds = WorldBounds::Finite(parse_world_size(raw)?);
        }
        config.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        if !(self.viewport.x > 0.0 && self.viewport.y > 0.0) {
            return Err(ConfigError::Viewport(self.viewport.x, self.viewport.y));
        }
        if self.noise.period <= 0 {
            return Err(ConfigError::NoisePeriod(self.noise.period));
        }
        if self.noise.amplitude < 0 {
            return Err(ConfigError::NoiseAmplitude(self.noise.amplitude));
        }
        if !(0.0..=1.0).contains(&self.plant_chance) {
            return Err(ConfigError::PlantChance(self.plant_chance));
        }
        if MAX_FALL_SPEED > self.tile_size {
            return Err(ConfigError::FallSpeed {
                max_fall: MAX_FALL_SPEED,
                tile: self.tile_size,
            });
        }
        if let WorldBounds::Finite(size) = self.bounds {
            if !(size.x > 0.0 && size.y > 0.0) {
                return Err(ConfigError::WorldSize(size.x, size.y));
            }
        }
        Ok(self)
    }

    /// width/height of one chunk in pixels
    pub fn chunk_span(&self) -> f32 {
        self.chunk_size as f32 * self.tile_size
    }
}

fn parse_world_size(raw: &str) -> Result<Vec2, ConfigError> {
    let bad = || ConfigError::WorldSpec(raw.to_owned());
    let (w, h) = raw.trim().split_once(['x', 'X']).ok_or_else(bad)?;
    let w: f32 = w.trim().parse().map_err(|_| bad())?;
    let h: f32 = h.trim().parse().map_err(|_| bad())?;
    Ok(Vec2::new(w, h))
}
