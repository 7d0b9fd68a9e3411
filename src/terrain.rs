//! deterministic terrain: height field, tile kinds, chunk generation
use std::f64::consts::TAU;

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, NoiseSettings, WorldConfig};
use crate::constants::*;

/// sim space (y down, top‑left anchored) → Bevy world space (y up, centred)
pub fn sim_to_world(top_left: Vec2, size: Vec2) -> Vec2 {
    let centre = top_left + size * 0.5;
    Vec2::new(centre.x, -centre.y)
}

/* ===========================================================
   coordinates
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// top‑left corner in pixels
    pub fn to_pixels(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * tile_size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// floor division, so negative tiles land in negative chunks
    pub fn containing(tile: TilePos, chunk_size: i32) -> Self {
        Self {
            x: tile.x.div_euclid(chunk_size),
            y: tile.y.div_euclid(chunk_size),
        }
    }
}

/* ===========================================================
   tiles
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Empty,
    Grass,
    Dirt,
    Plant,
}

impl TileKind {
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Dirt)
    }
}

/// non‑empty tiles of one chunk, in generation order; never mutated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Vec<(TilePos, TileKind)>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, tiles: Vec<(TilePos, TileKind)>) -> Self {
        Self { coord, tiles }
    }

    #[cfg(test)]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn tiles(&self) -> &[(TilePos, TileKind)] {
        &self.tiles
    }

    pub fn solid_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.tiles
            .iter()
            .filter(|(_, kind)| kind.is_solid())
            .map(|(pos, _)| *pos)
    }
}

/* ===========================================================
   height field
   =========================================================== */
/// smooth, periodic 1‑D height offsets in `[-amplitude, amplitude]`
///
/// Columns are mapped onto a circle in 2‑D Perlin space, so the profile
/// repeats every `period` columns without a seam and the noise inputs stay
/// bounded however far the player walks.
#[derive(Clone, Debug)]
pub struct NoiseHeightField {
    perlin: Perlin,
    settings: NoiseSettings,
}

impl NoiseHeightField {
    pub fn new(seed: u64, settings: NoiseSettings) -> Result<Self, ConfigError> {
        if settings.period <= 0 {
            return Err(ConfigError::NoisePeriod(settings.period));
        }
        if settings.amplitude < 0 {
            return Err(ConfigError::NoiseAmplitude(settings.amplitude));
        }
        Ok(Self {
            perlin: Perlin::new(fold_seed(seed)),
            settings,
        })
    }

    pub fn height(&self, world_x: i32) -> i32 {
        let period = self.settings.period as f64;
        let angle = world_x.rem_euclid(self.settings.period) as f64 / period * TAU;
        let radius = period * self.settings.frequency / TAU;

        let n = self.perlin.get([radius * angle.cos(), radius * angle.sin()]);
        let amp = self.settings.amplitude;
        ((n * amp as f64).round() as i32).clamp(-amp, amp)
    }
}

fn fold_seed(seed: u64) -> u32 {
    (seed as u32) ^ ((seed >> 32) as u32)
}

/* ===========================================================
   chunk generation
   =========================================================== */
/// anything that can fill a chunk; lets the cache be driven by test stubs
pub trait ChunkSource: Send + Sync + 'static {
    fn generate(&self, coord: ChunkCoord) -> Chunk;
}

#[derive(Clone, Debug)]
pub struct ChunkGenerator {
    field: NoiseHeightField,
    seed: u64,
    chunk_size: i32,
    base_row: i32,
    plant_chance: f64,
}

impl ChunkGenerator {
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        let config = config.clone().validate()?;
        Ok(Self {
            field: NoiseHeightField::new(config.seed, config.noise)?,
            seed: config.seed,
            chunk_size: config.chunk_size,
            base_row: config.base_row,
            plant_chance: config.plant_chance,
        })
    }

    /// row of the grass tile in column `world_x`
    pub fn surface_row(&self, world_x: i32) -> i32 {
        self.base_row - self.field.height(world_x)
    }

    /// plant decision for a column, a pure function of (seed, column)
    fn plant_at(&self, world_x: i32) -> bool {
        let key = self.seed ^ (world_x as i64 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        StdRng::seed_from_u64(key).gen_bool(self.plant_chance)
    }

    fn kind_at(&self, x: i32, y: i32, surface: i32) -> TileKind {
        if y > surface {
            TileKind::Dirt
        } else if y == surface {
            TileKind::Grass
        } else if y == surface - 1 && self.plant_at(x) {
            TileKind::Plant
        } else {
            TileKind::Empty
        }
    }
}

impl ChunkSource for ChunkGenerator {
    fn generate(&self, coord: ChunkCoord) -> Chunk {
        let n = self.chunk_size;
        let mut tiles = Vec::new();

        for lx in 0..n {
            let x = coord.x * n + lx;
            let surface = self.surface_row(x);
            for ly in 0..n {
                let y = coord.y * n + ly;
                let kind = self.kind_at(x, y, surface);
                if kind != TileKind::Empty {
                    tiles.push((TilePos::new(x, y), kind));
                }
            }
        }

        Chunk::new(coord, tiles)
    }
}

/* ===========================================================
   tile colours
   =========================================================== */
/// quantised colour‑noise banding for tile sprites
#[derive(Resource)]
pub struct TilePalette {
    color_noise: Perlin,
}

impl TilePalette {
    pub fn new(seed: u64) -> Self {
        Self {
            color_noise: Perlin::new(fold_seed(seed).wrapping_add(1)),
        }
    }

    pub fn color(&self, pos: TilePos, kind: TileKind) -> Color {
        let raw = self.color_noise.get([
            pos.x as f64 * COLOR_NOISE_SCALE,
            pos.y as f64 * COLOR_NOISE_SCALE,
        ]) as f32;

        let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
            .floor()
            .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
        let norm   = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
        let factor = 1.0 + norm * COLOR_VARIATION_STRENGTH;

        let base = match kind {
            TileKind::Grass => Vec3::new(0.13, 0.70, 0.08),
            TileKind::Dirt  => Vec3::new(0.55, 0.27, 0.07),
            TileKind::Plant => Vec3::new(0.35, 0.85, 0.30),
            TileKind::Empty => Vec3::ZERO,
        } * factor;

        Color::srgb(
            base.x.clamp(0.0, 1.0),
            base.y.clamp(0.0, 1.0),
            base.z.clamp(0.0, 1.0),
        )
    }
}
