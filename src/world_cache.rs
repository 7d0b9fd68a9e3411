//! generate‑on‑miss chunk store
//!
//! Chunks are generated at most once per coordinate and kept for the whole
//! session; there is no eviction. Access goes through `ResMut`, so Bevy
//! already serialises generation and the entry API is enough to keep
//! generation single‑shot.
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bevy::prelude::*;

use crate::terrain::{Chunk, ChunkCoord, ChunkGenerator, ChunkSource};

#[derive(Resource)]
pub struct WorldCache<S: ChunkSource> {
    source: S,
    chunks: HashMap<ChunkCoord, Chunk>,
}

/// the cache the game actually runs with
pub type TerrainCache = WorldCache<ChunkGenerator>;

impl<S: ChunkSource> WorldCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            chunks: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get_or_generate(&mut self, coord: ChunkCoord) -> &Chunk {
        match self.chunks.entry(coord) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let chunk = self.source.generate(coord);
                debug!(
                    "generated chunk ({}, {}) with {} tiles",
                    coord.x,
                    coord.y,
                    chunk.tiles().len()
                );
                e.insert(chunk)
            }
        }
    }

    #[cfg(test)]
    /// cached chunk, without generating
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::WorldConfig;
    use crate::terrain::{TileKind, TilePos};

    /// records every coordinate it is asked for
    #[derive(Default)]
    pub(crate) struct CountingSource {
        pub calls: AtomicUsize,
        pub requested: std::sync::Mutex<Vec<ChunkCoord>>,
    }

    impl CountingSource {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<ChunkCoord> {
            self.requested.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl ChunkSource for CountingSource {
        fn generate(&self, coord: ChunkCoord) -> Chunk {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut r) = self.requested.lock() {
                r.push(coord);
            }
            // one solid tile and one plant at the chunk's first cells
            Chunk::new(
                coord,
                vec![
                    (TilePos::new(coord.x * 8, coord.y * 8), TileKind::Grass),
                    (TilePos::new(coord.x * 8 + 1, coord.y * 8), TileKind::Plant),
                ],
            )
        }
    }

    #[test]
    fn second_lookup_hits_the_cache() {
        let mut cache = WorldCache::new(CountingSource::default());
        let coord = ChunkCoord::new(2, -1);

        let first = cache.get_or_generate(coord).clone();
        let second = cache.get_or_generate(coord).clone();

        assert_eq!(first, second);
        assert_eq!(cache.source().calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_coordinates_generate_separately() {
        let mut cache = WorldCache::new(CountingSource::default());
        for x in -2..3 {
            cache.get_or_generate(ChunkCoord::new(x, 0));
            cache.get_or_generate(ChunkCoord::new(x, 0));
        }
        assert_eq!(cache.source().calls(), 5);
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn get_never_generates() {
        let mut cache = WorldCache::new(CountingSource::default());
        assert!(cache.is_empty());
        assert!(cache.get(ChunkCoord::new(0, 0)).is_none());
        assert_eq!(cache.source().calls(), 0);

        cache.get_or_generate(ChunkCoord::new(0, 0));
        assert!(cache.get(ChunkCoord::new(0, 0)).is_some());
    }

    #[test]
    fn cached_terrain_matches_fresh_generation() {
        let config = WorldConfig::default();
        let mut cache = TerrainCache::new(ChunkGenerator::new(&config).unwrap());
        let coord = ChunkCoord::new(-1, 1);

        let cached = cache.get_or_generate(coord).clone();
        assert_eq!(cached, ChunkGenerator::new(&config).unwrap().generate(coord));
    }
}
