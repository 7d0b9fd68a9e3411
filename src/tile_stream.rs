//! per‑frame terrain streaming: visible chunks, collision & render lists,
//! and pooled tile sprites
//!
//! The collision index and render list are rebuilt from scratch every
//! frame from whatever chunks the camera currently covers; only the
//! `WorldCache` persists.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::camera::PlatformCamera;
use crate::components::TileSprite;
use crate::config::WorldConfig;
use crate::terrain::{sim_to_world, ChunkCoord, ChunkSource, TileKind, TilePalette, TilePos};
use crate::world_cache::{TerrainCache, WorldCache};

/* ===========================================================
   visible chunk range
   =========================================================== */
/// chunks covering a viewport at `offset`, one extra per axis for the
/// partially visible trailing chunk
pub fn visible_chunks(offset: Vec2, viewport: Vec2, chunk_span: f32) -> Vec<ChunkCoord> {
    let start = (offset / chunk_span).floor();
    let count = (viewport / chunk_span).ceil() + Vec2::ONE;
    let (sx, sy) = (start.x as i32, start.y as i32);
    let (nx, ny) = (count.x as i32, count.y as i32);

    let mut out = Vec::with_capacity((nx * ny).max(0) as usize);
    for cy in sy..sy + ny {
        for cx in sx..sx + nx {
            out.push(ChunkCoord::new(cx, cy));
        }
    }
    out
}

/* ===========================================================
   collision index
   =========================================================== */
/// tile‑sized rectangles of every solid tile in the visible chunks
#[derive(Resource, Default, Debug)]
pub struct CollisionIndex {
    rects: Vec<Rect>,
}

impl CollisionIndex {
    pub fn rebuild<S: ChunkSource>(
        &mut self,
        cache: &mut WorldCache<S>,
        visible: &[ChunkCoord],
        tile_size: f32,
    ) {
        self.rects.clear();
        for &coord in visible {
            let chunk = cache.get_or_generate(coord);
            self.rects.extend(chunk.solid_tiles().map(|pos| {
                let min = pos.to_pixels(tile_size);
                Rect::from_corners(min, min + Vec2::splat(tile_size))
            }));
        }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

/* ===========================================================
   render list
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDraw {
    pub chunk: ChunkCoord,
    pub tile: TilePos,
    /// top‑left, sim pixels
    pub pos: Vec2,
    pub kind: TileKind,
}

/// every non‑empty tile in the visible chunks, for the sprite streamer
#[derive(Resource, Default, Debug)]
pub struct RenderList {
    pub chunks: Vec<ChunkCoord>,
    pub tiles: Vec<TileDraw>,
}

impl RenderList {
    pub fn rebuild<S: ChunkSource>(
        &mut self,
        cache: &mut WorldCache<S>,
        visible: &[ChunkCoord],
        tile_size: f32,
    ) {
        self.chunks.clear();
        self.chunks.extend_from_slice(visible);
        self.tiles.clear();
        for &chunk in visible {
            let tiles = cache.get_or_generate(chunk).tiles();
            self.tiles.extend(tiles.iter().map(|&(tile, kind)| TileDraw {
                chunk,
                tile,
                pos: tile.to_pixels(tile_size),
                kind,
            }));
        }
    }
}

/* ===========================================================
   stream_chunks_system – cache → collision + render lists
   =========================================================== */
pub fn stream_chunks_system(
    config: Res<WorldConfig>,
    camera: Res<PlatformCamera>,
    mut cache: ResMut<TerrainCache>,
    mut index: ResMut<CollisionIndex>,
    mut render: ResMut<RenderList>,
) {
    let visible = visible_chunks(camera.offset, camera.viewport, config.chunk_span());
    index.rebuild(&mut *cache, &visible, config.tile_size);
    render.rebuild(&mut *cache, &visible, config.tile_size);
}

/* ===========================================================
   sprite streaming – chunk differencing + pooling
   =========================================================== */
#[derive(Resource, Default)]
pub struct ChunkSprites {
    live: HashMap<ChunkCoord, Vec<Entity>>,
    free: Vec<Entity>,
}

#[inline]
fn tile_sprite(draw: &TileDraw, tile_size: f32, palette: &TilePalette) -> (Sprite, Transform) {
    // plants are drawn as a short tuft sitting on the tile's floor
    let size = match draw.kind {
        TileKind::Plant => Vec2::new(tile_size * 0.5, tile_size * 0.75),
        _ => Vec2::splat(tile_size),
    };
    let top_left = draw.pos + Vec2::new((tile_size - size.x) * 0.5, tile_size - size.y);
    let z = if draw.kind == TileKind::Plant { 1.0 } else { 0.0 };
    (
        Sprite {
            color: palette.color(draw.tile, draw.kind),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(sim_to_world(top_left, size).extend(z)),
    )
}

pub fn stream_chunk_sprites_system(
    mut commands: Commands,
    config: Res<WorldConfig>,
    render: Res<RenderList>,
    palette: Res<TilePalette>,
    mut sprites: ResMut<ChunkSprites>,
) {
    let visible: HashSet<ChunkCoord> = render.chunks.iter().copied().collect();
    let ChunkSprites { live, free } = &mut *sprites;

    /* chunks leaving view (re‑pool) -------------------------------------- */
    live.retain(|coord, entities| {
        if visible.contains(coord) {
            return true;
        }
        for &e in entities.iter() {
            commands.entity(e).insert(Visibility::Hidden);
        }
        free.append(entities);
        false
    });

    /* chunks entering view ----------------------------------------------- */
    let entering: HashSet<ChunkCoord> = visible
        .into_iter()
        .filter(|c| !live.contains_key(c))
        .collect();
    if entering.is_empty() {
        return;
    }
    for &coord in &entering {
        live.insert(coord, Vec::new());
    }

    for draw in render.tiles.iter().filter(|d| entering.contains(&d.chunk)) {
        let (sprite, transform) = tile_sprite(draw, config.tile_size, &palette);

        let entity = match free.pop() {
            Some(e) => {
                commands
                    .entity(e)
                    .insert((Visibility::Visible, sprite, transform, TileSprite));
                e
            }
            None => commands.spawn((sprite, transform, TileSprite)).id(),
        };
        if let Some(list) = live.get_mut(&draw.chunk) {
            list.push(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::ChunkGenerator;
    use crate::world_cache::tests::CountingSource;

    const SPAN: f32 = 128.0; // 8 tiles × 16 px

    #[test]
    fn viewport_160_by_120_covers_three_by_two_chunks() {
        let chunks = visible_chunks(Vec2::ZERO, Vec2::new(160.0, 120.0), SPAN);
        let expected: Vec<_> = (0..2)
            .flat_map(|y| (0..3).map(move |x| ChunkCoord::new(x, y)))
            .collect();
        assert_eq!(chunks, expected);
    }

    #[test]
    fn range_starts_at_the_chunk_under_the_offset() {
        let chunks = visible_chunks(Vec2::new(300.0, 130.0), Vec2::new(160.0, 120.0), SPAN);
        assert_eq!(chunks.first(), Some(&ChunkCoord::new(2, 1)));
        assert_eq!(chunks.last(), Some(&ChunkCoord::new(4, 2)));
        assert_eq!(chunks.len(), 6);
    }

    #[test]
    fn rebuild_requests_exactly_the_visible_chunks() {
        let mut cache = WorldCache::new(CountingSource::default());
        let visible = visible_chunks(Vec2::ZERO, Vec2::new(160.0, 120.0), SPAN);

        let mut index = CollisionIndex::default();
        index.rebuild(&mut cache, &visible, 16.0);

        let mut requested = cache.source().requested();
        requested.sort();
        let mut expected = visible.clone();
        expected.sort();
        assert_eq!(requested, expected);

        // the stub emits one solid tile and one plant per chunk
        assert_eq!(index.rects().len(), 6);
        assert!(index
            .rects()
            .contains(&Rect::new(128.0, 128.0, 144.0, 144.0)));

        // a second frame reuses the cache
        index.rebuild(&mut cache, &visible, 16.0);
        assert_eq!(cache.source().calls(), 6);
    }

    #[test]
    fn render_list_keeps_plants_and_chunk_tags() {
        let mut cache = WorldCache::new(CountingSource::default());
        let visible = [ChunkCoord::new(1, 0)];
        let mut render = RenderList::default();
        render.rebuild(&mut cache, &visible, 16.0);

        assert_eq!(render.chunks, visible);
        assert_eq!(
            render.tiles,
            vec![
                TileDraw {
                    chunk: ChunkCoord::new(1, 0),
                    tile: TilePos::new(8, 0),
                    pos: Vec2::new(128.0, 0.0),
                    kind: TileKind::Grass,
                },
                TileDraw {
                    chunk: ChunkCoord::new(1, 0),
                    tile: TilePos::new(9, 0),
                    pos: Vec2::new(144.0, 0.0),
                    kind: TileKind::Plant,
                },
            ]
        );
    }

    #[test]
    fn collision_index_excludes_plants() {
        let config = WorldConfig { plant_chance: 1.0, ..default() };
        let mut cache = WorldCache::new(ChunkGenerator::new(&config).unwrap());
        let visible = visible_chunks(Vec2::ZERO, config.viewport, config.chunk_span());

        let mut index = CollisionIndex::default();
        index.rebuild(&mut cache, &visible, config.tile_size);

        let solid: usize = visible
            .iter()
            .filter_map(|c| cache.get(*c))
            .map(|c| c.solid_tiles().count())
            .sum();
        let plants: usize = visible
            .iter()
            .filter_map(|c| cache.get(*c))
            .map(|c| c.tiles().iter().filter(|(_, k)| *k == TileKind::Plant).count())
            .sum();
        assert!(plants > 0);
        assert_eq!(index.rects().len(), solid);
    }

    #[test]
    fn stream_system_fills_cache_and_index() {
        let config = WorldConfig::default();
        let mut app = App::new();
        app.insert_resource(TerrainCache::new(ChunkGenerator::new(&config).unwrap()))
            .insert_resource(PlatformCamera::new(config.viewport))
            .insert_resource(config.clone())
            .init_resource::<CollisionIndex>()
            .init_resource::<RenderList>()
            .add_systems(Update, stream_chunks_system);

        app.update();

        // 320×180 viewport over 128 px chunks → 4 × 3
        assert_eq!(app.world().resource::<TerrainCache>().len(), 12);
        assert!(!app.world().resource::<CollisionIndex>().rects().is_empty());
        assert_eq!(app.world().resource::<RenderList>().chunks.len(), 12);
    }
}
