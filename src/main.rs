//! minimal bootstrap for the side‑scrolling platformer
//!
//! Infinite noise terrain streamed in 8×8 chunks, axis‑separated tile
//! collision at a fixed 60 Hz, and a camera that clamps to the world edge.
//! Works with **Bevy 0.15**.

mod camera;
mod components;
mod config;
mod constants;
mod enemy;
mod physics;
mod player;
mod terrain;
mod tile_stream;
mod world_cache;

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::WindowMode;

use camera::{camera_follow_system, sync_camera_transform_system, PlatformCamera};
use components::ControlInput;
use config::{ConfigError, WorldConfig};
use constants::*;
use enemy::{spawn_enemies, sync_enemy_sprites_system};
use physics::body_physics_system;
use player::{player_input_system, spawn_player, sync_player_sprite_system};
use terrain::{ChunkGenerator, TilePalette};
use tile_stream::{
    stream_chunk_sprites_system, stream_chunks_system, ChunkSprites,
    CollisionIndex, RenderList,
};
use world_cache::TerrainCache;

/* ------------------------------------------------------------------------ */
/* camera                                                                   */
/* ------------------------------------------------------------------------ */
fn setup_camera(mut commands: Commands, config: Res<WorldConfig>) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: config.viewport.x,
                height: config.viewport.y,
            },
            ..OrthographicProjection::default_2d()
        },
    ));
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() -> Result<(), ConfigError> {
    let config = WorldConfig::from_env()?;
    let generator = ChunkGenerator::new(&config)?;

    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.39, 0.39, 1.0)))
        .insert_resource(Time::<Fixed>::from_hz(SIM_HZ))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "side scroller".into(),
                resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))

        /* world state ----------------------------------------------------- */
        .insert_resource(TerrainCache::new(generator))
        .insert_resource(TilePalette::new(config.seed))
        .insert_resource(PlatformCamera::new(config.viewport))
        .insert_resource(config)
        .init_resource::<ControlInput>()
        .init_resource::<CollisionIndex>()
        .init_resource::<RenderList>()
        .init_resource::<ChunkSprites>()

        /* startup systems ------------------------------------------------- */
        .add_systems(Startup, (log_config, setup_camera, spawn_player, spawn_enemies))

        /* fixed‑rate simulation ------------------------------------------- */
        .add_systems(
            FixedUpdate,
            (
                stream_chunks_system,   // visible chunks → collision list
                body_physics_system,    // intents, x pass, y pass
                camera_follow_system,   // offset + anchor
            )
                .chain(),
        )

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                player_input_system,
                (
                    stream_chunk_sprites_system,
                    sync_player_sprite_system,
                    sync_enemy_sprites_system,
                    sync_camera_transform_system,
                ),
            )
                .chain(),
        )
        .run();

    Ok(())
}

fn log_config(config: Res<WorldConfig>) {
    info!(
        "world seed {:#x}, {}px tiles, {}-tile chunks, bounds {:?}",
        config.seed, config.tile_size, config.chunk_size, config.bounds
    );
}
