//! player spawn, keyboard input and sprite placement

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::camera::PlatformCamera;
use crate::components::*;
use crate::config::WorldConfig;
use crate::constants::*;
use crate::physics::{MotionState, PhysicsBody};
use crate::terrain::sim_to_world;
use crate::world_cache::TerrainCache;

const PLAYER_COLOR: Color = Color::srgb(0.95, 0.85, 0.25);
const PLAYER_AIR_COLOR: Color = Color::srgb(1.0, 0.95, 0.55);

/* ===========================================================
   start‑up: stand the player on the surface
   =========================================================== */
pub fn spawn_player(
    mut commands: Commands,
    config: Res<WorldConfig>,
    cache: Res<TerrainCache>,
    mut camera: ResMut<PlatformCamera>,
) {
    let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
    let first = (PLAYER_SPAWN_X / config.tile_size).floor() as i32;
    let last = ((PLAYER_SPAWN_X + size.x) / config.tile_size).ceil() as i32;
    let surface_row = (first..last)
        .map(|x| cache.source().surface_row(x))
        .min()
        .unwrap_or(config.base_row);
    let surface_y = surface_row as f32 * config.tile_size;
    let spawn = Vec2::new(PLAYER_SPAWN_X, surface_y - size.y);

    let body = PhysicsBody::new(spawn, size, PLAYER_SPEED);
    camera.update(body.rect(), config.viewport, config.bounds);
    info!("player spawned at ({}, {})", spawn.x, spawn.y);

    commands.spawn((
        Sprite {
            color: PLAYER_COLOR,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(sim_to_world(spawn, size).extend(10.0)),
        Player,
        Behavior::PlayerControlled,
        body,
    ));
}

/* ===========================================================
   input (WASD / arrows / Space, F toggles fly mode)
   =========================================================== */
pub fn player_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<ControlInput>,
) {
    input.left   = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    input.right  = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    input.jump   = keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp, KeyCode::Space]);
    input.crouch = keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);

    if keys.just_pressed(KeyCode::KeyF) {
        input.fly_mode = !input.fly_mode;
        info!("fly mode {}", if input.fly_mode { "on" } else { "off" });
    }
}

/* ===========================================================
   sprite placement – the camera anchor decides where we draw
   =========================================================== */
pub fn sync_player_sprite_system(
    camera: Res<PlatformCamera>,
    input: Res<ControlInput>,
    mut q: Query<(&PhysicsBody, &mut Transform, &mut Sprite), With<Player>>,
) {
    let Ok((body, mut tf, mut sprite)) = q.get_single_mut() else { return };
    let pos = sim_to_world(camera.anchor_world(), body.size);
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;

    sprite.color = match body.state() {
        MotionState::Grounded => PLAYER_COLOR,
        MotionState::Jumping | MotionState::Airborne => PLAYER_AIR_COLOR,
    };

    // face the way we are walking
    match input.x_axis() {
        x if x < 0.0 => tf.scale.x = -tf.scale.x.abs(),
        x if x > 0.0 => tf.scale.x = tf.scale.x.abs(),
        _ => {}
    }
}
