//! chasers: spawn and sprite placement (movement comes from `Behavior::Chase`)
use bevy::prelude::*;

use crate::{
    components::*,
    constants::{AGGRO_RADIUS, ENEMY_SIZE, ENEMY_SPAWNS, ENEMY_SPEED},
    physics::PhysicsBody,
    terrain::sim_to_world,
};

const ENEMY_COLOR: Color = Color::srgb(0.80, 0.15, 0.20);

/* ---------- start‑up: drop chasers into the sky ---------- */
pub fn spawn_enemies(mut commands: Commands) {
    let size = Vec2::splat(ENEMY_SIZE);
    for &(x, y) in &ENEMY_SPAWNS {
        let pos = Vec2::new(x, y);
        commands.spawn((
            Sprite {
                color: ENEMY_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(sim_to_world(pos, size).extend(9.0)),
            Enemy,
            Behavior::Chase { aggro_radius: AGGRO_RADIUS },
            PhysicsBody::new(pos, size, ENEMY_SPEED),
        ));
    }
    info!("spawned {} enemies", ENEMY_SPAWNS.len());
}

/* ---------- draw where the body is, facing its heading ---------- */
pub fn sync_enemy_sprites_system(
    mut q: Query<(&PhysicsBody, &mut Transform), With<Enemy>>,
) {
    for (body, mut tf) in &mut q {
        let pos = sim_to_world(body.pos, body.size);
        tf.translation.x = pos.x;
        tf.translation.y = pos.y;
        if body.x_movement != 0.0 {
            tf.scale.x = body.x_movement.signum() * tf.scale.x.abs();
        }
    }
}
