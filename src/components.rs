use bevy::prelude::*;

use crate::physics::{MovementIntent, PhysicsBody};

/* ===========================================================
   markers
   =========================================================== */
#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Enemy;

/* ===========================================================
   input – the four logical signals plus the fly toggle
   =========================================================== */
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub fly_mode: bool,
}

impl ControlInput {
    pub fn x_axis(&self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }

    pub fn y_axis(&self) -> f32 {
        self.crouch as i32 as f32 - self.jump as i32 as f32
    }
}

/* ===========================================================
   behaviour – who decides how a body wants to move
   =========================================================== */
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    PlayerControlled,
    /// fly straight at the target while it is within `aggro_radius`
    Chase { aggro_radius: f32 },
}

impl Behavior {
    pub fn intent(
        &self,
        body: &PhysicsBody,
        input: &ControlInput,
        target: Option<Vec2>,
    ) -> MovementIntent {
        match *self {
            Behavior::PlayerControlled if input.fly_mode => MovementIntent::Fly {
                x_axis: input.x_axis(),
                y_axis: input.y_axis(),
                jump: input.jump,
            },
            Behavior::PlayerControlled => MovementIntent::Walk {
                x_axis: input.x_axis(),
                jump: input.jump,
            },
            Behavior::Chase { aggro_radius } => {
                let Some(target) = target else {
                    return MovementIntent::Steer(Vec2::ZERO);
                };
                let to_target = target - body.pos;
                let dist = to_target.length();
                if dist > aggro_radius {
                    return MovementIntent::Steer(Vec2::ZERO);
                }
                MovementIntent::Steer(body.speed * to_target / dist.max(0.1))
            }
        }
    }
}

/* ===========================================================
   terrain helper components
   =========================================================== */
/// pooled sprite drawing one terrain tile
#[derive(Component)]
pub struct TileSprite;
