//! axis‑separated body physics shared by the player and enemies
//!
//! Positions are in world pixels with y growing *downwards*; the Bevy
//! transforms are derived from these in the presentation systems.

use bevy::prelude::*;

use crate::components::{Behavior, ControlInput};
use crate::config::WorldConfig;
use crate::constants::{G_FORCE, JUMP_LAUNCH, MAX_FALL_SPEED};
use crate::tile_stream::CollisionIndex;

/* ===========================================================
   world bounds
   =========================================================== */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WorldBounds {
    #[default]
    Infinite,
    /// world spans `[0, size.x] × [0, size.y]`
    Finite(Vec2),
}

impl WorldBounds {
    /// largest camera offset that keeps `viewport` inside the world, per axis
    pub fn max_offset(self, viewport: Vec2) -> Option<Vec2> {
        match self {
            WorldBounds::Infinite => None,
            WorldBounds::Finite(size) => Some((size - viewport).max(Vec2::ZERO)),
        }
    }
}

/* ===========================================================
   per‑frame movement intent
   =========================================================== */
/// what a behaviour asks the body to do this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovementIntent {
    /// gravity‑driven ground movement; `x_axis` is -1, 0 or 1
    Walk { x_axis: f32, jump: bool },
    /// gravity replaced by direct vertical control; axes are -1, 0 or 1
    Fly { x_axis: f32, y_axis: f32, jump: bool },
    /// raw velocity, no gravity (chase AI)
    Steer(Vec2),
}

/// sides that touched a tile during the last `move_and_collide`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
    Jumping,
}

/* ===========================================================
   body
   =========================================================== */
#[derive(Component, Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    /// top‑left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub x_movement: f32,
    pub y_movement: f32,
    pub momentum: f32,
    /// 0 or 1
    pub jump_ability: u8,
    pub g_force: f32,
    pub speed: f32,
    just_jumped: bool,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size,
            x_movement: 0.0,
            y_movement: 0.0,
            momentum: 0.0,
            jump_ability: 0,
            g_force: G_FORCE,
            speed,
            just_jumped: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.pos, self.pos + self.size)
    }

    pub fn just_jumped(&self) -> bool {
        self.just_jumped
    }

    pub fn state(&self) -> MotionState {
        if self.just_jumped() {
            MotionState::Jumping
        } else if self.jump_ability > 0 {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        }
    }

    /// turn an intent into `x_movement` / `y_movement` for this frame
    ///
    /// A jump only swaps `momentum` for the launch value: this frame's
    /// `y_movement` is still the gravity step, so the body leaves the ground
    /// one frame after the key press. Setting `y_movement` to the launch too
    /// would lift it on the same frame.
    pub fn eval_movement(&mut self, intent: MovementIntent) {
        self.just_jumped = false;

        let jump = match intent {
            MovementIntent::Walk { x_axis, jump } => {
                self.x_movement = x_axis.clamp(-1.0, 1.0) * self.speed;
                self.momentum = (self.momentum + self.g_force).min(MAX_FALL_SPEED);
                self.y_movement = self.momentum;
                jump
            }
            MovementIntent::Fly { x_axis, y_axis, jump } => {
                self.x_movement = x_axis.clamp(-1.0, 1.0) * self.speed;
                self.momentum = y_axis.clamp(-1.0, 1.0) * self.speed;
                self.y_movement = self.momentum;
                jump
            }
            MovementIntent::Steer(velocity) => {
                self.x_movement = velocity.x;
                self.y_movement = velocity.y;
                false
            }
        };

        // y_movement keeps the gravity value; the launch shows up next frame
        if jump && self.jump_ability > 0 {
            self.momentum = JUMP_LAUNCH;
            self.jump_ability -= 1;
            self.just_jumped = true;
        }
    }

    /// x pass then y pass against `colliders`
    pub fn move_and_collide(&mut self, colliders: &[Rect]) -> Contacts {
        let mut contacts = Contacts::default();
        if !self.x_movement.is_finite() {
            self.x_movement = 0.0;
        }
        if !self.y_movement.is_finite() {
            self.y_movement = 0.0;
        }

        /* ---------- horizontal pass ---------- */
        self.pos.x += self.x_movement;
        let rect = self.rect();
        let hits = colliders.iter().filter(|t| overlaps(rect, **t));
        if self.x_movement > 0.0 {
            if let Some(left) = hits.map(|t| t.min.x).reduce(f32::min) {
                self.pos.x = left - self.size.x;
                contacts.right = true;
            }
        } else if self.x_movement < 0.0 {
            if let Some(right) = hits.map(|t| t.max.x).reduce(f32::max) {
                self.pos.x = right;
                contacts.left = true;
            }
        }

        /* ---------- vertical pass ---------- */
        self.pos.y += self.y_movement;
        let rect = self.rect();
        let hits = colliders.iter().filter(|t| overlaps(rect, **t));
        if self.y_movement > 0.0 {
            if let Some(top) = hits.map(|t| t.min.y).reduce(f32::min) {
                self.pos.y = top - self.size.y;
                contacts.bottom = true;
                if !self.just_jumped {
                    self.momentum = 0.0;
                    self.jump_ability = 1;
                }
            }
        } else if self.y_movement < 0.0 {
            if let Some(bottom) = hits.map(|t| t.max.y).reduce(f32::max) {
                self.pos.y = bottom;
                self.momentum = 0.0;
                contacts.top = true;
            }
        }

        contacts
    }

    /// keep the body inside the world; an infinite world still starts at the
    /// origin, the same floor the camera offset has
    pub fn clamp_to_bounds(&mut self, bounds: WorldBounds) {
        self.pos = match bounds {
            WorldBounds::Infinite => self.pos.max(Vec2::ZERO),
            WorldBounds::Finite(size) => {
                let max = (size - self.size).max(Vec2::ZERO);
                self.pos.clamp(Vec2::ZERO, max)
            }
        };
    }

    /// one full simulation frame
    pub fn update(
        &mut self,
        intent: MovementIntent,
        colliders: &[Rect],
        bounds: WorldBounds,
    ) -> Contacts {
        self.eval_movement(intent);
        let contacts = self.move_and_collide(colliders);
        self.clamp_to_bounds(bounds);
        contacts
    }
}

/* ===========================================================
   body_physics_system – intents, then collide every body
   =========================================================== */
pub fn body_physics_system(
    config: Res<WorldConfig>,
    input: Res<ControlInput>,
    index: Res<CollisionIndex>,
    mut bodies: Query<(&mut PhysicsBody, &Behavior)>,
) {
    let target = bodies
        .iter()
        .find(|(_, behavior)| matches!(behavior, Behavior::PlayerControlled))
        .map(|(body, _)| body.pos);

    for (mut body, behavior) in &mut bodies {
        let intent = behavior.intent(&body, &input, target);
        body.update(intent, index.rects(), config.bounds);
    }
}

/// strict overlap: touching edges do not collide
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}
