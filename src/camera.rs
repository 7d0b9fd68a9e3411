use bevy::prelude::*;

use crate::components::Player;
use crate::config::WorldConfig;
use crate::physics::{PhysicsBody, WorldBounds};
use crate::terrain::sim_to_world;

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

/// viewport offset plus where the tracked body sits on screen
///
/// Both are in sim pixels (y down). `offset` is the world position of the
/// viewport's top‑left corner; `anchor` is the tracked body's top‑left
/// relative to the viewport.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PlatformCamera {
    pub offset: Vec2,
    pub anchor: Vec2,
    pub viewport: Vec2,
}

impl PlatformCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            anchor: Vec2::ZERO,
            viewport,
        }
    }

    /// screen position that keeps a sprite of `size` centred
    pub fn equator(&self, size: Vec2) -> Vec2 {
        self.viewport * 0.5 - size * 0.5
    }

    pub fn update(&mut self, tracked: Rect, viewport: Vec2, bounds: WorldBounds) {
        self.viewport = viewport;
        let equator = self.equator(tracked.size());
        let max = bounds.max_offset(viewport);

        let (ox, ax) = follow_axis(tracked.min.x, equator.x, max.map(|m| m.x));
        let (oy, ay) = follow_axis(tracked.min.y, equator.y, max.map(|m| m.y));
        self.offset = Vec2::new(ox, oy);
        self.anchor = Vec2::new(ax, ay);
    }

    /// anchor translated back into world pixels
    pub fn anchor_world(&self) -> Vec2 {
        self.offset + self.anchor
    }
}

/// (offset, anchor) along one axis
fn follow_axis(tracked: f32, equator: f32, max: Option<f32>) -> (f32, f32) {
    let mut offset = (tracked - equator).max(0.0);
    if let Some(max) = max {
        offset = offset.min(max);
    }

    let pinned = offset <= 0.0 || max.is_some_and(|m| offset >= m);
    let anchor = if pinned { tracked - offset } else { equator };
    (offset, anchor)
}

/// follow the player after physics has settled for this frame
pub fn camera_follow_system(
    config: Res<WorldConfig>,
    mut camera: ResMut<PlatformCamera>,
    player_q: Query<&PhysicsBody, With<Player>>,
) {
    let Ok(body) = player_q.get_single() else { return };
    camera.update(body.rect(), config.viewport, config.bounds);
}

/// move the Bevy camera so its view matches `PlatformCamera::offset`
pub fn sync_camera_transform_system(
    camera: Res<PlatformCamera>,
    mut cam_q: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let centre = sim_to_world(camera.offset, camera.viewport);
    cam_tf.translation.x = snap(centre.x);
    cam_tf.translation.y = snap(centre.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(160.0, 120.0);
    const WORLD: WorldBounds = WorldBounds::Finite(Vec2::new(512.0, 384.0));
    const SPRITE: Vec2 = Vec2::new(16.0, 16.0);

    fn at(x: f32, y: f32) -> Rect {
        Rect::from_corners(Vec2::new(x, y), Vec2::new(x, y) + SPRITE)
    }

    #[test]
    fn origin_pins_camera_and_anchors_to_body() {
        let mut cam = PlatformCamera::new(VIEW);
        cam.update(at(0.0, 0.0), VIEW, WORLD);
        assert_eq!(cam.offset, Vec2::ZERO);
        assert_eq!(cam.anchor, Vec2::ZERO);
    }

    #[test]
    fn world_centre_keeps_body_on_equator() {
        let mut cam = PlatformCamera::new(VIEW);
        cam.update(at(256.0, 192.0), VIEW, WORLD);
        let equator = cam.equator(SPRITE);
        assert_eq!(equator, Vec2::new(72.0, 52.0));
        assert_eq!(cam.offset, Vec2::new(256.0, 192.0) - equator);
        assert_eq!(cam.anchor, equator);
        assert_eq!(cam.anchor_world(), Vec2::new(256.0, 192.0));
    }

    #[test]
    fn far_edge_pins_camera_at_max_offset() {
        let mut cam = PlatformCamera::new(VIEW);
        let pos = Vec2::new(512.0, 384.0) - SPRITE;
        cam.update(at(pos.x, pos.y), VIEW, WORLD);

        assert_eq!(cam.offset, Vec2::new(352.0, 264.0));
        assert_eq!(cam.anchor, pos - cam.offset);
        // the sprite stays fully on screen
        assert!(cam.anchor.x >= 0.0 && cam.anchor.x + SPRITE.x <= VIEW.x);
        assert!(cam.anchor.y >= 0.0 && cam.anchor.y + SPRITE.y <= VIEW.y);
    }

    #[test]
    fn axes_pin_independently() {
        let mut cam = PlatformCamera::new(VIEW);
        cam.update(at(256.0, 10.0), VIEW, WORLD);
        assert_eq!(cam.offset, Vec2::new(184.0, 0.0));
        assert_eq!(cam.anchor, Vec2::new(72.0, 10.0));
    }

    #[test]
    fn infinite_world_has_no_far_bound() {
        let mut cam = PlatformCamera::new(VIEW);
        cam.update(at(10_000.0, 5_000.0), VIEW, WorldBounds::Infinite);
        let equator = cam.equator(SPRITE);
        assert_eq!(cam.offset, Vec2::new(10_000.0, 5_000.0) - equator);
        assert_eq!(cam.anchor, equator);

        // bodies never go below the origin, so a pinned anchor stays on screen
        cam.update(at(0.0, 3.0), VIEW, WorldBounds::Infinite);
        assert_eq!(cam.offset, Vec2::ZERO);
        assert_eq!(cam.anchor, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn world_smaller_than_viewport_never_scrolls() {
        let small = WorldBounds::Finite(Vec2::new(100.0, 80.0));
        let mut cam = PlatformCamera::new(VIEW);
        cam.update(at(60.0, 50.0), VIEW, small);
        assert_eq!(cam.offset, Vec2::ZERO);
        assert_eq!(cam.anchor, Vec2::new(60.0, 50.0));
    }
}
