//! Obstacles and the registry that owns them
//!
//! Obstacles are plain position + flag records. They only ever translate
//! left; there is no physics beyond that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::{FixedInterval, IntervalRange};
use super::hitbox::{Collidable, CollisionHit, Hitbox};
use crate::consts::*;

/// Visible play area (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Obstacle spawning and motion knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Obstacle travel relative to the frame distance
    pub speed_multiplier: f32,
    /// Spawn window when no difficulty policy is wired in
    pub interval_ms: IntervalRange,
    /// Floor line distance from the bottom of the viewport
    pub floor_y_offset: f32,
    /// Minimum gap between consecutive obstacles (pixels)
    pub min_spacing_px: f32,
    /// Reaction window that scales the gap with speed (seconds)
    pub spacing_time_factor_s: f32,
    /// Retry delay when a spawn is deferred (ms)
    pub min_spacing_delay_ms: f32,
    /// Backoff cap, in multiples of `min_spacing_delay_ms`
    pub max_deferral_multiplier: u32,
    /// Lowest interval accepted from a policy (ms)
    pub interval_floor_ms: u32,
    pub spawn_margin_px: f32,
    pub cull_margin_px: f32,
    /// Collision box size (independent of the sprite)
    pub hitbox: Vec2,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: OBSTACLE_MOVE_MULTIPLIER,
            interval_ms: DEFAULT_SPAWN_INTERVAL.into(),
            floor_y_offset: FLOOR_Y_OFFSET,
            min_spacing_px: MIN_SPACING_PX,
            spacing_time_factor_s: SPACING_TIME_FACTOR_S,
            min_spacing_delay_ms: MIN_SPACING_DELAY_MS,
            max_deferral_multiplier: MAX_DEFERRAL_MULTIPLIER,
            interval_floor_ms: INTERVAL_FLOOR_MS,
            spawn_margin_px: SPAWN_MARGIN_PX,
            cull_margin_px: CULL_MARGIN_PX,
            hitbox: Vec2::new(OBSTACLE_HITBOX_W, OBSTACLE_HITBOX_H),
        }
    }
}

impl ObstacleConfig {
    /// Clamp negative distances and rates, reorder the default window
    pub fn normalized(mut self) -> Self {
        if !(self.speed_multiplier >= 0.0) {
            log::warn!("obstacles: speed_multiplier {} clamped to 0", self.speed_multiplier);
            self.speed_multiplier = 0.0;
        }
        self.interval_ms = self.interval_ms.normalized();
        self.min_spacing_px = self.min_spacing_px.max(0.0);
        self.spacing_time_factor_s = self.spacing_time_factor_s.max(0.0);
        self.min_spacing_delay_ms = self.min_spacing_delay_ms.max(0.0);
        self.max_deferral_multiplier = self.max_deferral_multiplier.max(1);
        self.spawn_margin_px = self.spawn_margin_px.max(0.0);
        self.cull_margin_px = self.cull_margin_px.max(0.0);
        self.hitbox = self.hitbox.abs();
        self
    }

    /// Right edge of the viewport plus margin, on the floor line
    pub fn spawn_point(&self, viewport: Viewport) -> Vec2 {
        Vec2::new(
            viewport.width as f32 + self.spawn_margin_px,
            viewport.height as f32 - self.floor_y_offset,
        )
    }

    /// Policy built from `interval_ms`
    pub fn default_policy(&self) -> FixedInterval {
        FixedInterval(self.interval_ms)
    }
}

/// A single hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Centre of the hitbox
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
    /// Cosmetic animation clock (ms), not gameplay-affecting
    pub anim_ms: f32,
    pub anim_paused: bool,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            alive: true,
            anim_ms: 0.0,
            anim_paused: false,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.size)
    }

    /// Move left and tick the cosmetic clock
    fn advance(&mut self, travel: f32, delta_ms: f32) {
        self.pos.x -= travel;
        if !self.anim_paused {
            self.anim_ms += delta_ms;
        }
    }
}

/// Something that happened to an obstacle during an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleEvent {
    /// Ran into the player; the obstacle is gone
    Collision(CollisionHit),
    /// Scrolled past the left margin
    Culled { id: u32, x: f32 },
}

/// Sole owner of the live obstacles
#[derive(Debug, Clone)]
pub struct ObstacleRegistry {
    config: ObstacleConfig,
    obstacles: Vec<Obstacle>,
    anim_paused: bool,
    next_id: u32,
}

impl ObstacleRegistry {
    pub fn new(config: ObstacleConfig) -> Self {
        Self {
            config: config.normalized(),
            obstacles: Vec::new(),
            anim_paused: false,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }

    /// Live obstacles in spawn order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// X of the obstacle furthest right, if any
    pub fn rightmost_x(&self) -> Option<f32> {
        self.obstacles.iter().map(|o| o.pos.x).reduce(f32::max)
    }

    /// Place a new obstacle at the spawn point
    pub fn spawn(&mut self, viewport: Viewport) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let mut obstacle = Obstacle::new(id, self.config.spawn_point(viewport), self.config.hitbox);
        obstacle.anim_paused = self.anim_paused;
        log::debug!("obstacle {} spawned at {:?}", id, obstacle.pos);
        self.obstacles.push(obstacle);
        id
    }

    /// Move every obstacle left, resolve collisions with `player`, cull
    /// anything past the left margin.
    pub fn update<C>(
        &mut self,
        delta_ms: f32,
        distance: f32,
        player: &mut C,
        score: f32,
        out: &mut Vec<ObstacleEvent>,
    ) where
        C: Collidable + ?Sized,
    {
        let travel = distance.max(0.0) * self.config.speed_multiplier;
        let delta_ms = delta_ms.max(0.0);
        let cull_x = -self.config.cull_margin_px;
        let player_box = player.hitbox();

        self.obstacles.retain_mut(|obstacle| {
            obstacle.advance(travel, delta_ms);

            let obstacle_box = obstacle.hitbox();
            if obstacle_box.intersects(&player_box) {
                obstacle.alive = false;
                let hit = CollisionHit {
                    obstacle_id: obstacle.id,
                    obstacle_box,
                    score,
                };
                player.on_collide(&hit);
                out.push(ObstacleEvent::Collision(hit));
                return false;
            }

            if obstacle.pos.x < cull_x {
                obstacle.alive = false;
                out.push(ObstacleEvent::Culled {
                    id: obstacle.id,
                    x: obstacle.pos.x,
                });
                return false;
            }

            true
        });
    }

    /// Freeze cosmetic animation (positions are driven by the caller)
    pub fn pause(&mut self) {
        self.anim_paused = true;
        for obstacle in &mut self.obstacles {
            obstacle.anim_paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.anim_paused = false;
        for obstacle in &mut self.obstacles {
            obstacle.anim_paused = false;
        }
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A player parked somewhere obstacles never reach
    fn far_player() -> Hitbox {
        Hitbox::new(Vec2::new(0.0, -10_000.0), Vec2::new(10.0, 10.0))
    }

    fn unit_speed_config() -> ObstacleConfig {
        ObstacleConfig {
            speed_multiplier: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_position() {
        let mut registry = ObstacleRegistry::new(ObstacleConfig::default());
        let viewport = Viewport {
            width: 1280,
            height: 720,
        };
        let id = registry.spawn(viewport);
        let ob = &registry.obstacles()[0];
        assert_eq!(ob.id, id);
        assert_eq!(ob.pos, Vec2::new(1330.0, 720.0 - FLOOR_Y_OFFSET));
        assert!(ob.alive);
    }

    #[test]
    fn test_scrolls_off_and_culls() {
        let mut registry = ObstacleRegistry::new(unit_speed_config());
        let mut player = far_player();
        let _ = registry.spawn(Viewport::default());

        let mut events = Vec::new();
        // 1330 - 5 * 276 = -50, which is still on the margin
        for _ in 0..276 {
            registry.update(16.0, 5.0, &mut player, 0.0, &mut events);
        }
        assert_eq!(registry.len(), 1);
        assert!((registry.obstacles()[0].pos.x + 50.0).abs() < 0.01);
        assert!(events.is_empty());

        for _ in 276..300 {
            registry.update(16.0, 5.0, &mut player, 0.0, &mut events);
        }
        assert!(registry.is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ObstacleEvent::Culled { id: 1, .. }));
    }

    #[test]
    fn test_update_moves_every_obstacle_left() {
        let mut registry = ObstacleRegistry::new(ObstacleConfig::default());
        let mut player = far_player();
        let viewport = Viewport::default();
        let _ = registry.spawn(viewport);
        let mut events = Vec::new();
        registry.update(16.0, 200.0, &mut player, 0.0, &mut events);
        let _ = registry.spawn(viewport);

        let before: Vec<f32> = registry.obstacles().iter().map(|o| o.pos.x).collect();
        registry.update(16.0, 3.0, &mut player, 0.0, &mut events);
        for (ob, x) in registry.obstacles().iter().zip(before) {
            assert!(ob.pos.x < x);
        }
    }

    #[test]
    fn test_collision_removes_obstacle_and_notifies_player() {
        struct Runner {
            hits: Vec<u32>,
        }
        impl Collidable for Runner {
            fn hitbox(&self) -> Hitbox {
                Hitbox::new(Vec2::new(1300.0, 720.0 - FLOOR_Y_OFFSET), Vec2::new(40.0, 60.0))
            }
            fn on_collide(&mut self, hit: &CollisionHit) {
                self.hits.push(hit.obstacle_id);
            }
        }

        let mut registry = ObstacleRegistry::new(unit_speed_config());
        let mut runner = Runner { hits: Vec::new() };
        let id = registry.spawn(Viewport::default());

        let mut events = Vec::new();
        registry.update(16.0, 10.0, &mut runner, 42.0, &mut events);

        assert!(registry.is_empty());
        assert_eq!(runner.hits, vec![id]);
        match events.as_slice() {
            [ObstacleEvent::Collision(hit)] => {
                assert_eq!(hit.obstacle_id, id);
                assert_eq!(hit.score, 42.0);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_pause_only_freezes_animation() {
        let mut registry = ObstacleRegistry::new(unit_speed_config());
        let mut player = far_player();
        let _ = registry.spawn(Viewport::default());
        let mut events = Vec::new();

        registry.update(16.0, 1.0, &mut player, 0.0, &mut events);
        registry.pause();
        registry.update(16.0, 1.0, &mut player, 0.0, &mut events);

        let ob = &registry.obstacles()[0];
        assert_eq!(ob.anim_ms, 16.0);
        assert!((ob.pos.x - 1328.0).abs() < 0.001);

        // Spawned while paused inherits the pause
        let _ = registry.spawn(Viewport::default());
        assert!(registry.obstacles()[1].anim_paused);

        registry.resume();
        registry.update(16.0, 1.0, &mut player, 0.0, &mut events);
        assert_eq!(registry.obstacles()[0].anim_ms, 32.0);
    }

    #[test]
    fn test_rightmost_x() {
        let mut registry = ObstacleRegistry::new(unit_speed_config());
        assert_eq!(registry.rightmost_x(), None);
        let mut player = far_player();
        let _ = registry.spawn(Viewport::default());
        let mut events = Vec::new();
        registry.update(16.0, 100.0, &mut player, 0.0, &mut events);
        let _ = registry.spawn(Viewport::default());
        assert_eq!(registry.rightmost_x(), Some(1330.0));
    }
}
