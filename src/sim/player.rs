//! The runner
//!
//! Fixed on the x axis; only jumps. Variable jump height comes from cutting
//! upward speed when the button is released early.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hitbox::{Collidable, CollisionHit, Hitbox};
use crate::consts::*;

/// Jump feel knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Fixed horizontal position
    pub x: f32,
    pub hitbox: Vec2,
    /// Downward acceleration (pixels/sec²)
    pub gravity: f32,
    /// Launch velocity, negative is up (pixels/sec)
    pub jump_velocity: f32,
    /// Fraction of upward speed kept on early release
    pub jump_cutoff: f32,
    /// Terminal fall speed (pixels/sec)
    pub max_fall: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            hitbox: Vec2::new(PLAYER_HITBOX_W, PLAYER_HITBOX_H),
            gravity: PLAYER_GRAVITY,
            jump_velocity: PLAYER_JUMP_VELOCITY,
            jump_cutoff: PLAYER_JUMP_CUTOFF,
            max_fall: PLAYER_MAX_FALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Centre of the hitbox
    pub pos: Vec2,
    pub vel_y: f32,
    pub alive: bool,
    grounded: bool,
    jump_held: bool,
    /// Y of the surface the player stands on
    ground_y: f32,
    tuning: PlayerTuning,
}

impl Player {
    /// Standing on `ground_y`
    pub fn new(tuning: PlayerTuning, ground_y: f32) -> Self {
        let pos = Vec2::new(tuning.x, ground_y - tuning.hitbox.y / 2.0);
        Self {
            pos,
            vel_y: 0.0,
            alive: true,
            grounded: true,
            jump_held: false,
            ground_y,
            tuning,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_jump_held(&self) -> bool {
        self.jump_held
    }

    /// Height of the hitbox bottom above the ground
    pub fn height_above_ground(&self) -> f32 {
        self.ground_y - (self.pos.y + self.tuning.hitbox.y / 2.0)
    }

    /// Jump if standing; returns whether a jump started
    pub fn press_jump(&mut self) -> bool {
        self.jump_held = true;
        if !self.grounded || !self.alive {
            return false;
        }
        self.vel_y = self.tuning.jump_velocity;
        self.grounded = false;
        true
    }

    /// Cut the ascent for a shorter hop
    pub fn release_jump(&mut self) {
        self.jump_held = false;
        if self.vel_y < 0.0 {
            self.vel_y *= self.tuning.jump_cutoff;
        }
    }

    /// Integrate gravity and land on the ground
    pub fn step(&mut self, dt: f32) {
        if self.grounded {
            return;
        }

        self.vel_y = (self.vel_y + self.tuning.gravity * dt).min(self.tuning.max_fall);
        self.pos.y += self.vel_y * dt;

        let half_h = self.tuning.hitbox.y / 2.0;
        if self.pos.y + half_h >= self.ground_y && self.vel_y >= 0.0 {
            self.pos.y = self.ground_y - half_h;
            self.vel_y = 0.0;
            self.grounded = true;
        }
    }
}

impl Collidable for Player {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.tuning.hitbox)
    }

    fn on_collide(&mut self, hit: &CollisionHit) {
        if self.alive {
            log::info!("player hit obstacle {} at score {:.0}", hit.obstacle_id, hit.score);
        }
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 120.0;

    /// Jump and return (peak height, airtime seconds)
    fn run_jump(release_after: Option<u32>) -> (f32, f32) {
        let mut player = Player::new(PlayerTuning::default(), 600.0);
        assert!(player.press_jump());

        let mut peak: f32 = 0.0;
        let mut ticks = 0;
        while !player.is_grounded() && ticks < 1000 {
            if Some(ticks) == release_after {
                player.release_jump();
            }
            player.step(DT);
            peak = peak.max(player.height_above_ground());
            ticks += 1;
        }
        (peak, ticks as f32 * DT)
    }

    #[test]
    fn test_full_jump_arc() {
        let (peak, airtime) = run_jump(None);
        // v²/2g = 840² / 3000 ≈ 235px, 2v/g ≈ 1.12s
        assert!((peak - 235.2).abs() < 5.0, "peak {peak}");
        assert!((airtime - 1.12).abs() < 0.03, "airtime {airtime}");
    }

    #[test]
    fn test_early_release_is_lower() {
        let (full, _) = run_jump(None);
        let (short, _) = run_jump(Some(10));
        assert!(short < full * 0.75, "short {short} full {full}");
    }

    #[test]
    fn test_no_double_jump() {
        let mut player = Player::new(PlayerTuning::default(), 600.0);
        assert!(player.press_jump());
        player.step(DT);
        assert!(!player.press_jump());
    }

    #[test]
    fn test_lands_on_ground() {
        let mut player = Player::new(PlayerTuning::default(), 600.0);
        let start = player.pos;
        let _ = player.press_jump();
        for _ in 0..500 {
            player.step(DT);
        }
        assert!(player.is_grounded());
        assert_eq!(player.pos, start);
        assert_eq!(player.height_above_ground(), 0.0);
    }

    #[test]
    fn test_fall_speed_capped() {
        let tuning = PlayerTuning {
            jump_velocity: -5000.0,
            ..Default::default()
        };
        let mut player = Player::new(tuning, 100_000.0);
        let _ = player.press_jump();
        for _ in 0..2000 {
            player.step(DT);
            assert!(player.vel_y <= PLAYER_MAX_FALL);
        }
    }

    #[test]
    fn test_collision_kills() {
        let mut player = Player::new(PlayerTuning::default(), 600.0);
        let hit = CollisionHit {
            obstacle_id: 1,
            obstacle_box: player.hitbox(),
            score: 10.0,
        };
        player.on_collide(&hit);
        assert!(!player.alive);
        assert!(!player.press_jump());
    }
}
