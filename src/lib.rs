//! Haunted Runner - endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty curve, obstacle spawning, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local leaderboard of finished runs
//! - `platform`: Browser host bindings (wasm32 only)

pub mod highscores;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Default viewport size (pixels)
    pub const VIEWPORT_WIDTH: u32 = 1280;
    pub const VIEWPORT_HEIGHT: u32 = 720;

    /// Longest frame the simulation will integrate in one tick (ms).
    /// Larger host deltas (tab switch, debugger) are clamped to this.
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Score awarded per pixel of world scrolled
    pub const SCORE_PER_PIXEL: f64 = 0.1;

    // === Difficulty curve ===
    /// World-scroll speed at score 0 (pixels/sec)
    pub const BASE_GAME_SPEED: f32 = 330.0;
    /// Obstacle speed as a fraction of world speed
    pub const OBSTACLE_SPEED_MULTIPLIER: f32 = 1.0;
    /// Base parallax scroll ratio
    pub const PARALLAX_PRIMARY_FACTOR: f32 = 0.8;
    /// Score window of the eased early-game ramp
    pub const RAMP_START: u32 = 450;
    pub const RAMP_END: u32 = 7200;
    /// Speed scale reached at `RAMP_END`
    pub const MAX_SPEED_AT_RAMP_END: f32 = 1.45;
    /// Ceiling for the post-ramp speed scale
    pub const HARD_SPEED_CAP: f32 = 3.0;
    /// Score per post-ramp growth step
    pub const POST_RAMP_STEP: u32 = 800;
    /// Compounding speed growth per step (~2%)
    pub const POST_RAMP_GROWTH_RATE: f32 = 0.02;
    /// Spawn window at score 0 (ms)
    pub const SPAWN_INTERVAL_BASE: [u32; 2] = [3200, 4800];
    /// Spawn window at `RAMP_END` (ms)
    pub const SPAWN_INTERVAL_AT_RAMP_END: [u32; 2] = [1800, 2800];
    /// Compounding spawn window shrink per step (~5%)
    pub const POST_RAMP_TIGHTEN_RATE: f32 = 0.05;
    /// Absolute minimum spawn interval (ms)
    pub const MIN_SPAWN_FLOOR: u32 = 700;
    /// Minimum spread between the bounds of a spawn window (ms)
    pub const MIN_INTERVAL_SPREAD_MS: u32 = 250;

    // === Obstacles ===
    /// Obstacle travel relative to the frame distance
    pub const OBSTACLE_MOVE_MULTIPLIER: f32 = 0.9;
    /// Spawn window used when no difficulty policy is supplied (ms)
    pub const DEFAULT_SPAWN_INTERVAL: [u32; 2] = [2200, 3600];
    /// Floor line distance from the bottom of the viewport
    pub const FLOOR_Y_OFFSET: f32 = 112.0;
    /// Minimum gap between consecutive obstacles (pixels)
    pub const MIN_SPACING_PX: f32 = 300.0;
    /// Reaction window used to scale the gap with speed (seconds)
    pub const SPACING_TIME_FACTOR_S: f32 = 0.55;
    /// Retry delay when a spawn is deferred for spacing (ms)
    pub const MIN_SPACING_DELAY_MS: f32 = 150.0;
    /// Cap on the deferral backoff, in multiples of `MIN_SPACING_DELAY_MS`
    pub const MAX_DEFERRAL_MULTIPLIER: u32 = 3;
    /// Lowest interval accepted from a spawn policy (ms)
    pub const INTERVAL_FLOOR_MS: u32 = 250;
    /// Obstacles spawn this far past the right edge
    pub const SPAWN_MARGIN_PX: f32 = 50.0;
    /// Obstacles are culled this far past the left edge
    pub const CULL_MARGIN_PX: f32 = 50.0;
    /// Obstacle hitbox (the sprite may be larger)
    pub const OBSTACLE_HITBOX_W: f32 = 30.0;
    pub const OBSTACLE_HITBOX_H: f32 = 30.0;

    // === Player ===
    /// Fixed horizontal position of the runner
    pub const PLAYER_X: f32 = 300.0;
    pub const PLAYER_HITBOX_W: f32 = 40.0;
    pub const PLAYER_HITBOX_H: f32 = 60.0;
    /// Downward acceleration (pixels/sec², heavier = less float)
    pub const PLAYER_GRAVITY: f32 = 1500.0;
    /// Launch velocity (negative is up)
    pub const PLAYER_JUMP_VELOCITY: f32 = -840.0;
    /// Fraction of upward speed kept on early release
    pub const PLAYER_JUMP_CUTOFF: f32 = 0.5;
    /// Terminal fall speed
    pub const PLAYER_MAX_FALL: f32 = 1200.0;

    // === Jump scare ===
    pub const JUMPSCARE_PERIOD_MS: f32 = 7000.0;
    pub const JUMPSCARE_CHANCE: f32 = 0.35;
    pub const JUMPSCARE_DURATION_MS: f32 = 2000.0;
}
