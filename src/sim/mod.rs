//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame deltas, clamped
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod hitbox;
pub mod jumpscare;
pub mod manager;
pub mod obstacle;
pub mod parallax;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use difficulty::{
    DifficultyCurve, DifficultySnapshot, DifficultyTuning, FixedInterval, IntervalRange,
    SpawnIntervalPolicy,
};
pub use hitbox::{Collidable, CollisionHit, Hitbox};
pub use jumpscare::{JumpScare, JumpScareTuning, ScareChange};
pub use manager::{ObstacleFrame, ObstacleManager, ObstacleReport};
pub use obstacle::{Obstacle, ObstacleConfig, ObstacleEvent, ObstacleRegistry, Viewport};
pub use parallax::{ParallaxField, ParallaxLayer, ParallaxTuning};
pub use player::{Player, PlayerTuning};
pub use spawner::{SpacingQuery, SpawnDecision, SpawnScheduler};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
