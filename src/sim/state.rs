//! Run state
//!
//! Everything one run owns lives here and is only mutated through `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyCurve, DifficultySnapshot};
use super::jumpscare::JumpScare;
use super::manager::ObstacleManager;
use super::obstacle::{Obstacle, Viewport};
use super::parallax::ParallaxField;
use super::player::Player;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scrolling, spawning, colliding
    Running,
    /// Frozen; nothing advances
    Paused,
    /// Player hit an obstacle
    GameOver,
}

/// Things the host reacts to (sound, flash, scene change)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: u32 },
    SpawnDeferred { retry_in_ms: f32 },
    ObstacleCulled { id: u32 },
    Collision { obstacle_id: u32, score: u64 },
    Jumped,
    JumpScareStarted,
    JumpScareEnded,
    Paused,
    Resumed,
    GameOver { score: u64, distance_px: f64 },
}

/// Offset that keeps the scare RNG off the obstacle stream
const SCARE_SEED_SALT: u64 = 0x5ca7_e5ca_7e00_0001;

/// Complete run state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub viewport: Viewport,
    /// World distance scrolled so far (pixels)
    pub distance_px: f64,
    /// Floor of distance times `SCORE_PER_PIXEL`; never decreases
    pub score: u64,
    /// Simulated time (ms)
    pub elapsed_ms: f64,
    pub time_ticks: u64,
    /// Difficulty values used by the latest tick
    pub difficulty: DifficultySnapshot,
    pub player: Player,
    pub parallax: ParallaxField,
    /// Events from the latest ticks, drained by the host
    pub events: Vec<GameEvent>,
    pub(crate) curve: DifficultyCurve,
    pub(crate) obstacles: ObstacleManager,
    pub(crate) jumpscare: JumpScare,
    pub(crate) scare_rng: Pcg32,
    tuning: Tuning,
}

impl GameState {
    /// New run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let curve = DifficultyCurve::new(tuning.difficulty.clone());
        let obstacles = ObstacleManager::new(tuning.obstacles.clone(), seed, &curve);
        let viewport = tuning.viewport;
        let player = Player::new(tuning.player.clone(), ground_y(&tuning));

        log::info!(
            "new run: seed {:#x}, viewport {}x{}",
            seed,
            viewport.width,
            viewport.height
        );

        Self {
            seed,
            phase: GamePhase::Running,
            viewport,
            distance_px: 0.0,
            score: 0,
            elapsed_ms: 0.0,
            time_ticks: 0,
            difficulty: curve.snapshot(0.0),
            player,
            parallax: ParallaxField::new(&tuning.parallax),
            events: Vec::new(),
            curve,
            obstacles,
            jumpscare: JumpScare::new(tuning.jumpscare.clone()),
            scare_rng: Pcg32::seed_from_u64(seed ^ SCARE_SEED_SALT),
            tuning,
        }
    }

    /// Same tuning and seed, from the start
    pub fn restart(&mut self) {
        *self = Self::with_tuning(self.tuning.clone(), self.seed);
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn curve(&self) -> &DifficultyCurve {
        &self.curve
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.obstacles.obstacles()
    }

    pub fn obstacle_manager(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn controls_inverted(&self) -> bool {
        self.jumpscare.controls_inverted()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Surface the player stands on: the bottom of an obstacle sitting on the floor line
fn ground_y(tuning: &Tuning) -> f32 {
    let floor_line = tuning.viewport.height as f32 - tuning.obstacles.floor_y_offset;
    floor_line + tuning.obstacles.hitbox.y.abs() / 2.0
}
