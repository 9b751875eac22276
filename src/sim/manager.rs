//! Obstacle manager: spawn scheduler + obstacle registry for one run
//!
//! Per update the spawn decision comes first, then existing obstacles move
//! and collide, then a newly spawned obstacle is placed. A fresh obstacle
//! therefore never collides in the frame it appears (it is off-screen anyway).

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::SpawnIntervalPolicy;
use super::hitbox::Collidable;
use super::obstacle::{Obstacle, ObstacleConfig, ObstacleEvent, ObstacleRegistry, Viewport};
use super::spawner::{SpacingQuery, SpawnDecision, SpawnScheduler, sample_interval};

/// Inputs for one obstacle update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleFrame {
    /// Frame length (ms)
    pub delta_ms: f32,
    /// World distance covered this frame (pixels)
    pub distance: f32,
    pub score: f32,
    pub viewport: Viewport,
}

impl ObstacleFrame {
    /// Obstacle speed implied by this frame (pixels/sec)
    pub fn speed_px_s(&self, speed_multiplier: f32) -> f32 {
        if self.delta_ms > 0.0 {
            self.distance.max(0.0) * speed_multiplier * 1000.0 / self.delta_ms
        } else {
            0.0
        }
    }
}

/// What one update did
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleReport {
    pub decision: SpawnDecision,
    /// Id of the obstacle placed this frame
    pub spawned: Option<u32>,
    pub events: Vec<ObstacleEvent>,
}

impl ObstacleReport {
    pub fn collided(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, ObstacleEvent::Collision(_)))
    }
}

/// Owns every obstacle of a run and decides when new ones appear
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    registry: ObstacleRegistry,
    scheduler: SpawnScheduler,
    rng: Pcg32,
}

impl ObstacleManager {
    /// First threshold is drawn from `policy` at score 0
    pub fn new<P>(config: ObstacleConfig, seed: u64, policy: &P) -> Self
    where
        P: SpawnIntervalPolicy + ?Sized,
    {
        let registry = ObstacleRegistry::new(config);
        let mut rng = Pcg32::seed_from_u64(seed);
        let first = sample_interval(policy, 0.0, registry.config().interval_floor_ms, &mut rng);
        Self {
            registry,
            scheduler: SpawnScheduler::new(first),
            rng,
        }
    }

    /// Manager driven by its own `interval_ms` window
    pub fn with_default_policy(config: ObstacleConfig, seed: u64) -> Self {
        let policy = config.default_policy();
        Self::new(config, seed, &policy)
    }

    pub fn config(&self) -> &ObstacleConfig {
        self.registry.config()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.registry.obstacles()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    /// Advance one frame: spawn decision, movement, collision, culling
    pub fn update<C, P>(
        &mut self,
        frame: &ObstacleFrame,
        player: &mut C,
        policy: &P,
    ) -> ObstacleReport
    where
        C: Collidable + ?Sized,
        P: SpawnIntervalPolicy + ?Sized,
    {
        let config = self.registry.config();
        let query = SpacingQuery {
            spawn_x: config.spawn_point(frame.viewport).x,
            rightmost_x: self.registry.rightmost_x(),
            speed_px_s: frame.speed_px_s(config.speed_multiplier),
        };
        let decision = self.scheduler.update(
            frame.delta_ms,
            &query,
            frame.score,
            config,
            policy,
            &mut self.rng,
        );

        if let SpawnDecision::Defer {
            retry_in_ms,
            required_gap,
            available_gap,
        } = decision
        {
            log::debug!(
                "spawn deferred: gap {:.0}/{:.0}px, retry in {:.0}ms",
                available_gap,
                required_gap,
                retry_in_ms
            );
        }

        let mut events = Vec::new();
        self.registry
            .update(frame.delta_ms, frame.distance, player, frame.score, &mut events);

        let spawned = match decision {
            SpawnDecision::Spawn => {
                let id = self.registry.spawn(frame.viewport);
                log::debug!("next spawn check in {:.0}ms", self.scheduler.next_spawn_ms());
                Some(id)
            }
            _ => None,
        };

        ObstacleReport {
            decision,
            spawned,
            events,
        }
    }

    /// Place an obstacle immediately, outside the scheduler
    pub fn spawn(&mut self, viewport: Viewport) -> u32 {
        self.registry.spawn(viewport)
    }

    /// Drop every obstacle and restart the timer from score 0
    pub fn reset<P>(&mut self, policy: &P)
    where
        P: SpawnIntervalPolicy + ?Sized,
    {
        self.registry.clear();
        let first = sample_interval(
            policy,
            0.0,
            self.registry.config().interval_floor_ms,
            &mut self.rng,
        );
        self.scheduler.reset(first);
    }

    pub fn pause(&mut self) {
        self.registry.pause();
    }

    pub fn resume(&mut self) {
        self.registry.resume();
    }
}
