//! Spawn scheduling
//!
//! Two states: waiting (accumulating frame time) and spawn-check (threshold
//! reached, checking the spacing rule). A spawn resamples the threshold from
//! the interval policy; a spacing failure defers with a bounded backoff.

use rand::Rng;

use super::difficulty::{IntervalRange, SpawnIntervalPolicy};
use super::obstacle::ObstacleConfig;

/// What the scheduler decided this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnDecision {
    /// Still accumulating time
    Wait,
    /// Spawn one obstacle now
    Spawn,
    /// Threshold reached but the gap to the last obstacle is too small
    Defer {
        retry_in_ms: f32,
        required_gap: f32,
        available_gap: f32,
    },
}

/// Facts about the world the spacing rule needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingQuery {
    /// Where a new obstacle would appear
    pub spawn_x: f32,
    /// Rightmost live obstacle, if any
    pub rightmost_x: Option<f32>,
    /// Current obstacle speed (pixels/sec)
    pub speed_px_s: f32,
}

impl SpacingQuery {
    /// Distance between the spawn point and the rightmost obstacle
    pub fn available_gap(&self) -> Option<f32> {
        self.rightmost_x.map(|x| self.spawn_x - x)
    }
}

/// Gap two consecutive obstacles must keep at this speed
pub fn required_gap(config: &ObstacleConfig, speed_px_s: f32) -> f32 {
    config
        .min_spacing_px
        .max(speed_px_s.max(0.0) * config.spacing_time_factor_s)
}

/// Policy window, reordered and floored so it can always be sampled
pub fn clamp_policy_range(range: IntervalRange, floor_ms: u32) -> IntervalRange {
    let range = range.normalized();
    let min_ms = range.min_ms.max(floor_ms);
    let max_ms = range.max_ms.max(min_ms.saturating_add(1));
    IntervalRange::new(min_ms, max_ms)
}

/// Uniform integer draw from the policy window at `score`
pub fn sample_interval<P, R>(policy: &P, score: f32, floor_ms: u32, rng: &mut R) -> u32
where
    P: SpawnIntervalPolicy + ?Sized,
    R: Rng,
{
    let range = clamp_policy_range(policy.interval_range(score), floor_ms);
    rng.random_range(range.min_ms..=range.max_ms)
}

/// Per-run spawn timer
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnScheduler {
    elapsed_ms: f32,
    next_spawn_ms: f32,
    consecutive_deferrals: u32,
}

impl SpawnScheduler {
    pub fn new(first_threshold_ms: u32) -> Self {
        Self {
            elapsed_ms: 0.0,
            next_spawn_ms: first_threshold_ms as f32,
            consecutive_deferrals: 0,
        }
    }

    /// Time since the last spawn (ms)
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Elapsed time at which the next spawn check happens (ms)
    pub fn next_spawn_ms(&self) -> f32 {
        self.next_spawn_ms
    }

    pub fn consecutive_deferrals(&self) -> u32 {
        self.consecutive_deferrals
    }

    /// Back to waiting with a fresh threshold
    pub fn reset(&mut self, first_threshold_ms: u32) {
        *self = Self::new(first_threshold_ms);
    }

    /// Advance by one frame and decide whether to spawn.
    ///
    /// On `Spawn` the timer is already reset and the next threshold drawn
    /// from `policy` at `score`.
    pub fn update<P, R>(
        &mut self,
        delta_ms: f32,
        query: &SpacingQuery,
        score: f32,
        config: &ObstacleConfig,
        policy: &P,
        rng: &mut R,
    ) -> SpawnDecision
    where
        P: SpawnIntervalPolicy + ?Sized,
        R: Rng,
    {
        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms < self.next_spawn_ms {
            return SpawnDecision::Wait;
        }

        let required = required_gap(config, query.speed_px_s);
        match query.available_gap() {
            Some(available) if available < required => {
                self.consecutive_deferrals = self.consecutive_deferrals.saturating_add(1);
                let retry_in_ms = self.backoff_ms(config);
                self.next_spawn_ms = self.elapsed_ms + retry_in_ms;
                SpawnDecision::Defer {
                    retry_in_ms,
                    required_gap: required,
                    available_gap: available,
                }
            }
            _ => {
                self.elapsed_ms = 0.0;
                self.consecutive_deferrals = 0;
                self.next_spawn_ms =
                    sample_interval(policy, score, config.interval_floor_ms, rng) as f32;
                SpawnDecision::Spawn
            }
        }
    }

    /// Linear backoff, capped at `max_deferral_multiplier` delays
    fn backoff_ms(&self, config: &ObstacleConfig) -> f32 {
        let delay = config.min_spacing_delay_ms.max(0.0);
        let steps = self
            .consecutive_deferrals
            .min(config.max_deferral_multiplier.max(1));
        delay * steps as f32
    }
}
