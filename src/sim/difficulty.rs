//! Difficulty curve
//!
//! Pure function of cumulative score. Early game follows a smoothstep-eased
//! ramp between `ramp_start` and `ramp_end`; past the ramp, speed compounds
//! per `post_ramp_step` toward `hard_speed_cap` while the spawn window keeps
//! tightening down to `min_spawn_floor`.
//!
//! Internal math runs in f64 so the curve stays monotonic near the ramp ends.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A spawn window in milliseconds, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct IntervalRange {
    pub min_ms: u32,
    pub max_ms: u32,
}

impl IntervalRange {
    pub const fn new(min_ms: u32, max_ms: u32) -> Self {
        Self { min_ms, max_ms }
    }

    /// Same window with the bounds in order
    pub fn normalized(self) -> Self {
        Self {
            min_ms: self.min_ms.min(self.max_ms),
            max_ms: self.min_ms.max(self.max_ms),
        }
    }

    pub fn contains(&self, ms: u32) -> bool {
        ms >= self.min_ms && ms <= self.max_ms
    }
}

impl From<[u32; 2]> for IntervalRange {
    fn from([min_ms, max_ms]: [u32; 2]) -> Self {
        Self { min_ms, max_ms }
    }
}

impl From<IntervalRange> for [u32; 2] {
    fn from(range: IntervalRange) -> Self {
        [range.min_ms, range.max_ms]
    }
}

/// Source of spawn windows for a given score
pub trait SpawnIntervalPolicy {
    fn interval_range(&self, score: f32) -> IntervalRange;
}

impl<T: SpawnIntervalPolicy + ?Sized> SpawnIntervalPolicy for &T {
    fn interval_range(&self, score: f32) -> IntervalRange {
        (**self).interval_range(score)
    }
}

/// Score-independent window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub IntervalRange);

impl SpawnIntervalPolicy for FixedInterval {
    fn interval_range(&self, _score: f32) -> IntervalRange {
        self.0
    }
}

/// Difficulty knobs, fixed for the lifetime of a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// World-scroll speed at score 0 (pixels/sec)
    pub base_game_speed: f32,
    /// Fraction of world speed obstacles move at
    pub obstacle_speed_multiplier: f32,
    /// Base parallax scroll ratio
    pub parallax_primary_factor: f32,
    pub ramp_start: u32,
    pub ramp_end: u32,
    /// Speed scale reached at `ramp_end`
    pub max_speed_at_ramp_end: f32,
    /// Ceiling for the speed scale
    pub hard_speed_cap: f32,
    /// Score per post-ramp growth step
    pub post_ramp_step: u32,
    /// Compounding speed growth per step
    pub post_ramp_growth_rate: f32,
    /// Spawn window at score 0
    pub spawn_interval_base: IntervalRange,
    /// Spawn window at `ramp_end`
    pub spawn_interval_at_ramp_end: IntervalRange,
    /// Compounding spawn window shrink per step
    pub post_ramp_tighten_rate: f32,
    /// Absolute minimum spawn interval (ms)
    pub min_spawn_floor: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            base_game_speed: BASE_GAME_SPEED,
            obstacle_speed_multiplier: OBSTACLE_SPEED_MULTIPLIER,
            parallax_primary_factor: PARALLAX_PRIMARY_FACTOR,
            ramp_start: RAMP_START,
            ramp_end: RAMP_END,
            max_speed_at_ramp_end: MAX_SPEED_AT_RAMP_END,
            hard_speed_cap: HARD_SPEED_CAP,
            post_ramp_step: POST_RAMP_STEP,
            post_ramp_growth_rate: POST_RAMP_GROWTH_RATE,
            spawn_interval_base: SPAWN_INTERVAL_BASE.into(),
            spawn_interval_at_ramp_end: SPAWN_INTERVAL_AT_RAMP_END.into(),
            post_ramp_tighten_rate: POST_RAMP_TIGHTEN_RATE,
            min_spawn_floor: MIN_SPAWN_FLOOR,
        }
    }
}

impl DifficultyTuning {
    /// Clamp out-of-range values into the nearest playable one, with a warning
    pub fn normalized(mut self) -> Self {
        if !(self.base_game_speed >= 0.0) {
            log::warn!("difficulty: base_game_speed {} clamped to 0", self.base_game_speed);
            self.base_game_speed = 0.0;
        }
        if !(self.obstacle_speed_multiplier >= 0.0) {
            log::warn!(
                "difficulty: obstacle_speed_multiplier {} clamped to 0",
                self.obstacle_speed_multiplier
            );
            self.obstacle_speed_multiplier = 0.0;
        }
        if !(self.parallax_primary_factor >= 0.0) {
            log::warn!(
                "difficulty: parallax_primary_factor {} clamped to 0",
                self.parallax_primary_factor
            );
            self.parallax_primary_factor = 0.0;
        }
        if self.ramp_end <= self.ramp_start {
            log::warn!(
                "difficulty: ramp_end {} not after ramp_start {}",
                self.ramp_end,
                self.ramp_start
            );
            self.ramp_end = self.ramp_start.saturating_add(1);
        }
        if !(self.max_speed_at_ramp_end >= 1.0) {
            log::warn!(
                "difficulty: max_speed_at_ramp_end {} raised to 1",
                self.max_speed_at_ramp_end
            );
            self.max_speed_at_ramp_end = 1.0;
        }
        if !(self.hard_speed_cap >= self.max_speed_at_ramp_end) {
            log::warn!(
                "difficulty: hard_speed_cap {} below ramp-end speed {}",
                self.hard_speed_cap,
                self.max_speed_at_ramp_end
            );
            self.hard_speed_cap = self.max_speed_at_ramp_end;
        }
        if self.post_ramp_step == 0 {
            log::warn!("difficulty: post_ramp_step 0 raised to 1");
            self.post_ramp_step = 1;
        }
        if !(self.post_ramp_growth_rate >= 0.0) {
            log::warn!(
                "difficulty: post_ramp_growth_rate {} clamped to 0",
                self.post_ramp_growth_rate
            );
            self.post_ramp_growth_rate = 0.0;
        }
        if !(self.post_ramp_tighten_rate >= 0.0) {
            log::warn!(
                "difficulty: post_ramp_tighten_rate {} clamped to 0",
                self.post_ramp_tighten_rate
            );
            self.post_ramp_tighten_rate = 0.0;
        }
        if self.min_spawn_floor == 0 {
            log::warn!("difficulty: min_spawn_floor 0 raised to 1");
            self.min_spawn_floor = 1;
        }
        self.spawn_interval_base = self.spawn_interval_base.normalized();
        self.spawn_interval_at_ramp_end = self.spawn_interval_at_ramp_end.normalized();
        self
    }
}

/// Everything the curve derives for one score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySnapshot {
    pub score: f32,
    pub speed_scale: f32,
    /// World-scroll speed (pixels/sec)
    pub game_speed: f32,
    /// Obstacle speed (pixels/sec)
    pub obstacle_speed: f32,
    pub parallax_factor: f32,
    pub spawn_interval: IntervalRange,
}

/// Score-driven difficulty policy
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyCurve {
    tuning: DifficultyTuning,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self::new(DifficultyTuning::default())
    }
}

impl DifficultyCurve {
    pub fn new(tuning: DifficultyTuning) -> Self {
        Self {
            tuning: tuning.normalized(),
        }
    }

    pub fn tuning(&self) -> &DifficultyTuning {
        &self.tuning
    }

    /// Linear position inside the ramp window, 0..=1
    pub fn progress(&self, score: f32) -> f32 {
        self.progress_f64(sanitize_score(score)) as f32
    }

    /// Standard smoothstep: gentle at both ends, steepest mid-ramp
    pub fn ease_smoothstep(t: f32) -> f32 {
        smoothstep(t as f64) as f32
    }

    /// Dimensionless multiplier on the base world speed, in `[1, hard_speed_cap]`
    pub fn speed_scale(&self, score: f32) -> f32 {
        self.speed_scale_f64(sanitize_score(score)) as f32
    }

    pub fn game_speed(&self, score: f32) -> f32 {
        self.tuning.base_game_speed * self.speed_scale(score)
    }

    pub fn obstacle_speed(&self, score: f32) -> f32 {
        self.game_speed(score) * self.tuning.obstacle_speed_multiplier
    }

    /// Primary background scroll ratio at this score
    pub fn parallax_factor(&self, score: f32) -> f32 {
        self.tuning.parallax_primary_factor * self.speed_scale(score)
    }

    /// Spawn window for this score. Always `min_spawn_floor <= min` and
    /// `max >= min + MIN_INTERVAL_SPREAD_MS`.
    pub fn spawn_interval_range(&self, score: f32) -> IntervalRange {
        let score = sanitize_score(score);
        let t = &self.tuning;

        let (min, max) = if score <= t.ramp_end as f64 {
            let eased = smoothstep(self.progress_f64(score));
            let base = t.spawn_interval_base;
            let end = t.spawn_interval_at_ramp_end;
            (
                lerp(base.min_ms as f64, end.min_ms as f64, eased),
                lerp(base.max_ms as f64, end.max_ms as f64, eased),
            )
        } else {
            let tighten = (1.0 + t.post_ramp_tighten_rate as f64).powf(self.post_ramp_steps(score));
            let end = t.spawn_interval_at_ramp_end;
            (end.min_ms as f64 / tighten, end.max_ms as f64 / tighten)
        };

        let min = round_ms(min).max(t.min_spawn_floor);
        let max = round_ms(max).max(min.saturating_add(MIN_INTERVAL_SPREAD_MS));
        IntervalRange::new(min, max)
    }

    pub fn snapshot(&self, score: f32) -> DifficultySnapshot {
        let speed_scale = self.speed_scale(score);
        let game_speed = self.tuning.base_game_speed * speed_scale;
        DifficultySnapshot {
            score: sanitize_score(score) as f32,
            speed_scale,
            game_speed,
            obstacle_speed: game_speed * self.tuning.obstacle_speed_multiplier,
            parallax_factor: self.tuning.parallax_primary_factor * speed_scale,
            spawn_interval: self.spawn_interval_range(score),
        }
    }

    fn progress_f64(&self, score: f64) -> f64 {
        let start = self.tuning.ramp_start as f64;
        let end = self.tuning.ramp_end as f64;
        if score <= start {
            0.0
        } else if score >= end {
            1.0
        } else {
            (score - start) / (end - start)
        }
    }

    fn post_ramp_steps(&self, score: f64) -> f64 {
        (score - self.tuning.ramp_end as f64).max(0.0) / self.tuning.post_ramp_step as f64
    }

    fn speed_scale_f64(&self, score: f64) -> f64 {
        let t = &self.tuning;
        let peak = t.max_speed_at_ramp_end as f64;
        if score <= t.ramp_end as f64 {
            let eased = smoothstep(self.progress_f64(score));
            return 1.0 + eased * (peak - 1.0);
        }
        let growth = (1.0 + t.post_ramp_growth_rate as f64).powf(self.post_ramp_steps(score));
        (peak * growth).min(t.hard_speed_cap as f64)
    }
}

impl SpawnIntervalPolicy for DifficultyCurve {
    fn interval_range(&self, score: f32) -> IntervalRange {
        self.spawn_interval_range(score)
    }
}

/// Negative and NaN scores count as a fresh run
fn sanitize_score(score: f32) -> f64 {
    if score > 0.0 { score as f64 } else { 0.0 }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn round_ms(ms: f64) -> u32 {
    ms.round().clamp(0.0, u32::MAX as f64) as u32
}
