//! Jump scares
//!
//! Every `period_ms` a roll decides whether to scare the player. A scare
//! lasts `duration_ms` and swaps the jump controls. Flash, shake and sound
//! are the host's business; it learns about scares through events.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpScareTuning {
    pub enabled: bool,
    pub period_ms: f32,
    /// Probability a roll succeeds, 0..=1
    pub chance: f32,
    pub duration_ms: f32,
}

impl Default for JumpScareTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            period_ms: JUMPSCARE_PERIOD_MS,
            chance: JUMPSCARE_CHANCE,
            duration_ms: JUMPSCARE_DURATION_MS,
        }
    }
}

/// Scare state changes reported by `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScareChange {
    Started,
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpScare {
    tuning: JumpScareTuning,
    since_roll_ms: f32,
    /// Remaining scare time; zero when idle
    remaining_ms: f32,
}

impl JumpScare {
    pub fn new(tuning: JumpScareTuning) -> Self {
        Self {
            tuning,
            since_roll_ms: 0.0,
            remaining_ms: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// Controls are swapped while a scare runs
    pub fn controls_inverted(&self) -> bool {
        self.is_active()
    }

    pub fn update<R: Rng>(&mut self, delta_ms: f32, rng: &mut R) -> Option<ScareChange> {
        if !self.tuning.enabled {
            return None;
        }
        let delta_ms = delta_ms.max(0.0);
        let mut change = None;

        if self.is_active() {
            self.remaining_ms -= delta_ms;
            if self.remaining_ms <= 0.0 {
                self.remaining_ms = 0.0;
                change = Some(ScareChange::Ended);
            }
        }

        // The roll timer runs regardless; an active scare just skips its roll
        self.since_roll_ms += delta_ms;
        if self.tuning.period_ms > 0.0 && self.since_roll_ms >= self.tuning.period_ms {
            self.since_roll_ms -= self.tuning.period_ms;
            let roll: f32 = rng.random();
            if !self.is_active() && change.is_none() && roll < self.tuning.chance {
                self.remaining_ms = self.tuning.duration_ms.max(0.0);
                if self.remaining_ms > 0.0 {
                    change = Some(ScareChange::Started);
                }
            }
        }

        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_certain_scare_runs_for_duration() {
        let mut scare = JumpScare::new(JumpScareTuning {
            chance: 1.0,
            ..Default::default()
        });
        let mut rng = Pcg32::seed_from_u64(1);

        assert_eq!(scare.update(6999.0, &mut rng), None);
        assert_eq!(scare.update(1.0, &mut rng), Some(ScareChange::Started));
        assert!(scare.controls_inverted());

        assert_eq!(scare.update(1999.0, &mut rng), None);
        assert_eq!(scare.update(1.0, &mut rng), Some(ScareChange::Ended));
        assert!(!scare.controls_inverted());
    }

    #[test]
    fn test_zero_chance_never_scares() {
        let mut scare = JumpScare::new(JumpScareTuning {
            chance: 0.0,
            ..Default::default()
        });
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..10_000 {
            assert_eq!(scare.update(16.0, &mut rng), None);
        }
    }

    #[test]
    fn test_disabled() {
        let mut scare = JumpScare::new(JumpScareTuning {
            enabled: false,
            chance: 1.0,
            ..Default::default()
        });
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(scare.update(60_000.0, &mut rng), None);
        assert!(!scare.is_active());
    }

    #[test]
    fn test_scares_never_overlap() {
        let mut scare = JumpScare::new(JumpScareTuning {
            chance: 1.0,
            period_ms: 500.0,
            duration_ms: 2000.0,
            ..Default::default()
        });
        let mut rng = Pcg32::seed_from_u64(4);
        let mut active = false;
        for _ in 0..5_000 {
            match scare.update(16.0, &mut rng) {
                Some(ScareChange::Started) => {
                    assert!(!active);
                    active = true;
                }
                Some(ScareChange::Ended) => {
                    assert!(active);
                    active = false;
                }
                None => {}
            }
            assert_eq!(active, scare.is_active());
        }
    }
}
