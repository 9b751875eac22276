//! Game balance configuration
//!
//! Every knob of a run in one place. All sections default from `consts`, so
//! a JSON file only needs to name what it changes:
//!
//! ```json
//! { "difficulty": { "ramp_end": 5000 }, "jumpscare": { "enabled": false } }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::difficulty::DifficultyTuning;
use crate::sim::jumpscare::JumpScareTuning;
use crate::sim::obstacle::{ObstacleConfig, Viewport};
use crate::sim::parallax::ParallaxTuning;
use crate::sim::player::PlayerTuning;

/// Failure to read or parse a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete tuning for a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyTuning,
    pub obstacles: ObstacleConfig,
    pub player: PlayerTuning,
    pub parallax: ParallaxTuning,
    pub jumpscare: JumpScareTuning,
    pub viewport: Viewport,
}

impl Tuning {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write the tuning as pretty JSON (handy for dumping the defaults)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), TuningError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::difficulty::IntervalRange;

    #[test]
    fn test_empty_json_is_default() {
        let tuning = Tuning::from_json("{}").unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "difficulty": { "ramp_end": 5000, "spawn_interval_base": [2000, 3000] },
            "jumpscare": { "enabled": false },
            "viewport": { "width": 800 }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();

        assert_eq!(tuning.difficulty.ramp_end, 5000);
        assert_eq!(tuning.difficulty.ramp_start, RAMP_START);
        assert_eq!(
            tuning.difficulty.spawn_interval_base,
            IntervalRange::new(2000, 3000)
        );
        assert!(!tuning.jumpscare.enabled);
        assert_eq!(tuning.jumpscare.period_ms, JUMPSCARE_PERIOD_MS);
        assert_eq!(tuning.viewport.width, 800);
        assert_eq!(tuning.viewport.height, VIEWPORT_HEIGHT);
        assert_eq!(tuning.obstacles, ObstacleConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut tuning = Tuning::default();
        tuning.obstacles.min_spacing_px = 420.0;
        tuning.player.gravity = 1800.0;
        let json = tuning.to_json_pretty().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Tuning::from_json("{ \"difficulty\": 12 }").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("invalid tuning JSON"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/nonexistent/haunted-runner/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}
