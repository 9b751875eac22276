//! Browser bindings
//!
//! The page owns rendering, audio and input; each animation frame it calls
//! `tick` and reads back positions, speeds and events.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::sim::{GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialised by an earlier module instance
        return;
    }
    log::info!("Haunted Runner core loaded");
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One run plus the local leaderboard
#[wasm_bindgen]
pub struct WebRunner {
    state: GameState,
    high_scores: HighScores,
}

#[wasm_bindgen]
impl WebRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebRunner {
        Self {
            state: GameState::new(seed as u64),
            high_scores: HighScores::new(),
        }
    }

    /// Run with a JSON tuning override
    pub fn with_tuning(seed: u32, tuning_json: &str) -> Result<WebRunner, JsValue> {
        let tuning = Tuning::from_json(tuning_json).map_err(js_err)?;
        Ok(Self {
            state: GameState::with_tuning(tuning, seed as u64),
            high_scores: HighScores::new(),
        })
    }

    pub fn tick(
        &mut self,
        delta_ms: f32,
        jump_pressed: bool,
        jump_released: bool,
        pause: bool,
        autopilot: bool,
    ) {
        let input = TickInput {
            jump_pressed,
            jump_released,
            pause,
            autopilot,
        };
        tick(&mut self.state, &input, delta_ms);
    }

    pub fn restart(&mut self) {
        self.state.restart();
    }

    pub fn score(&self) -> f64 {
        self.state.score as f64
    }

    pub fn distance(&self) -> f64 {
        self.state.distance_px
    }

    pub fn game_speed(&self) -> f32 {
        self.state.difficulty.game_speed
    }

    pub fn parallax_factor(&self) -> f32 {
        self.state.difficulty.parallax_factor
    }

    /// "running", "paused" or "game_over"
    pub fn phase(&self) -> String {
        match self.state.phase {
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn controls_inverted(&self) -> bool {
        self.state.controls_inverted()
    }

    pub fn player_y(&self) -> f32 {
        self.state.player.pos.y
    }

    /// Live obstacles as a JSON array
    pub fn obstacles_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.obstacles()).map_err(js_err)
    }

    /// `[key, offset]` pairs, back to front
    pub fn parallax_json(&self) -> Result<String, JsValue> {
        let offsets: Vec<(&str, f32)> = self
            .state
            .parallax
            .iter()
            .map(|(layer, offset)| (layer.key.as_str(), offset))
            .collect();
        serde_json::to_string(&offsets).map_err(js_err)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events()).map_err(js_err)
    }

    /// Replace the leaderboard with one the page stored
    pub fn load_high_scores(&mut self, json: &str) -> Result<(), JsValue> {
        self.high_scores = HighScores::from_json(json).map_err(js_err)?;
        Ok(())
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        self.high_scores.to_json().map_err(js_err)
    }

    /// Whether the finished run belongs on the leaderboard
    pub fn qualifies(&self) -> bool {
        self.state.is_game_over() && self.high_scores.qualifies(self.state.score)
    }

    /// Record the finished run; returns the rank, 0 if it didn't place
    pub fn record_score(&mut self, name: &str, timestamp_ms: f64) -> Result<u32, JsValue> {
        if !self.state.is_game_over() {
            return Err(JsValue::from_str("run still in progress"));
        }
        let rank = self
            .high_scores
            .add_score(name, self.state.score, self.state.distance_px, timestamp_ms)
            .map_err(js_err)?;
        Ok(rank.map_or(0, |r| r as u32))
    }
}
