//! Per-frame simulation tick
//!
//! Order within a tick is fixed:
//! pause toggle, frame clamp, difficulty, jump scare, player, obstacles,
//! parallax, distance and score, game over.

use super::hitbox::Collidable;
use super::jumpscare::ScareChange;
use super::manager::ObstacleFrame;
use super::obstacle::ObstacleEvent;
use super::spawner::SpawnDecision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Autopilot jumps when the next obstacle is this many seconds away
const AUTOPILOT_LEAD_S: f32 = 0.15;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump button went down this frame
    pub jump_pressed: bool,
    /// Jump button went up this frame
    pub jump_released: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the simulation plays itself
    pub autopilot: bool,
}

/// Advance the run by `delta_ms` of host time
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.obstacles.pause();
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.obstacles.resume();
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    // NaN lands on 0
    let delta_ms = if delta_ms > 0.0 {
        delta_ms.min(MAX_FRAME_MS)
    } else {
        0.0
    };
    let dt = delta_ms / 1000.0;

    let score = state.score as f32;
    let difficulty = state.curve.snapshot(score);
    state.difficulty = difficulty;

    match state.jumpscare.update(delta_ms, &mut state.scare_rng) {
        Some(ScareChange::Started) => {
            log::info!("jump scare at score {}", state.score);
            state.events.push(GameEvent::JumpScareStarted);
        }
        Some(ScareChange::Ended) => state.events.push(GameEvent::JumpScareEnded),
        None => {}
    }

    // Autopilot bypasses scare inversion
    let (press, release) = if input.autopilot {
        autopilot_controls(state)
    } else if state.jumpscare.controls_inverted() {
        (input.jump_released, input.jump_pressed)
    } else {
        (input.jump_pressed, input.jump_released)
    };
    if press && state.player.press_jump() {
        state.events.push(GameEvent::Jumped);
    }
    if release {
        state.player.release_jump();
    }
    state.player.step(dt);

    let frame = ObstacleFrame {
        delta_ms,
        distance: difficulty.obstacle_speed * dt,
        score,
        viewport: state.viewport,
    };
    let report = state.obstacles.update(&frame, &mut state.player, &state.curve);

    match report.decision {
        SpawnDecision::Defer { retry_in_ms, .. } => {
            state.events.push(GameEvent::SpawnDeferred { retry_in_ms });
        }
        SpawnDecision::Spawn | SpawnDecision::Wait => {}
    }
    let mut collided = None;
    for event in &report.events {
        match *event {
            ObstacleEvent::Collision(hit) => {
                collided = Some(hit.obstacle_id);
                state.events.push(GameEvent::Collision {
                    obstacle_id: hit.obstacle_id,
                    score: state.score,
                });
            }
            ObstacleEvent::Culled { id, .. } => {
                state.events.push(GameEvent::ObstacleCulled { id });
            }
        }
    }
    if let Some(id) = report.spawned {
        state.events.push(GameEvent::ObstacleSpawned { id });
    }

    // Background moves with the unscaled base speed; the factor carries the scale
    let base_distance = state.curve.tuning().base_game_speed * dt;
    state.parallax.scroll(base_distance, difficulty.parallax_factor);

    state.elapsed_ms += delta_ms as f64;
    state.time_ticks += 1;

    if collided.is_some() || !state.player.alive {
        state.phase = GamePhase::GameOver;
        state.obstacles.pause();
        log::info!(
            "game over: score {}, distance {:.0}px, {:.1}s",
            state.score,
            state.distance_px,
            state.elapsed_ms / 1000.0
        );
        state.events.push(GameEvent::GameOver {
            score: state.score,
            distance_px: state.distance_px,
        });
        return;
    }

    state.distance_px += (difficulty.game_speed * dt) as f64;
    let new_score = (state.distance_px * SCORE_PER_PIXEL).floor() as u64;
    state.score = state.score.max(new_score);
}

/// Hop over the nearest obstacle ahead; release early for a short arc
fn autopilot_controls(state: &GameState) -> (bool, bool) {
    if state.player.is_grounded() {
        let player_right = state.player.hitbox().max().x;
        let speed = state.difficulty.obstacle_speed * state.obstacles.config().speed_multiplier;
        let nearest_gap = state
            .obstacles()
            .iter()
            .map(|o| o.hitbox().min().x - player_right)
            .filter(|gap| *gap > 0.0)
            .reduce(f32::min);

        let press = nearest_gap.is_some_and(|gap| gap <= speed * AUTOPILOT_LEAD_S);
        (press, false)
    } else {
        (false, state.player.is_jump_held())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::jumpscare::JumpScareTuning;
    use crate::tuning::Tuning;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn calm_tuning() -> Tuning {
        Tuning {
            jumpscare: JumpScareTuning {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_advances_score() {
        let mut state = GameState::new(12345);
        let input = TickInput::default();
        for _ in 0..60 {
            tick(&mut state, &input, FRAME_MS);
        }
        // One second at 330 px/s
        assert!((state.distance_px - 330.0).abs() < 1.0, "{}", state.distance_px);
        assert_eq!(state.score, (state.distance_px * SCORE_PER_PIXEL).floor() as u64);
        assert_eq!(state.time_ticks, 60);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let input = TickInput::default();
        for _ in 0..30 {
            tick(&mut state, &input, FRAME_MS);
        }

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Paused);

        let distance = state.distance_px;
        let elapsed = state.elapsed_ms;
        let obstacles = state.obstacles().to_vec();
        for _ in 0..100 {
            tick(&mut state, &input, FRAME_MS);
        }
        assert_eq!(state.distance_px, distance);
        assert_eq!(state.elapsed_ms, elapsed);
        assert_eq!(state.obstacles(), obstacles.as_slice());

        // Unpausing runs the same tick
        tick(&mut state, &pause, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.distance_px > distance);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), 10_000.0);
        assert_eq!(state.elapsed_ms, MAX_FRAME_MS as f64);

        tick(&mut state, &TickInput::default(), -5.0);
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.elapsed_ms, MAX_FRAME_MS as f64);
    }

    #[test]
    fn test_standing_still_ends_the_run() {
        let mut state = GameState::with_tuning(calm_tuning(), 7);
        let input = TickInput::default();
        for _ in 0..60 * 30 {
            tick(&mut state, &input, FRAME_MS);
            if state.is_game_over() {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.alive);

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ObstacleSpawned { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Collision { .. })));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));

        // Nothing moves after game over
        let score = state.score;
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.score, score);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_autopilot_clears_obstacles() {
        let mut state = GameState::with_tuning(calm_tuning(), 2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut culled = 0;
        for _ in 0..60 * 60 {
            tick(&mut state, &input, FRAME_MS);
            culled += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ObstacleCulled { .. }))
                .count();
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert!(culled >= 5, "only {culled} obstacles passed");
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = GameState::new(5);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut last = 0;
        for i in 0..5000 {
            let dt = if i % 7 == 0 { 33.0 } else { FRAME_MS };
            tick(&mut state, &input, dt);
            assert!(state.score >= last);
            last = state.score;
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut a, &input, FRAME_MS);
            tick(&mut b, &input, FRAME_MS);
            assert_eq!(a.drain_events(), b.drain_events());
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_scare_inverts_controls() {
        let mut tuning = Tuning::default();
        tuning.jumpscare.chance = 1.0;
        tuning.jumpscare.period_ms = 50.0;
        let mut state = GameState::with_tuning(tuning, 3);

        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert!(state.controls_inverted());

        // Pressing does nothing; releasing jumps
        let press = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, FRAME_MS);
        assert!(state.player.is_grounded());

        let release = TickInput {
            jump_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, FRAME_MS);
        assert!(!state.player.is_grounded());
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_parallax_follows_difficulty() {
        let mut state = GameState::new(9);
        tick(&mut state, &TickInput::default(), 100.0);
        // 330 px/s * 0.1s * 0.8 on the primary layer
        let primary = state.parallax.offset("bg_l5").unwrap_or_default();
        assert!((primary - 26.4).abs() < 0.01, "{primary}");
    }
}
