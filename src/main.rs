//! Haunted Runner entry point
//!
//! Natively this runs a headless autopilot session and logs how the run
//! unfolds. On wasm32 the page drives `platform::WebRunner` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use haunted_runner::sim::{GameEvent, GameState, TickInput, tick};
    use haunted_runner::Tuning;

    /// Headless autopilot run of the simulation core
    #[derive(Debug, Parser)]
    #[command(name = "haunted-runner", version)]
    struct Args {
        /// JSON tuning file; omitted fields keep their defaults
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Run seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Simulated seconds to run before stopping
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,
        /// Host frame rate to simulate
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Print the default tuning as JSON and exit
        #[arg(long)]
        dump_tuning: bool,
    }

    #[derive(Debug, Default)]
    struct RunStats {
        spawned: u32,
        deferred: u32,
        passed: u32,
        jumps: u32,
        scares: u32,
    }

    impl RunStats {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ObstacleSpawned { .. } => self.spawned += 1,
                GameEvent::SpawnDeferred { .. } => self.deferred += 1,
                GameEvent::ObstacleCulled { .. } => self.passed += 1,
                GameEvent::Jumped => self.jumps += 1,
                GameEvent::JumpScareStarted => self.scares += 1,
                _ => {}
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();

        if args.dump_tuning {
            println!("{}", Tuning::default().to_json_pretty()?);
            return Ok(());
        }

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        anyhow::ensure!(args.fps.is_finite() && args.fps > 0.0, "--fps must be a positive number");

        let frame_ms = 1000.0 / args.fps;
        let mut state = GameState::with_tuning(tuning, args.seed);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut stats = RunStats::default();
        let mut next_report_ms = 10_000.0;

        while state.elapsed_ms < args.seconds * 1000.0 && !state.is_game_over() {
            tick(&mut state, &input, frame_ms);
            for event in state.drain_events() {
                stats.record(&event);
            }

            if state.elapsed_ms >= next_report_ms {
                next_report_ms += 10_000.0;
                let d = state.difficulty;
                log::info!(
                    "t={:.0}s score {} speed x{:.2} ({:.0}px/s) window {}..{}ms, {} live",
                    state.elapsed_ms / 1000.0,
                    state.score,
                    d.speed_scale,
                    d.game_speed,
                    d.spawn_interval.min_ms,
                    d.spawn_interval.max_ms,
                    state.obstacles().len()
                );
            }
        }

        println!(
            "seed {} | {:.1}s | score {} | {} spawn, {} pass, {} defer, {} jump, {} scare{}",
            args.seed,
            state.elapsed_ms / 1000.0,
            state.score,
            stats.spawned,
            stats.passed,
            stats.deferred,
            stats.jumps,
            stats.scares,
            if state.is_game_over() { " | crashed" } else { "" }
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Haunted Runner (native, headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is platform::web::init, this just satisfies the compiler
}
