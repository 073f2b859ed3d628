//! Platform Duel headless runner
//!
//! Plays every built-in level with a scripted bot taking both turns and logs
//! each round's summary. Usage: `platform-duel [settings.json] [terrain-seed]`.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use glam::Vec2;
    use platform_duel::consts::SIM_DT;
    use platform_duel::sim::{
        Dismissal, GamePhase, GameState, TickInput, dismiss_summary, start_level, tick,
    };
    use platform_duel::terrain::{DEFAULT_TERRAIN_SIZES, HILL_BAND_SCALES};
    use platform_duel::{HillNoise, LevelCatalog, RoundSummary, Settings};

    /// Give up on a turn after this long (simulated)
    const MAX_TURN_TICKS: u64 = 60 * 120;
    /// Ticks between shots
    const FIRE_INTERVAL: u64 = 40;
    /// Ticks between hops
    const JUMP_INTERVAL: u64 = 75;

    /// Run right, hop now and then, shoot the nearest on-screen enemy
    fn bot_input(state: &GameState, step: u64) -> TickInput {
        let mut input = TickInput {
            right: true,
            jump: step % JUMP_INTERVAL == 0,
            ..Default::default()
        };

        let Some(shooter) = state.active_shooter() else {
            return input;
        };
        if step % FIRE_INTERVAL == 0 && shooter.ammo > 0 {
            let origin = shooter.center();
            input.fire_at = state
                .enemies
                .iter()
                .filter(|e| e.active)
                .map(|e| e.bounds().center())
                .filter(|c| c.x >= state.camera_x)
                .min_by(|a, b| a.distance(origin).total_cmp(&b.distance(origin)))
                .map(|target| Vec2::new(target.x - state.camera_x, target.y));
        }
        input
    }

    /// Tick until the active turn ends or the time limit runs out
    fn play_turn(state: &mut GameState, settings: &Settings) -> bool {
        let Some(player) = state.active_index() else {
            return false;
        };
        for step in 0..MAX_TURN_TICKS {
            let input = bot_input(state, step);
            tick(state, settings, &input, SIM_DT);
            if state.active_index() != Some(player) {
                return true;
            }
        }
        log::warn!("Player {} ran out of time", player + 1);
        false
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Platform Duel (headless) starting...");

        let mut args = std::env::args().skip(1);
        let settings_path = args.next().map(PathBuf::from);
        let settings = Settings::load(settings_path.as_deref());

        let hills = match args.next().and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => HillNoise::with_seed(&DEFAULT_TERRAIN_SIZES, seed),
            None => HillNoise::from_entropy(&DEFAULT_TERRAIN_SIZES),
        };
        for scale in HILL_BAND_SCALES {
            let peak = hills
                .band(0.0, settings.world_width, scale, settings.screen_height)
                .into_iter()
                .map(|(_, y)| y)
                .fold(f32::INFINITY, f32::min);
            log::info!("Hill band x{}: highest point y={:.1}", scale, peak);
        }

        let catalog = LevelCatalog::builtin();
        let mut state = match start_level(&catalog, 0, &settings) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Could not start: {}", e);
                std::process::exit(1);
            }
        };

        loop {
            if !play_turn(&mut state, &settings) {
                return;
            }
            if state.phase == GamePhase::LevelTransition {
                state.resume();
                if !play_turn(&mut state, &settings) {
                    return;
                }
            }

            if let Some(summary) = RoundSummary::from_state(&state) {
                log_summary(&summary);
            }

            match dismiss_summary(&mut state, &catalog, &settings) {
                Ok(Dismissal::NextLevel) => continue,
                Ok(Dismissal::LevelSelect) => break,
                Err(e) => {
                    log::error!("Could not load next level: {}", e);
                    std::process::exit(1);
                }
            }
        }
        log::info!("All levels played");
    }

    fn log_summary(summary: &RoundSummary) {
        log::info!("=== {} (level {}) ===", summary.level_name, summary.level_index);
        for (i, p) in summary.players.iter().enumerate() {
            log::info!(
                "Player {}: score {}, health {}, time {:.2}s",
                i + 1,
                p.score,
                p.health,
                p.time
            );
        }
        log::info!("{}", summary.outcome);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    runner::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives the library directly
}
