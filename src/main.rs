//! Emberfall headless driver
//!
//! Runs the simulation with scripted input through the fixed-timestep loop a
//! frontend would use, logging HUD samples along the way.
//!
//! Usage: `emberfall [SEED] [FRAMES] [--data levels.json] [--tuning tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod driver {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use glam::Vec2;

    use emberfall::consts::*;
    use emberfall::sim::{SimState, TickInput, attack, fireball, heal, tick};
    use emberfall::{GameData, Tuning};

    /// Frame time of the simulated display (30 FPS, so two substeps a frame)
    const FRAME_DT: f32 = 1.0 / 30.0;
    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Headless Emberfall run with scripted input
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Run seed
        #[arg(default_value_t = 12345)]
        pub seed: u64,
        /// Display frames to simulate
        #[arg(default_value_t = 1800)]
        pub frames: u32,
        /// Level and monster tables (JSON)
        #[arg(long)]
        pub data: Option<PathBuf>,
        /// Gameplay tuning (JSON)
        #[arg(long)]
        pub tuning: Option<PathBuf>,
    }

    fn read_config(path: Option<&Path>) -> Option<String> {
        let path = path?;
        match std::fs::read_to_string(path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not read {} ({e}), using defaults", path.display());
                None
            }
        }
    }

    /// Head for the exit with a little weaving, fighting along the way
    fn scripted_input(state: &SimState) -> Vec2 {
        let target = state
            .level
            .portal()
            .map(|p| p.pos)
            .unwrap_or_else(|| emberfall::cell_to_world(END_CELL.0, END_CELL.1));
        let weave = ((state.tick as f32) * 0.05).sin() * 0.5;
        let dir = (target - state.player.pos).normalize_or_zero();
        Vec2::new(dir.x, dir.y + weave)
    }

    fn run_commands(state: &mut SimState) {
        if state.tick % 30 == 0 {
            attack(state);
        }
        if state.tick % 90 == 45 {
            fireball(state);
        }
        if state.player.health < state.player.max_health / 3 && state.tick % 60 == 0 {
            heal(state);
        }
    }

    pub fn run(args: Args) {
        log::info!("Emberfall (headless) starting with seed {}", args.seed);

        let data = read_config(args.data.as_deref())
            .map(|json| GameData::from_json_or_default(&json))
            .unwrap_or_default();
        let tuning = read_config(args.tuning.as_deref())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();

        let mut state = SimState::with_config(args.seed, data, tuning);
        let mut accumulator = 0.0f32;

        for _ in 0..args.frames {
            accumulator += FRAME_DT.min(0.1);

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                run_commands(&mut state);
                let input = TickInput {
                    movement: scripted_input(&state),
                    viewport: Some(VIEWPORT),
                };
                if let Some(hud) = tick(&mut state, &input) {
                    if hud.tick % 300 == 0 {
                        log::info!(
                            "[tick {}] {} HP {}/{} on level {}",
                            hud.tick,
                            hud.name,
                            hud.health,
                            hud.max_health,
                            hud.level
                        );
                    }
                }
                accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        let snapshot = state.snapshot();
        log::info!(
            "Finished at tick {} on level {} ({} entities, {} texts, {} gold)",
            snapshot.tick,
            snapshot.level.index + 1,
            snapshot.entities.len(),
            snapshot.floating_texts.len(),
            state.inventory.quantity("coin")
        );
        match serde_json::to_string_pretty(&snapshot.level) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize level info: {e}"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["emberfall"]).unwrap();
            assert_eq!(args.seed, 12345);
            assert_eq!(args.frames, 1800);
            assert!(args.data.is_none());
            assert!(args.tuning.is_none());
        }

        #[test]
        fn test_args_positional_and_flags() {
            let args =
                Args::try_parse_from(["emberfall", "42", "600", "--tuning", "hard.json"]).unwrap();
            assert_eq!(args.seed, 42);
            assert_eq!(args.frames, 600);
            assert_eq!(args.tuning, Some(PathBuf::from("hard.json")));
            assert!(Args::try_parse_from(["emberfall", "not-a-seed"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let args = driver::Args::parse();
    env_logger::init();
    driver::run(args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host frontend; there is no browser entry point
}
