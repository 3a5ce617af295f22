//! PL4Y entry point
//!
//! Natively this runs the corridor headless on autopilot and prints the event
//! log as JSON lines. The browser build enters through `pl4y::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use pl4y::audio::LogSink;
    use pl4y::consts::NOMINAL_FRAME_MS;
    use pl4y::scene::{FrameInput, SceneCommand, SceneManager};
    use pl4y::{Corridor, CorridorConfig, Seed, Settings};

    const DEFAULT_FRAMES: u64 = 60 * 60;
    const SETTINGS_FILE: &str = "pl4y_settings.json";

    /// Run the Impossible Corridor headless on autopilot
    #[derive(Parser, Debug, Clone, PartialEq, Eq)]
    #[command(author, version, about, long_about = None)]
    pub struct RunOptions {
        /// Seed text; defaults to this week's seed
        #[arg(long, value_parser = parse_seed)]
        pub seed: Option<String>,

        /// Number of frames to simulate at 60 Hz
        #[arg(long, default_value_t = DEFAULT_FRAMES)]
        pub frames: u64,
    }

    fn parse_seed(raw_value: &str) -> Result<String, String> {
        if raw_value.is_empty() {
            return Err("seed must not be empty".to_string());
        }
        Ok(raw_value.to_string())
    }

    pub fn run(options: RunOptions) -> Result<(), String> {
        let settings = Settings::load_from(&PathBuf::from(SETTINGS_FILE));
        let seed = options.seed.map_or_else(Seed::this_week, Seed::new);

        let mut corridor = Corridor::new(CorridorConfig::default(), seed, settings.clone(), LogSink)
            .map_err(|e| e.to_string())?;
        corridor.set_autopilot(true);

        let mut manager = SceneManager::new(settings);
        manager.enter(Box::new(corridor));

        let mut frames_run = 0u64;
        for frame in 0..options.frames {
            let input = FrameInput {
                now_ms: frame as f64 * NOMINAL_FRAME_MS,
                pointer: None,
            };
            frames_run += 1;
            if manager.tick(&input) == SceneCommand::Exit {
                break;
            }
            for line in manager.event_lines() {
                println!("{line}");
            }
            if manager.status().is_some_and(|status| status.over) {
                break;
            }
        }

        if let Some(status) = manager.status() {
            println!(
                "{}",
                serde_json::json!({
                    "kind": "summary",
                    "frames": frames_run,
                    "score": status.score,
                    "lives": status.lives,
                    "over": status.over,
                })
            );
            log::info!(
                "Ran {} frames: score {}, lives {:?}",
                frames_run,
                status.score,
                status.lives
            );
        }
        manager.exit();
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("PL4Y (native) starting...");

    let options = <native::RunOptions as clap::Parser>::parse();
    if let Err(e) = native::run(options) {
        log::error!("{e}");
        eprintln!("pl4y: {e}");
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is pl4y::web::start, this is just to satisfy the compiler
}
