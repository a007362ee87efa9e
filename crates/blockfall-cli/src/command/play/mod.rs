use std::{path::PathBuf, time::Duration};

use blockfall_engine::PieceSeed;
use rand::Rng as _;

use self::app::PlayApp;

mod app;

const DEFAULT_TICK_MS: u64 = 300;
const DEFAULT_RECORD_DIR: &str = "./data/recordings/";
const DEFAULT_HISTORY_SIZE: usize = 10000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Gravity interval in milliseconds
    #[clap(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub(super) tick_ms: u64,
    /// Fixed seed for the piece sequence (random if omitted)
    #[clap(long)]
    pub(super) seed: Option<u64>,
    /// Save the game recording to a file when the session ends
    #[clap(long)]
    pub(super) save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = DEFAULT_RECORD_DIR)]
    pub(super) record_dir: PathBuf,
    /// Maximum number of locked pieces to keep in memory (oldest are discarded)
    #[clap(long, default_value_t = DEFAULT_HISTORY_SIZE)]
    pub(super) history_size: usize,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            seed: None,
            save_recording: false,
            record_dir: PathBuf::from(DEFAULT_RECORD_DIR),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        tick_ms,
        seed,
        save_recording,
        record_dir,
        history_size,
    } = arg;

    let seed = seed.map_or_else(|| rand::rng().random(), PieceSeed::from);
    let mut app = PlayApp::new(seed, *history_size, Duration::from_millis(*tick_ms));

    ratatui::run(|terminal| app.run(terminal))?;

    let summary = app.summary();
    if app.is_game_over() {
        println!("Game over! score: {}, lines: {}", summary.score, summary.lines);
    } else {
        println!("Quit. score: {}, lines: {}", summary.score, summary.lines);
    }

    if *save_recording {
        let path = app.into_history().save(record_dir)?;
        println!("Recording saved to {}", path.display());
    }

    Ok(())
}
