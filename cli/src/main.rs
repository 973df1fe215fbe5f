use anyhow::Result;
use clap::Parser;
use linkwords_core::{PuzzleEngine, RoundConfig};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use config::Settings;
use render::Renderer;
use session::Session;
use source::{DemoSource, FileSource, LibrarySource, PuzzleSource};

mod config;
mod render;
mod session;
mod source;

/// Group sixteen words into four hidden categories.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Puzzle payload to play, as JSON
    #[arg(short, long, conflicts_with = "library")]
    puzzle: Option<PathBuf>,

    /// Directory of themed payloads, looked up as `<theme>.json`
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Theme of the first puzzle
    #[arg(short, long, default_value = "")]
    theme: String,

    /// Force a shuffle seed instead of a time-based one
    #[arg(short, long)]
    seed: Option<u64>,

    /// Incorrect guesses allowed per round
    #[arg(long)]
    tries: Option<u8>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable coloured category rows
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(tries) = self.tries {
            settings.round = RoundConfig::new(tries);
        }
        if self.no_color {
            settings.color = Some(false);
        }
        Ok(settings)
    }

    fn source(&self) -> Box<dyn PuzzleSource> {
        match (&self.puzzle, &self.library) {
            (Some(path), _) => Box::new(FileSource::new(path.clone())),
            (None, Some(dir)) => Box::new(LibrarySource::new(dir.clone())),
            (None, None) => Box::new(DemoSource),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let settings = args.settings()?;
    let seed = args.seed.unwrap_or_else(time_seed);
    log::debug!("seed: {seed}, settings: {settings:?}");

    let color = settings.color.unwrap_or_else(|| io::stdout().is_terminal());
    let engine = PuzzleEngine::with_config(settings.round, seed);
    let mut session = Session::new(engine, args.source(), Renderer::new(color));

    let intro = session.start(&args.theme);
    if session.engine().state().is_empty() {
        eprint!("{intro}");
    }

    log::debug!("Game started");
    session.run(io::stdin().lock(), io::stdout().lock())
}
