//! Terminal runner (default binary).
//!
//! Hosts the simulation: samples keys into one input frame per fixed tick,
//! feeds it to the core, and renders from the returned events.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use stackfall::core::Game;
use stackfall::input::{should_quit, KeyTracker};
use stackfall::term::{FrameBuffer, GameView, TerminalRenderer, TileView, Viewport};
use stackfall::types::{GameConfig, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "stackfall", about = "Falling-block game in the terminal")]
struct Cli {
    /// JSON file with game configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Randomizer seed. Defaults to the current time.
    #[arg(long)]
    seed: Option<u32>,

    /// Log file (filtered by RUST_LOG, default "info").
    #[arg(long, default_value = "stackfall.log")]
    log: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log)?;

    let config = load_config(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(seed_from_clock);
    let game = Game::new(config, seed).context("invalid game configuration")?;
    info!(seed, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, mut game: Game) -> Result<()> {
    let layout = GameView::new(game.config());
    let mut tiles = TileView::new();
    tiles.apply_all(&game.start());

    let mut tracker = KeyTracker::new();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        layout.render_into(&tiles, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        info!(lines = game.lines_cleared(), "quit");
                        return Ok(());
                    }
                    tracker.handle_key_event(key);
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            if tracker.take_restart() {
                tracker.reset();
                tiles.reset_counters();
                tiles.apply_all(&game.restart());
                continue;
            }

            let frame = tracker.tick(TICK_MS);
            tiles.apply_all(&game.update(TICK_MS, &frame));
        }
    }
}
