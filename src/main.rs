//! Blocktris terminal runner (default binary).
//!
//! One cooperative loop: draw, wait for input until the next tick or frame,
//! feed the engine, fire due ticks, run background maintenance.

use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use blocktris::engine::GameEngine;
use blocktris::input::{handle_key_event, should_quit};
use blocktris::storage::JsonFileStore;
use blocktris::term::{IntervalClock, TerminalRenderer};
use blocktris::HostConfig;

type Engine = GameEngine<JsonFileStore, IntervalClock>;

fn main() -> Result<()> {
    let config = HostConfig::from_env();
    init_logging(config.log_path.as_deref())?;

    let store = JsonFileStore::open(&config.save_path)
        .with_context(|| format!("opening save file {}", config.save_path.display()))?;
    let mut engine = GameEngine::new(store, IntervalClock::new(), config.engine_config());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut engine, &mut term, Duration::from_millis(config.frame_ms));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The terminal is in raw mode, so logs only ever go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}

fn run(engine: &mut Engine, term: &mut TerminalRenderer, frame: Duration) -> Result<()> {
    let mut last = Instant::now();

    loop {
        engine.draw(term);
        term.flush()?;

        // Wake for input, the next tick or the next frame, whichever is first.
        let timeout = engine
            .clock()
            .time_until_due(Instant::now())
            .map_or(frame, |due| due.min(frame));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && should_quit(key) {
                        log::info!("quit");
                        return Ok(());
                    }
                    if let Some(input) = handle_key_event(key) {
                        engine.handle_input(input);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        if engine.clock_mut().poll(now) {
            engine.tick();
        }
        let elapsed = now.duration_since(last).as_millis().min(u32::MAX as u128) as u32;
        engine.advance(elapsed);
        last = now;

        engine.process_background();
    }
}
