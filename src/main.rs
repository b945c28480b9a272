//! Terminal training runner (default binary).
//!
//! Raw-mode crossterm front end over the async session driver. Keys are read
//! on a dedicated thread and forwarded to the driver; frames are redrawn
//! whenever the driver publishes a new view.

mod terminal;

use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use tetris_training::core::TraceSink;
use tetris_training::input::handle_key_event;
use tetris_training::runtime::{
    DriverEvent, DriverTiming, DriverView, RuntimeConfig, SessionDriver,
};
use tetris_training::types::InputCommand;

use terminal::TerminalRenderer;

const EVENT_QUEUE: usize = 64;

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    init_logging(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = runtime.block_on(run(&config, &mut term));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to a file only; stdout belongs to the game screen.
fn init_logging(config: &RuntimeConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::INFO);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level)
        .init();
    Ok(())
}

async fn run(config: &RuntimeConfig, term: &mut TerminalRenderer) -> Result<()> {
    info!(seed = config.seed, "starting session");
    let session = config.build_session(Arc::new(TraceSink));
    let timing = DriverTiming::for_session(session.config());
    let (driver, views) = SessionDriver::new(session, timing, config.player_name.clone());

    let (tx, rx) = mpsc::channel(EVENT_QUEUE);
    spawn_input_reader(tx);
    let driver_task = tokio::spawn(driver.run(rx));

    render_loop(views, term).await?;

    let session = driver_task.await.context("session driver panicked")??;
    info!(
        score = session.game().score(),
        questions = session.questions_answered(),
        "session ended"
    );
    Ok(())
}

/// Redraw on every published view until the driver drops its sender.
async fn render_loop(
    mut views: watch::Receiver<DriverView>,
    term: &mut TerminalRenderer,
) -> Result<()> {
    let view = views.borrow_and_update().clone();
    term.draw(&view)?;
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        term.draw(&view)?;
    }
    Ok(())
}

/// Blocking key reader; stops after forwarding `Quit` or when the driver is gone.
fn spawn_input_reader(tx: mpsc::Sender<DriverEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) => {
                let Some(command) = handle_key_event(key) else {
                    continue;
                };
                if tx.blocking_send(DriverEvent::Input(command)).is_err()
                    || command == InputCommand::Quit
                {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "terminal input failed");
                let _ = tx.blocking_send(DriverEvent::Shutdown);
                break;
            }
        }
    });
}
