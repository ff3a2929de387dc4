//! DUOTRIS - falling blocks for two
//!
//! Two boards, one keyboard, last stack standing wins.

mod board;
mod duel;
mod game;
mod input;
mod piece;
mod queue;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use duel::Duel;
use input::{InputMap, InputTracker};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target tick rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the duotris temp directory, creating it if needed
fn duotris_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("duotris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Session ID keeps concurrent instances out of each other's logs
    let session_id: u32 = rand::random();

    let log_dir = duotris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("duotris=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "DUOTRIS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if let Ok(duel) = &result {
        let [one, two] = duel.games();
        println!("\nThanks for playing DUOTRIS!");
        println!(
            "Player 1: {} lines | Player 2: {} lines",
            one.lines(),
            two.lines()
        );
    }

    tracing::info!("DUOTRIS exiting");
    result.map(|_| ())
}

/// Fixed-timestep loop: poll keys until the tick deadline, then advance
/// both boards and draw.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Duel> {
    let mut tracker = InputTracker::new(InputMap::from_settings(settings));
    let mut duel = Duel::new();
    let mut next_tick = Instant::now() + FRAME_DURATION;

    loop {
        // Drain key events until the tick deadline arrives.
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if timeout.is_zero() {
                break;
            }
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    tracker.on_key_event(key);
                }
            }
        }
        next_tick += FRAME_DURATION;
        let now = Instant::now();
        if next_tick < now {
            // The terminal stalled; drop the lag instead of bursting ticks.
            next_tick = now + FRAME_DURATION;
        }

        let frame = tracker.take_frame();
        if frame.quit {
            return Ok(duel);
        }

        duel.update(&frame);
        terminal.draw(|f| ui::render(f, &duel, settings))?;
    }
}
