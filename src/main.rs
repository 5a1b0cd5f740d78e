//! MEXICANO - run a padel Mexicano night from your terminal
//!
//! Eight players, seven rounds, a new partner every round.

mod app;
mod engine;
mod storage;
mod tui;

use app::AppCoordinator;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::time::{Duration, Instant};
use tui::Tui;

fn main() -> io::Result<()> {
    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Restore any tournament in progress from disk
    let mut coordinator = AppCoordinator::new();

    // Main event loop; the 1s tick drives the match timer
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        // Calculate timeout for next tick
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        // Poll for events with timeout
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    coordinator.handle_key(key.code);
                }
            }
        }

        // Handle timer tick
        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        // Check for quit
        if coordinator.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
