// src/ui/tui.rs
//! Terminal setup and the host loop.

use std::{
    io,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::{app::App, config::WavelineConfig, ui::layout::waveform_viewport};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Play `track` in the terminal until the user quits.
pub fn run(config: &WavelineConfig, track: &Path) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, track);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Tui, config: &WavelineConfig, track: &Path) -> Result<()> {
    terminal.clear()?;

    // The surface is sized once from the terminal at startup.
    let size = terminal.size()?;
    let viewport = waveform_viewport(Rect::new(0, 0, size.width, size.height));

    let mut app = App::new(config, track, viewport)?;
    app.play()?;

    let tick_rate = config.player.tick_rate();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.draw(f))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if app.on_key(key)? {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick();
        }
    }

    tracing::info!("exiting");
    Ok(())
}
