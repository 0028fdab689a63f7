//! A terminal client for the expense store API.
//!
//! The client keeps no state of its own beyond the current dialog: the
//! expense list on screen is always a copy fetched from the server, and
//! every successful mutation triggers a re-fetch.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub mod api;
pub mod state;
pub mod ui;

use api::ApiClient;
use state::App;

/// How often the event loop wakes to advance notice expiry.
const TICK_RATE: Duration = Duration::from_millis(200);

/// Run the client until the user quits.
///
/// Takes over the terminal (raw mode, alternate screen) and restores it
/// on exit.
pub async fn run(api: ApiClient) -> anyhow::Result<()> {
    enable_raw_mode().context("could not enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("could not enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("could not create terminal")?;

    let mut app = App::new(api);
    app.refresh().await;

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode().context("could not disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("could not leave alternate screen")?;
    terminal.show_cursor().context("could not restore cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("could not draw frame")?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).context("could not poll for input")? {
            if let Event::Key(key) = event::read().context("could not read input")? {
                app.handle_key(key).await;
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }

        if app.quit {
            return Ok(());
        }
    }
}
