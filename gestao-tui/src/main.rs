//! Terminal dashboard for the Gestao CRM: monthly finances, the weekly bin
//! calendar, and the registered service list.

use std::{env, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gestao_core::service::GestaoService;
use gestao_provider_api::ApiRoster;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;

use crate::app::App;
use crate::input::Action;

mod app;
mod input;
mod ui;

const DEFAULT_API_URL: &str = "http://localhost:4000/api";

#[tokio::main]
async fn main() -> Result<()> {
    // HTTP + service setup
    let client = Client::builder().user_agent("gestao/0.1").build()?;

    let base_url = env::var("GESTAO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
    let token = env::var("GESTAO_API_TOKEN").ok();

    let provider = Arc::new(ApiRoster::new(client, base_url, token));
    let service = Arc::new(GestaoService::new(provider.clone(), provider));

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    // Load everything once on startup
    refresh(terminal, &mut app).await?;

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::Refresh => refresh(terminal, &mut app).await?,
            }
        }
    }

    Ok(())
}

async fn refresh(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, app))?;

    let (month, year) = App::reference_month();
    let service = app.service.clone();

    match service.monthly_snapshot(month, year).await {
        Ok(snapshot) => app.snapshot = Some(snapshot),
        Err(err) => app.error_message = Some(format!("Failed to load snapshot: {err}")),
    }

    match service.bin_calendar().await {
        Ok(events) => app.events = events,
        Err(err) => {
            app.events.clear();
            app.error_message = Some(format!("Failed to load bin calendar: {err}"));
        }
    }

    match service.services().await {
        Ok(services) => {
            app.services = services;
            app.service_index = 0;
        }
        Err(err) => {
            app.services.clear();
            app.error_message = Some(format!("Failed to load services: {err}"));
        }
    }

    app.is_loading = false;
    Ok(())
}
