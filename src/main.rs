//! My Mission - actor-based terminal list manager
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Backend Layer (Tokio) - async item persistence

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use mission_tui::backend::{build_backend, BackendActor};
use mission_tui::config::BackendConfig;
use mission_tui::constants::LOG_FILE_NAME;
use mission_tui::messages::ui_events::key_to_ui_event;
use mission_tui::messages::{BackendCommand, BackendResponse, RenderState, UiEvent};
use mission_tui::storage::Storage;
use mission_tui::ui::draw_ui;
use mission_tui::{AppActor, AppState};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let storage = Storage::new();
    std::fs::create_dir_all(storage.data_dir())?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(storage.data_dir(), LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = BackendConfig::load(storage.data_dir());
    let backend = build_backend(&config, &storage);
    let state = AppState::new(storage, backend.status());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel::<BackendResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn backend actor
    let backend_actor = BackendActor::new(backend, resp_tx);
    let backend_handle = tokio::spawn(backend_actor.run(cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, cmd_tx, render_tx);
    let app_handle = tokio::spawn(app_actor.run(ui_rx, resp_rx));

    tracing::info!("Started");

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let pending item writes land before the runtime goes away
    if let Err(e) = app_handle.await {
        tracing::error!(error = %e, "App actor failed");
    }
    if let Err(e) = backend_handle.await {
        tracing::error!(error = %e, "Backend actor failed");
    }

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}
