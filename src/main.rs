use ragchat::adapters::ReqwestTransport;
use ragchat::app::{App, AppMessage};
use ragchat::cli::{parse_args, run_cli_command, CliCommand};
use ragchat::config::ClientConfig;
use ragchat::input::{Command, KeybindingConfig};
use ragchat::logging::{init_logging, LogTarget};
use ragchat::terminal::{setup_panic_hook, TerminalManager};
use ragchat::ui::{self, TranscriptView};

use color_eyre::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::Terminal;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lines moved per PageUp/PageDown
const SCROLL_STEP: usize = 5;

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    let mut config = ClientConfig::from_env();
    if let Some(url) = command.url() {
        config = config.with_base_url(url);
    }

    let runtime = tokio::runtime::Runtime::new()?;

    if !matches!(command, CliCommand::RunTui { .. }) {
        if let Err(e) = init_logging(&LogTarget::Stderr) {
            eprintln!("Warning: logging disabled: {}", e);
        }
        if let Some(result) = runtime.block_on(run_cli_command(&command, &config)) {
            if let Err(e) = result {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            return Ok(());
        }
    }

    // The TUI owns stdout, so logs go to a file.
    if let Err(e) = init_logging(&LogTarget::for_tui(&config)) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    tracing::info!(url = %config.base_url, "Starting ragchat");

    // Install before touching the terminal so a panic restores it.
    setup_panic_hook();

    let transport = Arc::new(ReqwestTransport::new(config.clone())?);

    let mut term_manager = TerminalManager::new()?;
    let result = runtime.block_on(async {
        let mut app = App::new(transport, TranscriptView::new(), &config);
        app.spawn_health_check();
        run_app(term_manager.terminal(), &mut app).await
    });

    term_manager.restore()?;
    tracing::info!("ragchat exited");
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<TranscriptView>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let keybindings = KeybindingConfig::new();
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        tokio::select! {
            event_result = event_stream.next() => {
                match event_result {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(command) = keybindings.resolve(&key) {
                            handle_command(app, command);
                        }
                    }
                    Some(Ok(Event::Paste(text))) => app.paste(&text),
                    // Redraw happens on the next iteration
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                    None => return Ok(()),
                }
            }

            msg = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(msg) = msg {
                    app.handle_message(msg);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Commands that only move the view are handled here; the rest go to the app.
fn handle_command(app: &mut App<TranscriptView>, command: Command) {
    match command {
        Command::ToggleSources => {
            app.sink.toggle_latest_sources();
        }
        Command::ScrollUp => app.sink.scroll_up(SCROLL_STEP),
        Command::ScrollDown => app.sink.scroll_down(SCROLL_STEP),
        command => app.handle_command(command),
    }
}
