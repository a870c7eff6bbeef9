use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use cinescope::config;
use cinescope::controller::AppController;
use cinescope::logging;
use cinescope::model::{
    AppModel, ClientError, Debouncer, OmdbClient, PreferenceContext, PreferenceStore,
};
use cinescope::view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== CineScope Starting ===");

    let config = config::load_config();

    // Step 1: Preferences
    let store = PreferenceStore::open(config.preferences_path()).await;
    let prefs = PreferenceContext::load(store).await;

    // Step 2: Catalog client and flows
    let client = OmdbClient::new(&config)?;
    let app_model = AppModel::new(Arc::new(client), prefs, config.category_delay);

    let search_input = Arc::new(Debouncer::new(String::new(), config.search_debounce));
    let search_driver = app_model.search.attach(search_input.subscribe());
    app_model.categories.spawn_load();

    if !config.has_api_key() {
        app_model
            .set_error(ClientError::Configuration.to_string())
            .await;
    }

    let controller = AppController::new(app_model.clone(), search_input);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app_model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    search_driver.abort();

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("CineScope shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: AppModel,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let snapshot = model.snapshot().await;
        let should_quit = model.should_quit().await;

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &snapshot);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
