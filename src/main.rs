use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;
use study_assistant::ai::{ContentProvider, ModelConfig, OpenRouterProvider};
use study_assistant::app::App;
use study_assistant::config::AppConfig;
use study_assistant::history::{HistoryStore, MemoryStore, SqliteStore};
use study_assistant::logger;
use study_assistant::ui;
use study_assistant::worker::{spawn_worker, WorkerResponse};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn open_store(config: &AppConfig) -> Box<dyn HistoryStore> {
    match SqliteStore::open(&config.db_path()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            logger::log(&format!(
                "Failed to open history database, using in-memory history: {:#}",
                e
            ));
            Box::new(MemoryStore::new())
        }
    }
}

fn create_provider(config: &AppConfig) -> Option<Arc<dyn ContentProvider>> {
    let mut model_config = ModelConfig {
        model: config.model.clone(),
        ..ModelConfig::default()
    };
    if let Some(temperature) = config.temperature {
        model_config.temperature = Some(temperature);
    }
    match OpenRouterProvider::new(model_config) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            logger::log(&format!("AI disabled: {}", e));
            None
        }
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    responses: &Receiver<WorkerResponse>,
) -> Result<()> {
    loop {
        while let Ok(response) = responses.try_recv() {
            app.handle_response(response);
        }
        app.on_tick();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("Failed to create data directory {}", config.data_dir.display())
    })?;
    logger::init(&config.data_dir);
    logger::log("Starting study assistant");

    let provider = create_provider(&config);
    let ai_enabled = provider.is_some();
    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    let worker = spawn_worker(provider, response_tx, request_rx)
        .context("Failed to start background worker")?;

    let mut app = App::new(&config, open_store(&config), request_tx, ai_enabled);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the app closes the request channel so the worker can exit.
    drop(app);
    if worker.join().is_err() {
        logger::log("Worker thread panicked");
    }
    logger::log("Exiting study assistant");
    result
}
