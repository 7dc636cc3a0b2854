//! TPOS - Terminal Point of Sale
//!
//! Loads the configuration, starts the application coordinator and runs the
//! terminal register until the operator quits.

use std::io;
use std::rc::Rc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use tpos::application::{
    AppCoordinator, Container, PersistentCart, StorageManager, ThemeRegistry,
};
use tpos::domain::ThemeVariant;
use tpos::infrastructure::{init_logging, JsonFileStorage, MemoryStorage, PosConfig};
use tpos::presentation::{
    render_ui, Action, ExpressTheme, Flow, InputHandler, RestaurantTheme, ScreenRegistry, Session,
};

/// Entry point for the terminal register.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log file cannot be
/// opened, or terminal setup fails. Startup failures of the coordinator are
/// shown in the register instead.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PosConfig::from_env()?;
    init_logging(&config.log_path)?;
    info!(store = %config.store_name, "starting register");

    let mut coordinator = build_coordinator(&config);
    let mut session = Session::new(config.store_name.clone(), config.receipt_dir.clone());

    if let Err(err) = coordinator.init().await {
        session.status_message = Some(err.to_string());
    } else if let Some(variant) = config.theme {
        session.apply(&mut coordinator, Action::LoadTheme(variant)).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut coordinator, &mut session).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "register stopped");
        println!("{err:?}");
    }
    info!("register closed");

    Ok(())
}

fn build_coordinator(config: &PosConfig) -> AppCoordinator {
    let storage: Rc<dyn StorageManager> = match &config.storage_path {
        Some(path) => Rc::new(JsonFileStorage::new(path)),
        None => Rc::new(MemoryStorage::new()),
    };
    let container = Container::new();
    let themes = ThemeRegistry::new()
        .with(ThemeVariant::Restaurant, Box::new(RestaurantTheme))
        .with(ThemeVariant::Express, Box::new(ExpressTheme));

    AppCoordinator::new(
        storage,
        Box::new(PersistentCart::new()),
        Box::new(ScreenRegistry::with_builtin_screens(container.clone())),
        themes,
        container,
    )
    .with_catalog(config.catalog.clone())
}

/// Main register loop.
///
/// Draws the container, waits for a key press and hands the resulting
/// action to the session. Runs until the session reports [`Flow::Quit`].
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    coordinator: &mut AppCoordinator,
    session: &mut Session,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, coordinator, session))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                let action =
                    InputHandler::handle_key_event(coordinator, session, key.code, key.modifiers);
                if session.apply(coordinator, action).await == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}
