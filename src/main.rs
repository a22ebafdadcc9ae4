mod app;
mod ui;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::Instant;

use app::{App, Route};
use portfolio_tui::config;
use portfolio_tui::i18n::{Language, Translator};
use portfolio_tui::persistence::{default_preferences_path, JsonFileStorage};
use portfolio_tui::{PreferenceStore, StyleRoot};

#[derive(Parser, Debug)]
#[command(name = "portfolio-tui")]
#[command(about = "A terminal portfolio with a rotating color theme")]
#[command(version)]
struct Args {
    /// Preference file to read and write (overrides config and env)
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Milliseconds between automatic theme changes
    #[arg(long)]
    rotation_interval_ms: Option<u64>,

    /// Interface language code (en, es, fr)
    #[arg(long, env = "PORTFOLIO_TUI_LANGUAGE")]
    language: Option<String>,

    /// Page to open on, e.g. /projects or /settings
    #[arg(long, default_value = "/")]
    route: String,

    /// Print the current theme's style variables as a CSS :root block and exit
    #[arg(long)]
    print_css: bool,
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(proj_dirs) = ProjectDirs::from("com", "portfolio", "portfolio-tui") {
        let data_dir = proj_dirs.data_dir();
        let file = fs::create_dir_all(data_dir).and_then(|_| {
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(data_dir.join("portfolio-tui.log"))
        });
        if let Ok(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = builder.try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging();

    let mut config = config::load();
    if let Some(ms) = args.rotation_interval_ms {
        config.theme.rotation_interval_ms = Some(ms);
    }
    if let Some(path) = args.preferences {
        config.storage.path = Some(path);
    }
    let preferences_path = match config.storage.path.clone() {
        Some(path) => path,
        None => default_preferences_path()?,
    };
    info!(
        "Starting portfolio-tui (config: {}, preferences: {})",
        config::config_path_display(),
        preferences_path.display()
    );

    let style = StyleRoot::new();
    let store = PreferenceStore::initialize(
        Box::new(JsonFileStorage::open(&preferences_path)),
        style.clone(),
        config.rotation_interval(),
    )
    .context("failed to initialize theme preferences")?;

    if args.print_css {
        print!("{}", style.to_css());
        store.dispose();
        return Ok(());
    }

    let mut translator = Translator::load(Box::new(JsonFileStorage::open(&preferences_path)));
    if let Some(code) = args.language {
        translator.set_language(Language::from_code(&code)?);
    }

    let mut app = App::new(store, style, translator, config.profile.clone());
    app.navigate_path(&args.route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.store.dispose();
    if let Err(err) = res {
        error!("{:?}", err);
        eprintln!("{:?}", err)
    }

    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut theme_changes = app.store.subscribe();
    let mut needs_redraw = true;

    loop {
        // Rotation ticks arrive from the store's task; redraw when one lands.
        if theme_changes.has_changed().unwrap_or(false) {
            let _ = theme_changes.borrow_and_update();
            needs_redraw = true;
        }
        if app.on_tick(Instant::now()) {
            needs_redraw = true;
        }
        if needs_redraw {
            terminal.draw(|f| ui::render_ui(f, app))?;
            needs_redraw = false;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                CrosstermEvent::Key(key) => {
                    if key.kind == event::KeyEventKind::Release {
                        // Skip events that are not KeyEventKind::Press
                        continue;
                    }
                    needs_redraw = true;
                    if handle_key(app, key) {
                        return Ok(());
                    }
                }
                CrosstermEvent::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
    }
}

/// Returns true when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let now = Instant::now();

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.exit_help_screen();
        }
        return false;
    }

    if app.editing.is_some() {
        match key.code {
            KeyCode::Enter => app.finish_edit(now),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char('v') | KeyCode::Char('V')
                if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::SUPER) =>
            {
                app.paste_from_clipboard();
            }
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => app.show_help_screen(),
        KeyCode::Tab | KeyCode::Right => app.next_route(),
        KeyCode::BackTab | KeyCode::Left => app.prev_route(),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.navigate(Route::ALL[index]);
        }
        KeyCode::Up => match app.route {
            Route::Settings => app.move_settings_cursor(-1),
            Route::Contact => app.move_contact_cursor(-1),
            _ => {}
        },
        KeyCode::Down => match app.route {
            Route::Settings => app.move_settings_cursor(1),
            Route::Contact => app.move_contact_cursor(1),
            _ => {}
        },
        KeyCode::Enter => match app.route {
            Route::Settings => app.activate_settings_entry(now),
            Route::Contact => app.activate_contact_entry(now),
            _ => {}
        },
        _ => {}
    }
    false
}
