mod calendar;
mod catalog;
mod config;
mod models;
mod report;
mod tui;

use anyhow::{anyhow, bail, Context, Result};
use crossterm::{
    event::{Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

use calendar::{LocalClock, MonthCursor};
use catalog::Catalog;
use config::Config;
use tui::App;

#[derive(Debug, Default)]
struct Args {
    init: bool,
    help: bool,
    print: bool,
    catalog: Option<PathBuf>,
    month: Option<MonthCursor>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--init" => parsed.init = true,
            "--help" | "-h" => parsed.help = true,
            "--print" => parsed.print = true,
            "--catalog" => {
                let path = args.next().context("--catalog needs a file path")?;
                parsed.catalog = Some(PathBuf::from(path));
            }
            "--month" => {
                let month = args.next().context("--month needs a YYYY-MM value")?;
                let cursor = MonthCursor::parse(&month)
                    .with_context(|| format!("Invalid --month '{month}', expected YYYY-MM"))?;
                parsed.month = Some(cursor);
            }
            other => bail!("Unknown argument '{other}'. Try --help."),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    if args.init {
        let path = Config::generate_default()?;
        println!("Generated config file at: {}", path.display());
        println!("Point catalog_path at your own schedule, then run studio-schedule.");
        return Ok(());
    }

    if args.help {
        println!("studio-schedule — the studio's class calendar in your terminal");
        println!();
        println!("USAGE:");
        println!("  studio-schedule                  Start the TUI");
        println!("  studio-schedule --init           Generate a default config file");
        println!("  studio-schedule --print          Print the month as plain text");
        println!("  studio-schedule --month YYYY-MM  Open on a given month");
        println!("  studio-schedule --catalog PATH   Use a TOML or JSON class catalog");
        println!();
        println!("CONFIG:");
        println!("  File: ~/.config/studio-schedule/config.toml");
        println!("  Or set env var: STUDIO_CATALOG");
        println!();
        println!("KEYBINDINGS:");
        println!("  p / [ / PgUp      Previous month");
        println!("  n / ] / PgDn      Next month");
        println!("  Arrows / h j k l  Move between days");
        println!("  t / Home          Jump to today");
        println!("  q / Ctrl+C        Quit");
        return Ok(());
    }

    let config = Config::load().with_context(|| {
        "Failed to load configuration.\n\
         Run `studio-schedule --init` to generate a config file."
    })?;

    if let Err(e) = init_logging(&config) {
        eprintln!("Logging disabled: {e:#}");
    }

    let catalog = load_catalog(args.catalog.or_else(|| config.catalog_path.clone()))?;

    if args.print {
        let cursor = args.month.unwrap_or_else(|| MonthCursor::current(&LocalClock));
        let grid = calendar::render(cursor, &catalog, &LocalClock);
        print!("{}", report::render_text(&grid));
        return Ok(());
    }

    let mut app = App::new(catalog, Box::new(LocalClock), args.month);
    app.show_welcome = config.show_welcome;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load(&path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin().context("Built-in catalog is invalid")?,
    };
    info!(sessions = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Log to a file: the alternate screen owns stdout while the TUI runs.
fn init_logging(config: &Config) -> Result<()> {
    let path = config
        .log_path()
        .context("Could not determine a log file location")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (level, bad_level) = match config.log_level.parse::<tracing::Level>() {
        Ok(level) => (level, false),
        Err(_) => (tracing::Level::INFO, true),
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow!("{e}"))?;

    if bad_level {
        warn!(log_level = %config.log_level, "unknown log level, using info");
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    info!(month = %app.grid.title, "calendar opened");

    loop {
        app.tick();
        terminal.draw(|f| tui::ui::render(f, &*app))?;

        if let Some(Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        })) = tui::event::poll_event(Duration::from_millis(250))?
        {
            tui::event::handle_key(app, code, modifiers);
        }

        if !app.running {
            break;
        }
    }

    info!("calendar closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let parsed = args(&["--print", "--month", "2025-09", "--catalog", "classes.json"]).unwrap();
        assert!(parsed.print);
        assert_eq!(parsed.month, MonthCursor::new(2025, 9));
        assert_eq!(parsed.catalog, Some(PathBuf::from("classes.json")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(args(&["--month", "soon"]).is_err());
        assert!(args(&["--month"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn test_parse_rejects_month_without_full_grid() {
        use chrono::{Datelike, NaiveDate};

        let past_end = format!("{}-12", NaiveDate::MAX.year());
        assert!(args(&["--month", &past_end]).is_err());

        let last = MonthCursor::last();
        let parsed = args(&["--month", &format!("{}-{:02}", last.year(), last.month())]).unwrap();
        assert_eq!(parsed.month, Some(last));
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let err = load_catalog(Some(PathBuf::from("/nonexistent/studio/catalog.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load catalog"));
    }
}
