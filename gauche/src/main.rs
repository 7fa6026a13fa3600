//! Gauche ou Droite ? terminal quiz.
//!
//! Shows one political idea at a time and asks whether it leans left or
//! right. Ideas already shown on this machine are skipped.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for scripting:
//!
//! ```bash
//! cargo run -p gauche -- --headless --ephemeral
//! ```

mod app;
mod events;
mod headless;
mod logging;
mod ui;
mod worker;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gauche_core::{GameBoard, GameConfig, IdeaRepository, KeyValueStorage, MemoryStorage};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, stdout, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;
use worker::{spawn_worker, WorkerRequest};

/// Command line options
#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    headless: bool,
    ephemeral: bool,
    data_dir: Option<PathBuf>,
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    let mut config = GameConfig::from_env();
    if let Some(dir) = &options.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(collection) = &options.collection {
        config = config.with_collection(collection);
    }

    match config.log_dir() {
        Ok(dir) => {
            if let Err(e) = logging::init(&dir, options.headless) {
                eprintln!("Warning: {e}");
            }
        }
        Err(e) => eprintln!("Warning: logging disabled: {e}"),
    }

    let source = match config.build_source() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Please set it in .env file or with: export FIREBASE_PROJECT_ID=your_project");
            std::process::exit(1);
        }
    };

    let storage: Arc<dyn KeyValueStorage> = if options.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(config.build_storage()?)
    };

    let repository = IdeaRepository::new(source, storage);

    if options.headless {
        return headless::run_headless(GameBoard::new(repository))
            .await
            .map_err(|e| e.into());
    }

    let (request_tx, response_rx) = spawn_worker(repository);
    let mut app = App::new(request_tx.clone(), response_rx);
    app.load();

    // Setup terminal
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = request_tx.send(WorkerRequest::Shutdown).await;
            return Err(e.into());
        }
    };

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let _ = request_tx.send(WorkerRequest::Shutdown).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Enter raw mode and the alternate screen, undoing both if setup fails midway
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    restore_on_error(
        || {
            let mut stdout = stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        restore_terminal,
    )
}

fn restore_terminal() {
    let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = disable_raw_mode();
}

/// Run `setup`, calling `restore` when it fails
fn restore_on_error<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_frame_area(Rect::new(0, 0, size.width, size.height));

        // Render
        terminal.draw(|f| render(f, &app))?;

        // Pick up finished loads
        app.poll_worker();

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            // Tick animations
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Parse arguments (without the program name)
fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--headless" => options.headless = true,
            "--ephemeral" => options.ephemeral = true,
            "--data-dir" => {
                let value = iter.next().ok_or("--data-dir needs a path")?;
                options.data_dir = Some(PathBuf::from(value));
            }
            "--collection" => {
                let value = iter.next().ok_or("--collection needs a name")?;
                options.collection = Some(value.clone());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(options)
}

fn print_help() {
    println!("Gauche ou Droite ? - classify political ideas as left or right");
    println!();
    println!("USAGE:");
    println!("  gauche [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help              Show this help message");
    println!("  --headless              Run in headless mode (text-only, no TUI)");
    println!("  --ephemeral             Keep the seen history in memory only");
    println!("  --data-dir <PATH>       Where to store the seen history and logs");
    println!("  --collection <NAME>     Firestore collection to read (default: ideas)");
    println!();
    println!("ENVIRONMENT:");
    println!("  FIREBASE_PROJECT_ID     Firebase project (required without emulator)");
    println!("  FIREBASE_API_KEY        Web API key");
    println!("  FIRESTORE_DATABASE      Database name (default: (default))");
    println!("  FIRESTORE_EMULATOR_HOST host:port of a local Firestore emulator");
    println!("  GAUCHE_COLLECTION       Same as --collection");
    println!("  GAUCHE_DATA_DIR         Same as --data-dir");
    println!("  RUST_LOG                Log filter (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("  gauche                              # Interactive TUI mode");
    println!("  gauche --headless                   # Line-oriented mode");
    println!("  gauche --ephemeral --collection idees");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), CliOptions::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let options = parse_args(&args(&[
            "--headless",
            "--ephemeral",
            "--data-dir",
            "/tmp/g",
            "--collection",
            "idees",
        ]))
        .unwrap();

        assert!(options.headless);
        assert!(options.ephemeral);
        assert_eq!(options.data_dir, Some(PathBuf::from("/tmp/g")));
        assert_eq!(options.collection.as_deref(), Some("idees"));
    }

    #[test]
    fn test_failed_setup_is_restored() {
        let mut restored = false;
        let result: io::Result<()> = restore_on_error(
            || Err(io::Error::new(io::ErrorKind::Other, "no tty")),
            || restored = true,
        );
        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn test_successful_setup_is_kept() {
        let mut restored = false;
        let result = restore_on_error(|| Ok(7), || restored = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!restored);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--data-dir"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }
}
