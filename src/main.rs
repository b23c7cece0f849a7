//! main.rs
//! Entry point for fen

use fen_tui::app::AppState;
use fen_tui::config::Config;
use fen_tui::core::terminal::{self, Exit};
use fen_tui::utils::cli::{CliAction, handle_args};
use fen_tui::utils::resolve_initial_dir;

use std::fs::File;
use std::sync::Mutex;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[fen] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let (initial_path, overrides) = match handle_args() {
        CliAction::Exit => return Ok(()),
        CliAction::RunApp(overrides) => (std::env::current_dir()?, overrides),
        CliAction::RunAppAtPath(path_arg, overrides) => {
            let target = resolve_initial_dir(&path_arg);
            if !target.is_dir() {
                eprintln!("\n[fen] Error: Path '{}' is not a directory.", path_arg);
                std::process::exit(1);
            }
            (target, overrides)
        }
    };

    init_logging();
    let config = Config::load().with_overrides(&overrides);
    let mut app = AppState::from_dir(&config, &initial_path)?;
    tracing::info!(dir = %initial_path.display(), "fen started");

    match terminal::run_terminal(&mut app)? {
        Exit::Quit => {
            app.into_engine().drain();
            Ok(())
        }
        Exit::ForceQuit => {
            tracing::warn!("exiting without waiting for file operations");
            std::process::exit(0)
        }
    }
}

/// Sends `tracing` events to the file named by `FEN_LOG`, if set.
///
/// The terminal belongs to the TUI, so without it events are dropped.
fn init_logging() {
    let Some(path) = std::env::var_os("FEN_LOG") else {
        return;
    };

    match File::create(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .try_init();
        }
        Err(e) => eprintln!("[fen] Cannot open log file {:?}: {}", path, e),
    }
}
