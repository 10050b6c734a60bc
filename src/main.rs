use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use desks::cli::Cli;
use desks::config::Config;
use desks::storage::{ensure_dir, LOG_FILE};

/// Restore the terminal before the default hook prints the panic.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        original_hook(panic_info);
    }));
}

fn init_logging(config: &Config) -> WorkerGuard {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // the terminal belongs to the UI, so logs only go to the file
    let file_appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()
        .context("Failed to load configuration")?
        .with_overrides(cli.data_dir, cli.idle_timeout)?;

    if cli.print_paths {
        println!("data:   {}", config.data_dir.display());
        println!("auth:   {}", config.auth_path().display());
        println!("desks:  {}", config.boards_path().display());
        println!("log:    {}", config.log_path().display());
        return Ok(());
    }

    ensure_dir(&config.data_dir)?;
    let guard = init_logging(&config);
    setup_panic_hook();
    info!(version = env!("CARGO_PKG_VERSION"), data_dir = %config.data_dir.display(), "starting");

    let result = desks::app::run(&config);
    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    drop(guard);
    result
}
