use std::path::Path;

use mazelab::{
    app::App,
    config::{LabConfig, LoggingConfig},
    error::{LabError, Result},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Send logs to a rolling file, the terminal belongs to the renderer.
/// The returned guard flushes pending lines when dropped.
fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory).map_err(|e| {
        LabError::Logging(format!("Failed to create {}: {}", config.directory, e))
    })?;
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| LabError::Logging(e.to_string()))?;
    Ok(guard)
}

fn main() -> Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let config = match args.next() {
        Some(path) => LabConfig::load(Path::new(&path))?,
        None => LabConfig::default(),
    };

    let _guard = init_logging(&config.logging)?;
    tracing::info!(
        "Starting mazelab: {}x{} {}, {} race",
        config.maze.size,
        config.maze.size,
        config.maze.generator,
        config.race.family
    );

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).run(&mut stdout);
    App::restore_terminal(&mut stdout)?;

    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}
