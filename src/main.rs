use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mazerunner::{
    app::App,
    config::{Args, Config},
};

/// Log to a file, since the terminal belongs to the game. The returned guard
/// must stay alive until exit so buffered lines get flushed.
fn init_tracing(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .context("log file path has no file name")?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let config = Config::from(Args::parse());
    let _guard = init_tracing(&config.log_file)?;
    tracing::info!("[main] Starting with {:?}", config);

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).and_then(|mut app| app.run());
    App::restore_terminal(&mut stdout)?;

    if let Err(e) = &result {
        tracing::error!("[main] Exited with error: {:#}", e);
    }
    result
}
