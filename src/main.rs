//! HeartGuard: heart disease risk prediction client
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartguard::adapters::sanitize::SanitizingMakeWriter;
use heartguard::tui::App;
use heartguard::Config;

fn main() -> Result<()> {
    let config = Config::from_env();

    // Logs written to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let use_file = config.log_mode.use_file(std::io::stdout().is_terminal());

    let (writer, _guard) = if use_file {
        if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Startup continues without the directory; opening the file reports it.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting HeartGuard...");
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let mut app = App::new(config)?;
    app.run()?;

    tracing::info!("HeartGuard shutdown complete.");
    Ok(())
}
