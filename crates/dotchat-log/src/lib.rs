// ABOUTME: Shared logging setup for all dotchat binaries
// ABOUTME: init() for one-shot CLI commands on stderr, init_file() for the TUI

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Standard logging to stderr. Default: INFO level, RUST_LOG override.
/// Used by the non-interactive subcommands (`send`, `models`).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// File-based logging for the chat TUI. Default: WARN level, RUST_LOG override.
/// Logs to ~/.config/dotchat/{app_name}/{app_name}.log so the alternate screen stays clean.
/// If setup fails, prints a warning to stderr and continues without logging.
pub fn init_file(app_name: &str) {
    if let Err(e) = init_file_inner(app_name) {
        eprintln!("Warning: failed to set up file logging: {e}");
    }
}

/// Directory the TUI log for `app_name` is written to.
pub fn log_dir(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dotchat").join(app_name))
}

fn init_file_inner(app_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = log_dir(app_name).ok_or("could not determine config directory")?;
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(format!("{app_name}.log")))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_ansi(false)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn exports_init() {
        let _ = super::init as fn();
    }

    #[test]
    fn exports_init_file() {
        let _ = super::init_file as fn(&str);
    }

    #[test]
    fn log_dir_is_namespaced_by_app() {
        if let Some(dir) = super::log_dir("chat") {
            assert!(dir.ends_with("dotchat/chat"));
        }
    }
}
