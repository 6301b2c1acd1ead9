use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DB_FILE_NAME: &str = "croissant.db";

/// Database location: an explicit path wins, otherwise the platform data dir.
pub(crate) fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        return Ok(path.to_path_buf());
    }

    let proj_dirs = directories::ProjectDirs::from("com", "croissant", "Croissant")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE_NAME))
}

/// Log to stderr, filtered by `RUST_LOG` when set.
pub(crate) fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Colour only when writing to a terminal and `NO_COLOR` is unset.
pub(crate) fn use_color(disabled_by_flag: bool) -> bool {
    !disabled_by_flag && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_tty()
}
