//! Global tracing subscriber.
//!
//! The terminal belongs to the UI, so diagnostics go to a log file. The
//! filter comes from `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result as AnyhowResult};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Where logs go when no `--log-file` is given
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("kode")
        .join("kode.log")
}

fn open_log_file(path: &Path) -> AnyhowResult<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Install the global subscriber writing to `log_file`.
///
/// Installing twice is not an error; the first subscriber stays in place.
pub fn init_global(log_file: &Path) -> AnyhowResult<()> {
    let file = open_log_file(log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("logging to {}", log_file.display());
    }
    Ok(())
}
