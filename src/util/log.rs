use std::path::PathBuf;

use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "songfeed", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_FOLDER.clone() {
        return Ok(dir);
    }
    project_directory()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or_else(|| eyre!("Unable to determine the data directory"))
}

/// Logs go to `<data dir>/songfeed.log`; stdout belongs to the front-end.
///
/// The filter is read from `SONGFEED_LOGLEVEL`, then `RUST_LOG`, and
/// defaults to `info`.
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir()?;
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(directory.join(LOG_FILE.clone()))?;

    let env_var = if std::env::var(LOG_ENV.clone()).is_ok() {
        LOG_ENV.clone()
    } else {
        EnvFilter::DEFAULT_ENV.to_string()
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(env_var)
        .from_env_lossy();

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    tracing::info!(dir = %directory.display(), "logging_initialized");
    Ok(())
}
