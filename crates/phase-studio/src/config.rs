//! Studio configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use phase_mesh::ExportSize;
use phase_mesh::limits::{MIN_EXPORT_INTERVAL, SAVE_DEBOUNCE};

/// Overrides every other state directory source.
pub const STATE_DIR_ENV: &str = "PHASE_SHIFT_STATE_DIR";

/// Overrides the default page URL.
pub const PAGE_URL_ENV: &str = "PHASE_SHIFT_PAGE_URL";

/// Directory name used by `--local-state`.
pub const LOCAL_STATE_DIR: &str = ".phase-shift";

pub const DEFAULT_PAGE_URL: &str = "http://localhost:5173/";

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Where the persisted collection lives.
    pub state_dir: PathBuf,
    /// Page URL share links are built on; its `gradients` parameter is the import source.
    pub page_url: String,
    pub save_debounce: Duration,
    pub min_export_interval: Duration,
    pub default_export_size: ExportSize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(LOCAL_STATE_DIR),
            page_url: DEFAULT_PAGE_URL.to_string(),
            save_debounce: SAVE_DEBOUNCE,
            min_export_interval: MIN_EXPORT_INTERVAL,
            default_export_size: ExportSize::default(),
        }
    }
}

impl StudioConfig {
    /// Defaults with the state directory and page URL taken from the environment.
    pub fn from_env(local_state: bool) -> Result<Self> {
        let state_dir = get_state_dir(local_state)?;
        let page_url = std::env::var(PAGE_URL_ENV).unwrap_or_else(|_| DEFAULT_PAGE_URL.to_string());
        Ok(Self { state_dir, page_url, ..Self::default() })
    }
}

/// Resolves the state directory.
///
/// Priority:
/// 1. `PHASE_SHIFT_STATE_DIR`
/// 2. `--local-state` (`./.phase-shift`)
/// 3. the platform data directory
pub fn get_state_dir(local: bool) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    resolve_state_dir(std::env::var(STATE_DIR_ENV).ok(), local, &cwd)
}

fn resolve_state_dir(env_override: Option<String>, local: bool, cwd: &Path) -> Result<PathBuf> {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    if local {
        return Ok(cwd.join(LOCAL_STATE_DIR));
    }

    let proj_dirs = ProjectDirs::from("app", "phase-shift", "phase-shift")
        .context("Could not determine project directories")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
