//! Loading and saving the persisted state file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::AppConfig;

const APP_DIR: &str = "RepomixGUI";
const STATE_FILE: &str = "state.json";

/// Owns the location of the state file.
///
/// Constructed once at startup and passed into the app state, so tests can
/// point it at a temp directory instead of the user's cache. Load failures of
/// any kind degrade to defaults; they are logged and never abort the program.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// The per-user location: the platform cache directory (falling back to
    /// `~/.cache`), sub-path `RepomixGUI/state.json`.
    pub fn from_default_location() -> Self {
        let base = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .unwrap_or_else(|| PathBuf::from(".cache"));
        Self {
            path: base.join(APP_DIR).join(STATE_FILE),
        }
    }

    /// A store at an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted state. A missing file is a silent no-op; an
    /// unreadable or corrupt file is logged and replaced by defaults.
    pub fn load(&self) -> AppConfig {
        if !self.path.is_file() {
            tracing::info!("No state file at {:?}, starting with defaults", self.path);
            return AppConfig::default();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read state file {:?}: {}", self.path, e);
                return AppConfig::default();
            }
        };
        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded state from {:?}", self.path);
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Falling back to defaults.",
                    self.path,
                    e
                );
                AppConfig::default()
            }
        }
    }

    /// Writes the full snapshot, creating parent directories as needed.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {parent:?}"))?;
        }
        let json = serde_json::to_string_pretty(config).context("serializing state")?;
        fs::write(&self.path, json).with_context(|| format!("writing state to {:?}", self.path))?;
        tracing::debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}
