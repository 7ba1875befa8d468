pub mod settings;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{FlagSet, OutputStyle, DEFAULT_OUTPUT_NAME};

pub use settings::StateStore;

/// The complete persisted snapshot of the user's choices.
///
/// Written after every mutation, read once at startup. Every field carries a
/// serde default so a state file from an older build (or a hand-edited one
/// with missing keys) still loads; parse failures fall back to defaults at
/// the `StateStore` level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub last_dir: Option<PathBuf>,
    pub output_name: String,
    pub style: OutputStyle,
    pub header_text: String,
    pub instruction_file_path: String,
    pub flags: FlagSet,
    pub ignore_patterns: Vec<String>,
    pub ignore_defaults_optout: Vec<String>,
    pub excluded_files: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_dir: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            style: OutputStyle::default(),
            header_text: String::new(),
            instruction_file_path: String::new(),
            flags: FlagSet::default(),
            ignore_patterns: Vec::new(),
            ignore_defaults_optout: Vec::new(),
            excluded_files: Vec::new(),
        }
    }
}
