//! Defines the central, mutable state of the application.

use std::path::{Path, PathBuf};

use crate::config::{AppConfig, StateStore};
use crate::core::{self, CommandContext, RunRequest, SelectionModel};

/// Holds the complete, mutable state of the application.
///
/// Wrapped in an `Arc<Mutex<...>>` and touched only from the UI-owning
/// thread; the background run task hands its result back through the event
/// proxy instead of reaching in here.
pub struct AppState {
    /// Persisted options as loaded from / written to the state file.
    pub config: AppConfig,
    /// Where the state file lives.
    pub store: StateStore,
    /// The currently selected project root, if any.
    pub root: Option<PathBuf>,
    /// The include/exclude partition of discovered files.
    pub selection: SelectionModel,
    /// Case-insensitive substring filter over the included list.
    pub filter_query: String,
    /// `true` while a repomix invocation is in flight.
    pub is_running: bool,
}

impl AppState {
    /// Loads persisted state from the store and seeds the selection model
    /// from it. The root is restored only if the remembered directory still
    /// exists; actually scanning it is the caller's business.
    pub fn new(store: StateStore) -> Self {
        let config = store.load();
        let selection = SelectionModel::from_persisted(
            config.ignore_patterns.clone(),
            config.ignore_defaults_optout.clone(),
            config.excluded_files.clone(),
        );
        let root = config
            .last_dir
            .clone()
            .filter(|dir| dir.is_dir())
            .or_else(|| {
                if config.last_dir.is_some() {
                    tracing::info!("Remembered directory no longer exists, ignoring it");
                }
                None
            });
        Self {
            config,
            store,
            root,
            selection,
            filter_query: String::new(),
            is_running: false,
        }
    }

    /// Copies the selection model's lists back into the persisted snapshot
    /// and writes it. Failures are logged, never fatal.
    pub fn persist(&mut self) {
        self.config.ignore_patterns = self.selection.ignore_patterns().to_vec();
        self.config.ignore_defaults_optout =
            self.selection.defaults_optout().iter().cloned().collect();
        self.config.excluded_files = self.selection.excluded().iter().cloned().collect();
        self.config.last_dir = self.root.clone();
        if let Err(e) = self.store.save(&self.config) {
            tracing::warn!("Failed to persist state: {:#}", e);
        }
    }

    /// Borrows everything command synthesis needs.
    pub fn command_context(&self) -> CommandContext<'_> {
        CommandContext {
            output_name: &self.config.output_name,
            style: self.config.style,
            flags: &self.config.flags,
            header_text: &self.config.header_text,
            instruction_file_path: &self.config.instruction_file_path,
            ignore_patterns: self.selection.ignore_patterns(),
            excluded_files: self.selection.excluded(),
        }
    }

    pub fn build_args(&self) -> Vec<String> {
        core::build_args(&self.command_context())
    }

    pub fn command_preview(&self) -> String {
        core::preview(&self.build_args())
    }

    /// The invocation for the current state, rooted at `root`.
    pub fn run_request(&self, root: &Path) -> RunRequest {
        RunRequest::from_argv(self.build_args(), root.to_path_buf())
    }
}
