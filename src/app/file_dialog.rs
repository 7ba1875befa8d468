//! An abstraction layer for native file dialogs to enable testing.

use std::path::PathBuf;

/// Defines a common interface for file and folder selection dialogs.
/// This allows for a mock implementation during tests, avoiding the need
/// to interact with actual OS dialog windows.
pub trait DialogService: Send + Sync {
    /// Opens a dialog to select the project root directory.
    fn pick_directory(&self) -> Option<PathBuf>;

    /// Opens a dialog to select the instruction file passed to repomix.
    fn pick_instruction_file(&self) -> Option<PathBuf>;
}

/// The production implementation that uses the `rfd` crate to show native OS dialogs.
pub struct NativeDialogService;

impl DialogService for NativeDialogService {
    fn pick_directory(&self) -> Option<PathBuf> {
        rfd::FileDialog::new().pick_folder()
    }

    fn pick_instruction_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new().pick_file()
    }
}
