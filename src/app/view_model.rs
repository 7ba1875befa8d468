//! Transforms the `AppState` into the serializable `UiState` view model.

use serde::Serialize;

use super::state::AppState;

/// A serializable snapshot of everything the frontend renders.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub root_path: String,
    pub has_root: bool,
    pub output_name: String,
    pub style: String,
    pub header_text: String,
    pub instruction_file_path: String,
    pub flags: Vec<FlagView>,
    pub filter_query: String,
    pub visible_files: Vec<String>,
    pub excluded_files: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub total_files: usize,
    pub command_preview: String,
    pub is_running: bool,
}

/// One checkbox row: persisted key, command-line token, current value.
#[derive(Serialize, Clone, Debug)]
pub struct FlagView {
    pub key: String,
    pub token: String,
    pub value: bool,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let flags = state
        .config
        .flags
        .entries()
        .iter()
        .map(|(key, token, value)| FlagView {
            key: (*key).to_string(),
            token: (*token).to_string(),
            value: *value,
        })
        .collect();

    UiState {
        root_path: state
            .root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        has_root: state.root.is_some(),
        output_name: state.config.output_name.clone(),
        style: state.config.style.as_str().to_string(),
        header_text: state.config.header_text.clone(),
        instruction_file_path: state.config.instruction_file_path.clone(),
        flags,
        filter_query: state.filter_query.clone(),
        visible_files: state.selection.visible(&state.filter_query),
        excluded_files: state.selection.displayed_exclusions(),
        ignore_patterns: state.selection.ignore_patterns().to_vec(),
        total_files: state.selection.files().len(),
        command_preview: state.command_preview(),
        is_running: state.is_running,
    }
}
