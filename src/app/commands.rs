//! Command handlers callable from the frontend via IPC.
//!
//! Each function corresponds to one `IpcMessage::command`. Handlers mutate
//! the `AppState`, persist it, and send `UserEvent`s back to the UI. They all
//! run synchronously on the UI-owning thread; only `run_tool` spawns work.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::events::UserEvent;
use super::file_dialog::DialogService;
use super::helpers::{send_log, with_state_and_notify};
use super::proxy::EventProxy;
use super::state::AppState;
use super::tasks;
use crate::core::{preview, OutputStyle, DEFAULT_OUTPUT_STEM};

/// Handles the initial request for state from the frontend when it loads.
///
/// If a root was restored from the cache (or the CLI), the directory is
/// re-walked now. This is the light refresh: restored exact exclusions
/// survive it.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        if let Some(root) = s.root.clone() {
            match s.selection.refresh(&root) {
                Ok(()) => tracing::info!("Restored session for {:?}", root),
                Err(e) => {
                    tracing::warn!("Could not scan restored directory: {}", e);
                    s.root = None;
                }
            }
        }
    });
    let root_note = {
        let guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        guard.root.as_ref().map(|r| r.display().to_string())
    };
    match root_note {
        Some(root) => send_log(&proxy, &format!("Restored directory: {root}")),
        None => send_log(&proxy, "Ready. Select a project directory."),
    }
}

/// Opens a directory picker and adopts the chosen root.
pub fn select_directory<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match dialog.pick_directory() {
        Some(path) => set_root(path, proxy, state),
        None => tracing::info!("User cancelled directory selection."),
    }
}

/// Adopts `path` as the project root: full rediscovery, exact exclusions
/// cleared, default ignores auto-added for entries that exist on disk.
pub fn set_root<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    let mut scan_error = None;
    with_state_and_notify(&state, &proxy, |s| match s.selection.rescan(&path) {
        Ok(()) => {
            s.root = Some(path.clone());
            s.filter_query.clear();
            s.persist();
        }
        Err(e) => scan_error = Some(e.to_string()),
    });
    match scan_error {
        Some(message) => proxy.send_event(UserEvent::ShowError(message)),
        None => {
            send_log(&proxy, &format!("Selected directory: {}", path.display()));
            log_scan_summary(&proxy, &state);
        }
    }
}

/// The Reset action: re-runs the full rescan on the current root.
pub fn reset_directory<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut had_root = false;
    with_state_and_notify(&state, &proxy, |s| {
        if let Some(root) = s.root.clone() {
            had_root = true;
            if let Err(e) = s.selection.rescan(&root) {
                tracing::warn!("Rescan failed: {}", e);
            }
            s.persist();
        }
    });
    if had_root {
        send_log(&proxy, "Scanning directory…");
        log_scan_summary(&proxy, &state);
    }
}

/// Updates the case-insensitive substring filter over the included list.
pub fn update_filter<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(query) = as_string(payload) else {
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        s.filter_query = query;
    });
}

/// Moves the given visible paths into the exact-exclusion set.
pub fn exclude_files<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(paths) = as_string_list(payload) else {
        return;
    };
    let count = paths.len();
    with_state_and_notify(&state, &proxy, |s| {
        s.selection.exclude(paths);
        s.persist();
    });
    if count > 0 {
        send_log(&proxy, &format!("Added to exclusions: {count}"));
    }
}

/// Returns the given paths from the exact-exclusion set to visibility.
pub fn include_files<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(paths) = as_string_list(payload) else {
        return;
    };
    let count = paths.len();
    with_state_and_notify(&state, &proxy, |s| {
        s.selection.include(&paths);
        s.persist();
    });
    if count > 0 {
        send_log(&proxy, &format!("Removed from exclusions: {count}"));
    }
}

/// Appends a glob ignore pattern (duplicates allowed) and re-walks the root.
pub fn add_ignore_pattern<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(pattern) = as_string(payload) else {
        return;
    };
    let mut added = false;
    with_state_and_notify(&state, &proxy, |s| {
        if s.selection.add_ignore(&pattern) {
            added = true;
            refresh_if_rooted(s);
            s.persist();
        }
    });
    if added {
        send_log(&proxy, &format!("Added glob pattern: {}", pattern.trim()));
    }
}

/// Removes patterns by list position. Removed default names are opted out of
/// auto-add; files those patterns uniquely covered become visible again.
pub fn remove_ignore_patterns<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(indices) = serde_json::from_value::<Vec<usize>>(payload) else {
        tracing::warn!("removeIgnorePatterns payload is not an index list");
        return;
    };
    let mut removed = Vec::new();
    with_state_and_notify(&state, &proxy, |s| {
        removed = s.selection.remove_ignore(&indices);
        if !removed.is_empty() {
            refresh_if_rooted(s);
            s.persist();
        }
    });
    if !removed.is_empty() {
        send_log(&proxy, &format!("Removed glob patterns: {}", removed.join(", ")));
    }
}

/// Stores the output filename passed to `-o`.
pub fn set_output_name<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(name) = as_string(payload) else {
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        s.config.output_name = name;
        s.persist();
    });
}

/// Switches the output style and keeps the output filename's extension in
/// step: the stem is preserved, falling back to the default stem.
pub fn set_style<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(style) = as_string(payload).as_deref().and_then(OutputStyle::parse) else {
        tracing::warn!("setStyle payload is not a known style");
        return;
    };
    let mut renamed = None;
    with_state_and_notify(&state, &proxy, |s| {
        s.config.style = style;
        let current = s.config.output_name.trim().to_string();
        let stem = Path::new(&current)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_STEM);
        let new_name = format!("{stem}{}", style.extension());
        if new_name != current {
            s.config.output_name = new_name.clone();
            renamed = Some(new_name);
        }
        s.persist();
    });
    if let Some(name) = renamed {
        send_log(&proxy, &format!("Style: {} → output: {}", style.as_str(), name));
    }
}

#[derive(Deserialize)]
struct FlagChange {
    name: String,
    value: bool,
}

/// Toggles one of the thirteen boolean switches by its persisted key.
pub fn set_flag<P: EventProxy>(payload: serde_json::Value, proxy: P, state: Arc<Mutex<AppState>>) {
    let Ok(change) = serde_json::from_value::<FlagChange>(payload) else {
        tracing::warn!("setFlag payload is not a {{name, value}} object");
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        if s.config.flags.set(&change.name, change.value) {
            s.persist();
        } else {
            tracing::warn!("Unknown flag key: {}", change.name);
        }
    });
}

/// Stores the `--header-text` value.
pub fn set_header_text<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(text) = as_string(payload) else {
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        s.config.header_text = text;
        s.persist();
    });
}

/// Opens a file picker for the `--instruction-file-path` value.
pub fn pick_instruction_file<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(path) = dialog.pick_instruction_file() else {
        tracing::info!("User cancelled instruction file selection.");
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        s.config.instruction_file_path = path.display().to_string();
        s.persist();
    });
}

/// Clears the `--instruction-file-path` value.
pub fn clear_instruction_file<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.config.instruction_file_path.clear();
        s.persist();
    });
}

/// Launches repomix with the synthesized argv in the root directory.
///
/// Refuses (with a blocking notice) when no root is selected; quietly
/// refuses when a run is already in flight.
pub fn run_tool<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let request = {
        let mut state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        let Some(root) = state_guard.root.clone() else {
            proxy.send_event(UserEvent::ShowError(
                "Select a project directory first".to_string(),
            ));
            return;
        };
        if state_guard.is_running {
            send_log(&proxy, "A run is already in progress.");
            return;
        }
        state_guard.is_running = true;
        let request = state_guard.run_request(&root);
        let ui_state = super::view_model::generate_ui_state(&state_guard);
        proxy.send_event(UserEvent::StateUpdate(Box::new(ui_state)));
        request
    };

    send_log(&proxy, &format!(">>> CWD: {}", request.cwd.display()));
    let mut argv = vec![request.program.clone()];
    argv.extend(request.args.iter().cloned());
    send_log(&proxy, &format!(">>> CMD: {}", preview(&argv)));
    send_log(&proxy, "Starting repomix…");

    tasks::start_run(request, proxy, state);
}

fn refresh_if_rooted(s: &mut AppState) {
    if let Some(root) = s.root.clone() {
        if let Err(e) = s.selection.refresh(&root) {
            tracing::warn!("Refresh failed: {}", e);
        }
    }
}

fn log_scan_summary<P: EventProxy>(proxy: &P, state: &Arc<Mutex<AppState>>) {
    let (total, patterns) = {
        let guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        (
            guard.selection.files().len(),
            guard.selection.ignore_patterns().join(", "),
        )
    };
    send_log(proxy, &format!("Ready: found files: {total}"));
    let patterns = if patterns.is_empty() { "—".to_string() } else { patterns };
    send_log(proxy, &format!("Current ignore patterns: {patterns}"));
}

fn as_string(payload: serde_json::Value) -> Option<String> {
    match serde_json::from_value::<String>(payload) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!("Expected a string payload: {}", e);
            None
        }
    }
}

fn as_string_list(payload: serde_json::Value) -> Option<Vec<String>> {
    match serde_json::from_value::<Vec<String>>(payload) {
        Ok(list) => Some(list),
        Err(e) => {
            tracing::warn!("Expected a string list payload: {}", e);
            None
        }
    }
}
