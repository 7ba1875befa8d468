//! The UI adapter layer: IPC dispatch in, user events out.
//!
//! Everything here is glue; the decisions live in `core`. The handlers are
//! generic over [`proxy::EventProxy`] and [`file_dialog::DialogService`] so
//! the whole layer is exercised headlessly by the integration tests.

pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use std::sync::{Arc, Mutex};

use events::{IpcMessage, UserEvent};
use file_dialog::DialogService;
use proxy::EventProxy;
use state::AppState;

/// Parses an IPC message from the WebView and routes it to its handler.
pub fn handle_ipc_message<P: EventProxy>(
    message: String,
    dialog: Arc<dyn DialogService>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg: IpcMessage = match serde_json::from_str(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed IPC message {:?}: {}", message, e);
            return;
        }
    };
    tracing::debug!("IPC command: {}", msg.command);

    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "selectDirectory" => commands::select_directory(dialog.as_ref(), proxy, state),
        "resetDirectory" => commands::reset_directory(proxy, state),
        "updateFilter" => commands::update_filter(msg.payload, proxy, state),
        "excludeFiles" => commands::exclude_files(msg.payload, proxy, state),
        "includeFiles" => commands::include_files(msg.payload, proxy, state),
        "addIgnorePattern" => commands::add_ignore_pattern(msg.payload, proxy, state),
        "removeIgnorePatterns" => commands::remove_ignore_patterns(msg.payload, proxy, state),
        "setOutputName" => commands::set_output_name(msg.payload, proxy, state),
        "setStyle" => commands::set_style(msg.payload, proxy, state),
        "setFlag" => commands::set_flag(msg.payload, proxy, state),
        "setHeaderText" => commands::set_header_text(msg.payload, proxy, state),
        "pickInstructionFile" => commands::pick_instruction_file(dialog.as_ref(), proxy, state),
        "clearInstructionFile" => commands::clear_instruction_file(proxy, state),
        "runTool" => commands::run_tool(proxy, state),
        other => tracing::warn!("Unknown IPC command: {}", other),
    }
}

/// Forwards a backend event to the matching `window.*` frontend function.
pub fn handle_user_event(event: UserEvent, webview: &wry::WebView) {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => serde_json::to_string(&ui_state)
            .map(|json| format!("window.render({json});")),
        UserEvent::Log(line) => {
            serde_json::to_string(&line).map(|json| format!("window.appendLog({json});"))
        }
        UserEvent::RunFinished {
            success,
            exit_code,
            output,
        } => serde_json::to_string(&serde_json::json!({
            "success": success,
            "exitCode": exit_code,
            "output": output,
        }))
        .map(|json| format!("window.runFinished({json});")),
        UserEvent::ShowError(message) => {
            serde_json::to_string(&message).map(|json| format!("window.showError({json});"))
        }
    };

    match script {
        Ok(script) => {
            if let Err(e) = webview.evaluate_script(&script) {
                tracing::warn!("Failed to evaluate script in WebView: {}", e);
            }
        }
        Err(e) => tracing::warn!("Failed to serialize event for the WebView: {}", e),
    }
}
