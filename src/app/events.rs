//! Event and message structures for backend/frontend communication.

use serde::Deserialize;

use super::view_model::UiState;

/// Events sent from the Rust backend to the WebView.
///
/// Each variant maps to a `window.*` function the frontend exposes.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state snapshot to re-render the UI.
    StateUpdate(Box<UiState>),
    /// A timestamped line for the activity log.
    Log(String),
    /// Outcome of a repomix run, with the captured combined output.
    RunFinished {
        success: bool,
        exit_code: Option<i32>,
        output: String,
    },
    /// A blocking error notice.
    ShowError(String),
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
