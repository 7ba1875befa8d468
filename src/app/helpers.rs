//! Helper functions shared by the command handlers.

use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

/// Locks the `AppState`, performs a mutation, and then automatically sends a
/// `StateUpdate` event to the UI. Keeps the handlers free of boilerplate.
pub fn with_state_and_notify<F, P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    update_fn: F,
) where
    F: FnOnce(&mut AppState),
{
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");

    update_fn(&mut state_guard);

    let ui_state = generate_ui_state(&state_guard);
    proxy.send_event(UserEvent::StateUpdate(Box::new(ui_state)));
}

/// Formats a timestamped line for the in-app activity log.
pub fn log_line(message: &str) -> String {
    format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message)
}

/// Sends a timestamped message to the in-app log.
pub fn send_log<P: EventProxy>(proxy: &P, message: &str) {
    proxy.send_event(UserEvent::Log(log_line(message)));
}
