//! The seam between the command handlers and the event loop.

use tao::event_loop::EventLoopProxy;

use super::events::UserEvent;

/// Fire-and-forget delivery of [`UserEvent`]s toward the WebView.
///
/// The handlers and the run task are generic over this trait, so the
/// integration tests can observe every event through a plain channel
/// instead of a real window.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // Fails only when the event loop is already gone, e.g. a run
        // finishing after the window closed. Nothing to do but log it.
        if let Err(e) = self.send_event(event) {
            tracing::warn!("Event loop is gone, dropping event: {}", e);
        }
    }
}
