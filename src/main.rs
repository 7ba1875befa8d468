use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use wry::WebViewBuilder;

use repomix_gui::app;
use repomix_gui::app::file_dialog::NativeDialogService;
use repomix_gui::app::state::AppState;
use repomix_gui::config::StateStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let event_loop = EventLoopBuilder::<app::events::UserEvent>::with_user_event().build();

    let window = WindowBuilder::new()
        .with_title("Repomix GUI")
        .with_inner_size(tao::dpi::LogicalSize::new(1050, 720))
        .with_min_inner_size(tao::dpi::LogicalSize::new(800, 560))
        .build(&event_loop)
        .expect("Failed to build Window");
    let window = Arc::new(window);

    let mut app_state = AppState::new(StateStore::from_default_location());

    // A positional CLI argument naming an existing directory wins over the
    // cached last_dir; an invalid argument is logged and ignored.
    if let Some(arg) = std::env::args().nth(1) {
        let path = PathBuf::from(arg);
        if path.is_dir() {
            match app_state.selection.rescan(&path) {
                Ok(()) => {
                    tracing::info!("Starting from CLI argument {:?}", path);
                    app_state.root = Some(path);
                    app_state.persist();
                }
                Err(e) => tracing::warn!("Could not scan CLI directory: {}", e),
            }
        } else {
            tracing::warn!("Ignoring CLI argument {:?}: not a directory", path);
        }
    }

    let proxy = event_loop.create_proxy();
    let state = Arc::new(Mutex::new(app_state));
    let dialog_service: Arc<dyn app::file_dialog::DialogService> = Arc::new(NativeDialogService);

    let ipc_handler_state = state.clone();
    let ipc_handler_proxy = proxy.clone();
    let ipc_handler_dialog = dialog_service.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(
            message,
            ipc_handler_dialog.clone(),
            ipc_handler_proxy.clone(),
            ipc_handler_state.clone(),
        );
    };

    let webview = WebViewBuilder::new(&*window)
        .with_html(include_str!("ui/index.html"))
        .with_ipc_handler(ipc_handler)
        .with_devtools(cfg!(debug_assertions))
        .build()
        .expect("Failed to build WebView");

    let state_for_events = state.clone();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("Close requested. Saving final state...");
                let mut state_guard = state_for_events.lock().unwrap();
                state_guard.persist();
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    });
}
