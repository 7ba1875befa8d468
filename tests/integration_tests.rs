//! Integration tests for the Repomix GUI backend.
//!
//! The command handlers are exercised directly, with a channel-backed test
//! proxy standing in for the event loop and a temp-dir `StateStore` standing
//! in for the user's cache directory.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

use repomix_gui::app::{self, commands, events::UserEvent, proxy::EventProxy, state::AppState};
use repomix_gui::config::StateStore;

/// Contains the test infrastructure.
mod helpers {
    use super::*;
    use std::fs;

    use repomix_gui::app::file_dialog::DialogService;
    use repomix_gui::app::view_model::UiState;

    /// A test double for the `EventLoopProxy` using a tokio MPSC channel.
    #[derive(Clone)]
    pub struct TestEventProxy {
        pub sender: mpsc::UnboundedSender<UserEvent>,
    }

    impl EventProxy for TestEventProxy {
        fn send_event(&self, event: UserEvent) {
            if let Err(e) = self.sender.send(event) {
                panic!("Test receiver dropped: {}", e);
            }
        }
    }

    /// A dialog stub that answers every pick with a fixed path.
    pub struct ScriptedDialog {
        pub directory: Option<PathBuf>,
        pub file: Option<PathBuf>,
    }

    impl DialogService for ScriptedDialog {
        fn pick_directory(&self) -> Option<PathBuf> {
            self.directory.clone()
        }

        fn pick_instruction_file(&self) -> Option<PathBuf> {
            self.file.clone()
        }
    }

    /// `TestHarness` sets up a complete, isolated environment for each test case.
    pub struct TestHarness {
        pub state: Arc<Mutex<AppState>>,
        pub proxy: TestEventProxy,
        pub event_rx: mpsc::UnboundedReceiver<UserEvent>,
        pub project: PathBuf,
        pub state_file: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        /// Creates a harness with an empty project directory and a state
        /// file isolated under the same temp dir.
        pub fn new() -> Self {
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let project = temp_dir.path().join("project");
            fs::create_dir(&project).expect("Failed to create project dir");
            let state_file = temp_dir.path().join("state.json");
            let (event_tx, event_rx) = mpsc::unbounded_channel();

            let state = AppState::new(StateStore::at(state_file.clone()));

            Self {
                state: Arc::new(Mutex::new(state)),
                proxy: TestEventProxy { sender: event_tx },
                event_rx,
                project,
                state_file,
                _temp_dir: temp_dir,
            }
        }

        /// Creates a file inside the project directory.
        pub fn create_file(&self, path: &str, content: &str) {
            let file_path = self.project.join(path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            fs::write(file_path, content).expect("Failed to write file");
        }

        /// Adopts the project directory as the root via the command handler.
        pub fn adopt_project(&self) {
            commands::set_root(
                self.project.clone(),
                self.proxy.clone(),
                Arc::clone(&self.state),
            );
        }

        /// Drains queued events and returns the most recent state snapshot.
        /// The handlers run synchronously, so everything they sent is
        /// already in the channel.
        pub fn last_ui_state(&mut self) -> UiState {
            let mut last = None;
            while let Ok(event) = self.event_rx.try_recv() {
                if let UserEvent::StateUpdate(ui_state) = event {
                    last = Some(*ui_state);
                }
            }
            last.expect("No StateUpdate event was sent")
        }

        /// Drains queued events and returns every log line, timestamps
        /// stripped.
        pub fn drain_logs(&mut self) -> Vec<String> {
            let mut logs = Vec::new();
            while let Ok(event) = self.event_rx.try_recv() {
                if let UserEvent::Log(line) = event {
                    let message = line.split_once("] ").map(|(_, m)| m).unwrap_or(&line);
                    logs.push(message.to_string());
                }
            }
            logs
        }

        /// Drains queued events and returns the first error notice, if any.
        pub fn take_error(&mut self) -> Option<String> {
            while let Ok(event) = self.event_rx.try_recv() {
                if let UserEvent::ShowError(message) = event {
                    return Some(message);
                }
            }
            None
        }
    }
}

use helpers::{ScriptedDialog, TestHarness};

#[tokio::test]
async fn adopting_a_directory_scans_filters_and_builds_the_baseline_command() {
    let mut harness = TestHarness::new();
    harness.create_file("a.py", "print('hi')");
    harness.create_file("b.png", "not really a png");
    harness.create_file(".git/config", "[core]");

    harness.adopt_project();

    let ui = harness.last_ui_state();
    assert!(ui.has_root);
    // b.png is skipped by suffix; .git/config is discovered but hidden by
    // the auto-added `.git` pattern.
    assert_eq!(ui.total_files, 2);
    assert_eq!(ui.visible_files, vec!["a.py"]);
    assert_eq!(ui.ignore_patterns, vec![".git"]);
    assert!(ui.excluded_files.is_empty());

    let guard = harness.state.lock().unwrap();
    assert_eq!(
        guard.build_args(),
        vec![
            "repomix",
            "-o",
            "repomix_output.md",
            "--style",
            "markdown",
            "--remove-empty-lines",
            "--ignore",
            ".git",
        ]
    );
    assert_eq!(
        guard.command_preview(),
        "repomix -o repomix_output.md --style markdown --remove-empty-lines --ignore .git"
    );
}

#[tokio::test]
async fn filter_narrows_the_visible_list_case_insensitively() {
    let mut harness = TestHarness::new();
    harness.create_file("src/main.rs", "fn main() {}");
    harness.create_file("src/lib.rs", "");
    harness.create_file("README.md", "# readme");
    harness.adopt_project();

    commands::update_filter(json!(".RS"), harness.proxy.clone(), Arc::clone(&harness.state));
    let ui = harness.last_ui_state();
    assert_eq!(ui.visible_files, vec!["src/lib.rs", "src/main.rs"]);
    assert_eq!(ui.total_files, 3);

    commands::update_filter(json!(""), harness.proxy.clone(), Arc::clone(&harness.state));
    let ui = harness.last_ui_state();
    assert_eq!(ui.visible_files, vec!["README.md", "src/lib.rs", "src/main.rs"]);
}

#[tokio::test]
async fn excluding_and_reincluding_files_round_trips() {
    let mut harness = TestHarness::new();
    harness.create_file("keep.py", "");
    harness.create_file("drop.py", "");
    harness.adopt_project();

    commands::exclude_files(
        json!(["drop.py"]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    let ui = harness.last_ui_state();
    assert_eq!(ui.visible_files, vec!["keep.py"]);
    assert_eq!(ui.excluded_files, vec!["drop.py"]);
    // Exact exclusions travel on --ignore alongside the glob patterns.
    assert!(ui.command_preview.contains("--ignore drop.py"));

    commands::include_files(
        json!(["drop.py"]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    let ui = harness.last_ui_state();
    assert_eq!(ui.visible_files, vec!["drop.py", "keep.py"]);
    assert!(ui.excluded_files.is_empty());
}

#[tokio::test]
async fn removing_a_covering_pattern_releases_exact_exclusions() {
    let mut harness = TestHarness::new();
    harness.create_file("app.py", "");
    harness.create_file("debug.log", "");
    harness.adopt_project();

    commands::exclude_files(
        json!(["debug.log"]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::add_ignore_pattern(
        json!("*.log"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );

    // While the glob covers it, the exact exclusion is not shown separately.
    let ui = harness.last_ui_state();
    assert_eq!(ui.visible_files, vec!["app.py"]);
    assert!(ui.excluded_files.is_empty());
    assert_eq!(ui.ignore_patterns, vec!["*.log"]);

    commands::remove_ignore_patterns(
        json!([0]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    let ui = harness.last_ui_state();
    assert!(ui.ignore_patterns.is_empty());
    // Dropping the only pattern that covered it returns the file to view.
    assert_eq!(ui.visible_files, vec!["app.py", "debug.log"]);
    assert!(ui.excluded_files.is_empty());
}

#[tokio::test]
async fn removed_default_patterns_stay_removed_across_rescans() {
    let mut harness = TestHarness::new();
    harness.create_file("node_modules/dep/index.js", "");
    harness.create_file("main.js", "");
    harness.adopt_project();

    let ui = harness.last_ui_state();
    assert_eq!(ui.ignore_patterns, vec!["node_modules"]);
    assert_eq!(ui.visible_files, vec!["main.js"]);

    commands::remove_ignore_patterns(
        json!([0]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::reset_directory(harness.proxy.clone(), Arc::clone(&harness.state));

    let ui = harness.last_ui_state();
    assert!(ui.ignore_patterns.is_empty());
    assert_eq!(ui.visible_files, vec!["main.js", "node_modules/dep/index.js"]);
}

#[tokio::test]
async fn style_change_keeps_the_output_stem_and_swaps_the_extension() {
    let mut harness = TestHarness::new();

    commands::set_style(json!("xml"), harness.proxy.clone(), Arc::clone(&harness.state));
    let ui = harness.last_ui_state();
    assert_eq!(ui.style, "xml");
    assert_eq!(ui.output_name, "repomix_output.xml");

    commands::set_output_name(
        json!("bundle.xml"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::set_style(json!("plain"), harness.proxy.clone(), Arc::clone(&harness.state));
    let ui = harness.last_ui_state();
    assert_eq!(ui.output_name, "bundle.txt");
    assert!(ui.command_preview.contains("--style plain"));
}

#[tokio::test]
async fn flag_toggles_reach_the_synthesized_command() {
    let mut harness = TestHarness::new();

    commands::set_flag(
        json!({"name": "compress", "value": true}),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::set_flag(
        json!({"name": "remove_empty", "value": false}),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    // Unknown keys are ignored, not stored.
    commands::set_flag(
        json!({"name": "does_not_exist", "value": true}),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );

    let ui = harness.last_ui_state();
    assert!(ui.command_preview.contains("--compress"));
    assert!(!ui.command_preview.contains("--remove-empty-lines"));
}

#[tokio::test]
async fn header_and_instruction_file_are_quoted_into_the_preview() {
    let mut harness = TestHarness::new();
    let dialog = ScriptedDialog {
        directory: None,
        file: Some(PathBuf::from("/tmp/instructions.md")),
    };

    commands::set_header_text(
        json!("my project"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::pick_instruction_file(&dialog, harness.proxy.clone(), Arc::clone(&harness.state));

    let ui = harness.last_ui_state();
    assert!(ui
        .command_preview
        .contains("--header-text \"my project\""));
    assert!(ui.command_preview.contains("--instruction-file-path"));

    commands::clear_instruction_file(harness.proxy.clone(), Arc::clone(&harness.state));
    let ui = harness.last_ui_state();
    assert!(!ui.command_preview.contains("--instruction-file-path"));
}

#[tokio::test]
async fn select_directory_uses_the_dialog_result() {
    let mut harness = TestHarness::new();
    harness.create_file("main.py", "");
    let dialog = ScriptedDialog {
        directory: Some(harness.project.clone()),
        file: None,
    };

    app::commands::select_directory(&dialog, harness.proxy.clone(), Arc::clone(&harness.state));

    let ui = harness.last_ui_state();
    assert!(ui.has_root);
    assert_eq!(ui.visible_files, vec!["main.py"]);
    let logs = harness.drain_logs();
    assert!(logs.iter().any(|l| l.starts_with("Selected directory:")));
    assert!(logs.iter().any(|l| l == "Ready: found files: 1"));
}

#[tokio::test]
async fn run_without_a_root_is_refused_with_an_error() {
    let mut harness = TestHarness::new();

    commands::run_tool(harness.proxy.clone(), Arc::clone(&harness.state));

    assert_eq!(
        harness.take_error().as_deref(),
        Some("Select a project directory first")
    );
    assert!(!harness.state.lock().unwrap().is_running);
}

#[tokio::test]
async fn concurrent_run_requests_are_quietly_refused() {
    let mut harness = TestHarness::new();
    harness.adopt_project();
    harness.state.lock().unwrap().is_running = true;
    harness.last_ui_state();
    harness.drain_logs();

    commands::run_tool(harness.proxy.clone(), Arc::clone(&harness.state));

    let logs = harness.drain_logs();
    assert_eq!(logs, vec!["A run is already in progress."]);
    assert!(harness.take_error().is_none());
}

#[tokio::test]
async fn state_survives_a_restart_including_exact_exclusions() {
    let mut harness = TestHarness::new();
    harness.create_file("a.py", "");
    harness.create_file("b.py", "");
    harness.adopt_project();

    commands::exclude_files(
        json!(["b.py"]),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::add_ignore_pattern(
        json!("*.tmp"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );
    commands::set_header_text(
        json!("restored header"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );

    // Boot a second instance from the same state file.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let proxy = helpers::TestEventProxy { sender: event_tx };
    let restarted = Arc::new(Mutex::new(AppState::new(StateStore::at(
        harness.state_file.clone(),
    ))));
    commands::initialize(proxy, Arc::clone(&restarted));

    let mut ui = None;
    while let Ok(event) = event_rx.try_recv() {
        if let UserEvent::StateUpdate(state) = event {
            ui = Some(*state);
        }
    }
    let ui = ui.expect("initialize did not send a state update");
    assert!(ui.has_root);
    assert_eq!(ui.header_text, "restored header");
    assert_eq!(ui.ignore_patterns, vec!["*.tmp"]);
    // The startup refresh keeps persisted exact exclusions.
    assert_eq!(ui.visible_files, vec!["a.py"]);
    assert_eq!(ui.excluded_files, vec!["b.py"]);
}

#[tokio::test]
async fn adopting_a_missing_directory_reports_an_error() {
    let mut harness = TestHarness::new();

    commands::set_root(
        harness.project.join("does-not-exist"),
        harness.proxy.clone(),
        Arc::clone(&harness.state),
    );

    let mut ui = None;
    let mut error = None;
    while let Ok(event) = harness.event_rx.try_recv() {
        match event {
            UserEvent::StateUpdate(state) => ui = Some(*state),
            UserEvent::ShowError(message) => error = Some(message),
            _ => {}
        }
    }
    assert!(!ui.expect("expected a state update").has_root);
    let message = error.expect("expected an error notice");
    assert!(message.contains("not a valid directory"));
}
