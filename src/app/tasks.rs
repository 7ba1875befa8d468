//! Background execution of the repomix subprocess.
//!
//! One short-lived task per user-initiated run. The task owns its subprocess
//! pipes exclusively and delivers the captured result back to the UI-owning
//! thread through the event proxy; it never touches the selection state.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::process::Command;

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;
use crate::core::{CoreError, RunRequest};

/// The captured result of a finished subprocess.
#[derive(Debug)]
pub struct RunOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// stdout with stderr appended, lossily decoded.
    pub output: String,
}

/// Runs the request to completion and captures its combined output.
///
/// No timeout and no cancellation: the invocation is a single best-effort
/// call that runs until the tool exits.
pub async fn execute(request: &RunRequest) -> Result<RunOutput, CoreError> {
    let result = Command::new(&request.program)
        .args(&request.args)
        .current_dir(&request.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CoreError::ToolNotFound(request.program.clone()))
        }
        Err(e) => Err(CoreError::Launch(request.program.clone(), e)),
        Ok(out) => {
            let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&out.stderr));
            Ok(RunOutput {
                exit_code: out.status.code(),
                output: text,
            })
        }
    }
}

/// Spawns the run on the tokio runtime and reports back through the proxy.
pub fn start_run<P: EventProxy>(request: RunRequest, proxy: P, state: Arc<Mutex<AppState>>) {
    tokio::spawn(async move {
        tracing::info!("Launching {} in {:?}", request.program, request.cwd);
        let result = execute(&request).await;

        {
            let mut state_guard = state
                .lock()
                .expect("Mutex was poisoned. This should not happen.");
            state_guard.is_running = false;
            let ui_state = generate_ui_state(&state_guard);
            proxy.send_event(UserEvent::StateUpdate(Box::new(ui_state)));
        }

        match result {
            Ok(run) => {
                tracing::info!("repomix finished with exit code {:?}", run.exit_code);
                proxy.send_event(UserEvent::RunFinished {
                    success: run.exit_code == Some(0),
                    exit_code: run.exit_code,
                    output: run.output,
                });
            }
            Err(e) => {
                tracing::error!("Run failed: {}", e);
                proxy.send_event(UserEvent::ShowError(e.to_string()));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(program: &str, args: &[&str]) -> RunRequest {
        RunRequest {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: std::env::temp_dir(),
        }
    }

    #[tokio::test]
    async fn missing_executable_reports_tool_not_found() {
        let err = execute(&request("definitely-not-a-real-binary-xyz", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_and_stderr_combined() {
        let run = execute(&request(
            "sh",
            &["-c", "printf from-stdout; printf from-stderr 1>&2"],
        ))
        .await
        .unwrap();
        assert_eq!(run.exit_code, Some(0));
        assert!(run.output.contains("from-stdout"));
        assert!(run.output.contains("from-stderr"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_code_is_reported_not_an_error() {
        let run = execute(&request("sh", &["-c", "exit 3"])).await.unwrap();
        assert_eq!(run.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_the_requested_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let req = RunRequest {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "pwd".to_string()],
            cwd: dir.path().to_path_buf(),
        };
        let run = execute(&req).await.unwrap();
        let reported = PathBuf::from(run.output.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
