use crate::services::command::LaunchCommand;
use std::process::Stdio;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Lifecycle of one monitored hashcat session.
///
/// `Idle -> Running -> Finished`, with `Idle -> LaunchFailed` when the
/// process cannot be spawned. `LaunchFailed` is terminal for that attempt;
/// the user reconfigures and starts again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Finished,
    LaunchFailed,
}

/// Events forwarded from the child process to the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// One complete output line, trailing newline stripped, otherwise
    /// verbatim. Stdout and stderr both arrive here.
    Line(String),

    /// The process could not be spawned. Sent exactly once, before
    /// [`ProcessMonitor::start`] returns the error.
    LaunchError(String),

    /// The process exited. Always the last event of a session; emitted only
    /// after every buffered output line has been forwarded.
    Finished { exit_code: Option<i32> },
}

/// Errors starting a session.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("a crack session is already running")]
    AlreadyRunning,
}

/// Owns the lifecycle of at most one spawned hashcat process.
///
/// The child's stdout and stderr are captured and merged into a single
/// line-oriented [`MonitorEvent`] stream. Reading happens on dedicated
/// async tasks with buffered line readers, so a partial line is held until
/// its newline arrives and the caller's thread never blocks on output.
///
/// Must be started from within a tokio runtime context.
pub struct ProcessMonitor {
    state: Arc<RwLock<MonitorState>>,
    cancel_tx: Option<watch::Sender<bool>>,
}

impl ProcessMonitor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MonitorState::Idle)),
            cancel_tx: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        *self.state.read().unwrap()
    }

    /// Spawn the command and begin streaming its output into `events`.
    ///
    /// On success the state becomes `Running` and background tasks forward
    /// output lines until the process exits, at which point a single
    /// `Finished` event follows the last line and the state becomes
    /// `Finished`.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` if a session is in flight. `Spawn` if the OS
    /// refuses to start the process (missing binary, permission denied);
    /// in that case exactly one `LaunchError` event carrying the OS error
    /// text is sent and the state is `LaunchFailed`.
    pub fn start(
        &mut self,
        command: &LaunchCommand,
        events: mpsc::UnboundedSender<MonitorEvent>,
    ) -> Result<(), MonitorError> {
        if self.state() == MonitorState::Running {
            return Err(MonitorError::AlreadyRunning);
        }

        tracing::info!("Launching: {}", command.display());

        let spawned = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                let program = command.program().to_string();
                tracing::error!("Failed to launch {}: {}", program, source);
                *self.state.write().unwrap() = MonitorState::LaunchFailed;
                let _ = events.send(MonitorEvent::LaunchError(format!(
                    "failed to launch {}: {}",
                    program, source
                )));
                return Err(MonitorError::Spawn { program, source });
            }
        };

        *self.state.write().unwrap() = MonitorState::Running;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.cancel_tx = Some(cancel_tx);

        // The pipes are moved into reader tasks; the child handle itself is
        // owned by the supervising task below.
        let stdout = child.stdout.take().map(|out| forward_lines(out, events.clone()));
        let stderr = child.stderr.take().map(|err| forward_lines(err, events.clone()));

        tokio::spawn(supervise(
            child,
            cancel_rx,
            stdout,
            stderr,
            events,
            Arc::clone(&self.state),
        ));

        Ok(())
    }

    /// Request termination of the running session.
    ///
    /// Kills the child; the session then drains remaining output and ends
    /// through the normal `Finished` path. A no-op when nothing is running.
    pub fn stop(&self) {
        if self.state() != MonitorState::Running {
            return;
        }
        if let Some(tx) = &self.cancel_tx {
            tracing::info!("Stop requested for running session");
            let _ = tx.send(true);
        }
    }
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward complete lines from one output pipe into the event stream.
fn forward_lines<R>(
    reader: R,
    events: mpsc::UnboundedSender<MonitorEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if events.send(MonitorEvent::Line(line)).is_err() {
                        // Sink dropped - nobody is listening anymore.
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Output stream read error: {}", e);
                    break;
                }
            }
        }
    })
}

/// Wait for the child to exit, racing against a stop request, then emit the
/// completion event once all output lines have been drained.
async fn supervise(
    mut child: Child,
    mut cancel_rx: watch::Receiver<bool>,
    stdout_task: Option<JoinHandle<()>>,
    stderr_task: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<MonitorEvent>,
    state: Arc<RwLock<MonitorState>>,
) {
    let status = tokio::select! {
        res = child.wait() => res,
        _ = stop_requested(&mut cancel_rx) => {
            if let Err(e) = child.start_kill() {
                tracing::warn!("Failed to kill child process: {}", e);
            }
            child.wait().await
        }
    };

    // Killing the child closes its pipes, so the reader tasks always
    // terminate; await them so Finished is the last event of the session.
    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    let exit_code = match status {
        Ok(status) => {
            tracing::info!("Child process exited with {:?}", status.code());
            status.code()
        }
        Err(e) => {
            tracing::warn!("Failed to wait for child process: {}", e);
            None
        }
    };

    *state.write().unwrap() = MonitorState::Finished;
    let _ = events.send(MonitorEvent::Finished { exit_code });
}

async fn stop_requested(rx: &mut watch::Receiver<bool>) {
    while rx.changed().await.is_ok() {
        if *rx.borrow() {
            return;
        }
    }
    // Sender dropped without a stop request - never resolve.
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let monitor = ProcessMonitor::new();
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let monitor = ProcessMonitor::new();
        monitor.stop();
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[tokio::test]
    async fn test_launch_failure_is_terminal() {
        let mut monitor = ProcessMonitor::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let command = LaunchCommand::new("hashpilot-no-such-binary", vec![]);
        let result = monitor.start(&command, tx);

        assert!(matches!(result, Err(MonitorError::Spawn { .. })));
        assert_eq!(monitor.state(), MonitorState::LaunchFailed);

        match rx.recv().await {
            Some(MonitorEvent::LaunchError(msg)) => {
                assert!(msg.contains("hashpilot-no-such-binary"));
            }
            other => panic!("expected LaunchError, got {:?}", other),
        }
    }
}
