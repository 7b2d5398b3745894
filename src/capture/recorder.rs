use super::backend::{CaptureBackend, CaptureStatus};

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};

/// Placeholder in the recorder command that is replaced with the output file
/// path of each capture.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Capture backend that drives an external recorder process
///
/// `start` spawns the configured command with a timestamped output path
/// substituted for `{output}`. `stop` writes the stop input to the child's
/// stdin and closes the pipe; the recorder keeps running while it finalizes
/// its container, and `status` reports `Finished` once the process exits.
pub struct RecorderProcessBackend {
    command: Vec<String>,
    stop_input: String,
    extension: String,
    output_dir: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    finished: bool,
}

impl RecorderProcessBackend {
    pub fn new(command: Vec<String>, stop_input: String, extension: String) -> Self {
        Self {
            command,
            stop_input,
            extension,
            output_dir: PathBuf::new(),
            child: None,
            stdin: None,
            finished: false,
        }
    }

    fn next_output_path(&self) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.output_dir
            .join(format!("capture-{}.{}", stamp, self.extension))
    }

    fn kill_child(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                tracing::warn!("Failed to kill recorder process: {}", e);
            }
        }
    }
}

#[async_trait]
impl CaptureBackend for RecorderProcessBackend {
    fn status(&mut self) -> CaptureStatus {
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        tracing::debug!("Recorder exited: {}", status);
                    } else {
                        tracing::warn!("Recorder exited: {}", status);
                    }
                    self.child = None;
                    self.stdin = None;
                    self.finished = true;
                }
                Ok(None) => return CaptureStatus::Started,
                Err(e) => {
                    tracing::warn!("Failed to poll recorder process: {}", e);
                    return CaptureStatus::Started;
                }
            }
        }

        if self.finished {
            CaptureStatus::Finished
        } else {
            CaptureStatus::NotStarted
        }
    }

    async fn start(&mut self) -> Result<()> {
        if self.child.is_some() || self.finished {
            anyhow::bail!("Recorder process is already active");
        }

        let output = self.next_output_path();
        let mut argv = self.command.iter().map(|arg| {
            arg.replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy())
        });
        let program = argv.next().context("Recorder command is empty")?;
        let args: Vec<String> = argv.collect();

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn recorder: {}", program))?;

        self.stdin = child.stdin.take();
        self.child = Some(child);
        tracing::info!("Recorder started, writing to {}", output.display());
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(mut stdin) = self.stdin.take() else {
            self.kill_child();
            return Ok(());
        };

        if let Err(e) = stdin.write_all(self.stop_input.as_bytes()).await {
            tracing::warn!("Failed to send stop input to recorder: {}", e);
            self.kill_child();
            return Ok(());
        }
        let _ = stdin.write_all(b"\n").await;
        // Closing the pipe doubles as EOF for recorders that ignore the stop
        // input.
        let _ = stdin.shutdown().await;
        tracing::info!("Recorder asked to stop, finalizing output");
        Ok(())
    }

    fn reset(&mut self) {
        if self.child.is_some() {
            tracing::warn!("Resetting a recorder that is still running");
            self.kill_child();
        }
        self.child = None;
        self.stdin = None;
        self.finished = false;
    }

    fn set_output_dir(&mut self, dir: &Path) {
        self.output_dir = dir.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backend(command: &[&str]) -> RecorderProcessBackend {
        RecorderProcessBackend::new(
            command.iter().map(|s| s.to_string()).collect(),
            "q".to_string(),
            "mp4".to_string(),
        )
    }

    async fn wait_for_finished(backend: &mut RecorderProcessBackend) {
        for _ in 0..250 {
            if backend.status() == CaptureStatus::Finished {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("recorder never reported Finished");
    }

    #[tokio::test]
    async fn substitutes_output_path_and_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend(&["sh", "-c", "touch \"$0\"", OUTPUT_PLACEHOLDER]);
        backend.set_output_dir(dir.path());
        assert_eq!(backend.status(), CaptureStatus::NotStarted);

        backend.start().await.unwrap();
        wait_for_finished(&mut backend).await;

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].extension().unwrap(), "mp4");

        backend.reset();
        assert_eq!(backend.status(), CaptureStatus::NotStarted);
    }

    #[tokio::test]
    async fn stop_ends_a_running_capture() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend(&["sh", "-c", "cat > /dev/null"]);
        backend.set_output_dir(dir.path());

        backend.start().await.unwrap();
        assert_eq!(backend.status(), CaptureStatus::Started);

        backend.stop().await.unwrap();
        wait_for_finished(&mut backend).await;
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend(&["sh", "-c", "cat > /dev/null"]);
        backend.set_output_dir(dir.path());

        backend.start().await.unwrap();
        assert!(backend.start().await.is_err());

        backend.reset();
        assert_eq!(backend.status(), CaptureStatus::NotStarted);
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend(&["slate-no-such-recorder-binary"]);
        backend.set_output_dir(dir.path());
        assert!(backend.start().await.is_err());
    }
}
