use crate::capture::{CaptureBackend, CaptureStatus};
use crate::config::RuntimeMode;
use crate::messages::SessionState;
use crate::reveal::DirectoryReveal;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub type LifecycleHook = Box<dyn FnMut() + Send>;

/// Subscriber lists for the four session lifecycle events
///
/// Hooks fire synchronously, in registration order, at the transition that
/// names them. Firing with no subscribers is a no-op.
#[derive(Default)]
pub struct SessionHooks {
    recording_start: Vec<LifecycleHook>,
    recording_end: Vec<LifecycleHook>,
    processing_start: Vec<LifecycleHook>,
    processing_end: Vec<LifecycleHook>,
}

impl SessionHooks {
    pub fn on_recording_start(&mut self, hook: impl FnMut() + Send + 'static) {
        self.recording_start.push(Box::new(hook));
    }

    pub fn on_recording_end(&mut self, hook: impl FnMut() + Send + 'static) {
        self.recording_end.push(Box::new(hook));
    }

    pub fn on_processing_start(&mut self, hook: impl FnMut() + Send + 'static) {
        self.processing_start.push(Box::new(hook));
    }

    pub fn on_processing_end(&mut self, hook: impl FnMut() + Send + 'static) {
        self.processing_end.push(Box::new(hook));
    }

    fn fire(hooks: &mut [LifecycleHook]) {
        for hook in hooks {
            hook();
        }
    }
}

/// Drives a capture session through Idle -> Recording -> Processing -> Idle
///
/// A toggle edge starts or stops a session; while the recorder finalizes its
/// file the controller polls backend status once per tick. Mismatches between
/// controller state and backend status are tolerated as silent no-ops rather
/// than errors.
pub struct SessionController {
    state: SessionState,
    tick_active: bool,
    reveal_armed: bool,
    mode: RuntimeMode,
    output_dir: PathBuf,
    backend: Box<dyn CaptureBackend>,
    reveal: Box<dyn DirectoryReveal>,
    hooks: SessionHooks,
}

impl SessionController {
    /// Create the controller, ensuring the capture directory exists.
    ///
    /// Directory creation failure is a startup error; the daemon must not
    /// come up without a writable capture target.
    pub fn new(
        output_dir: PathBuf,
        mode: RuntimeMode,
        reveal_armed: bool,
        mut backend: Box<dyn CaptureBackend>,
        reveal: Box<dyn DirectoryReveal>,
    ) -> Result<Self> {
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!(
                "Failed to create capture directory: {}",
                output_dir.display()
            )
        })?;
        let output_dir = output_dir.canonicalize().with_context(|| {
            format!(
                "Failed to resolve capture directory: {}",
                output_dir.display()
            )
        })?;
        backend.set_output_dir(&output_dir);
        tracing::info!("Captures will be written to {}", output_dir.display());

        Ok(Self {
            state: SessionState::Idle,
            tick_active: false,
            reveal_armed,
            mode,
            output_dir,
            backend,
            reveal,
            hooks: SessionHooks::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn hooks_mut(&mut self) -> &mut SessionHooks {
        &mut self.hooks
    }

    /// Whether the next tick has any work to do. True only while a session is
    /// finishing.
    pub fn needs_tick(&self) -> bool {
        self.tick_active
    }

    /// Handle one rising edge of the toggle signal.
    pub async fn on_signal_edge(&mut self) -> Result<()> {
        match self.state {
            SessionState::Processing => {
                tracing::debug!("Still processing, ignoring toggle");
                Ok(())
            }
            SessionState::Recording => self.stop_capture().await,
            SessionState::Idle => self.start_capture().await,
        }
    }

    async fn start_capture(&mut self) -> Result<()> {
        if self.backend.status() != CaptureStatus::NotStarted {
            tracing::debug!("Backend not ready to start, ignoring toggle");
            return Ok(());
        }

        tracing::info!("Starting capture");
        self.state = SessionState::Recording;
        self.backend.start().await?;
        SessionHooks::fire(&mut self.hooks.recording_start);
        Ok(())
    }

    async fn stop_capture(&mut self) -> Result<()> {
        if self.backend.status() != CaptureStatus::Started {
            tracing::debug!("Backend not capturing, ignoring toggle");
            return Ok(());
        }

        tracing::info!("Stopping capture");
        self.backend.stop().await?;
        SessionHooks::fire(&mut self.hooks.recording_end);
        self.enter_processing();
        Ok(())
    }

    fn enter_processing(&mut self) {
        self.tick_active = true;
        self.state = SessionState::Processing;
        SessionHooks::fire(&mut self.hooks.processing_start);
    }

    /// Poll the backend while a session is finishing. Inert in any other
    /// state.
    pub fn on_tick(&mut self) {
        if self.state != SessionState::Processing {
            return;
        }
        if self.backend.status() != CaptureStatus::Finished {
            return;
        }

        tracing::info!("Capture finished");
        self.tick_active = false;
        self.backend.reset();
        if self.reveal_armed {
            self.reveal_output_dir();
        }
        self.state = SessionState::Idle;
        SessionHooks::fire(&mut self.hooks.processing_end);
    }

    fn reveal_output_dir(&mut self) {
        // Packaged runs disarm before the spawn attempt; development runs
        // stay armed and open after every session.
        if self.mode == RuntimeMode::Packaged {
            self.reveal_armed = false;
        }
        if let Err(e) = self.reveal.reveal(&self.output_dir) {
            tracing::warn!(
                "Failed to open {} in the file browser: {}",
                self.output_dir.display(),
                e
            );
        }
    }
}
