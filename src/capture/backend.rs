use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Where the capture backend is in its lifecycle.
///
/// The session controller treats this as ground truth for transition timing,
/// even when it drifts from the controller's own state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureStatus {
    #[default]
    NotStarted,
    Started,
    Finished,
}

/// Trait for the video capture backend
///
/// Implementations own the actual recording machinery (typically an external
/// recorder process) and expose the narrow surface the session controller
/// drives: a polled status plus start/stop/reset.
#[async_trait]
pub trait CaptureBackend: Send {
    /// Current backend status. Non-blocking; polled once per tick while a
    /// session is finishing.
    fn status(&mut self) -> CaptureStatus;

    /// Begin a new capture.
    async fn start(&mut self) -> Result<()>;

    /// Ask the backend to stop capturing. The backend may keep running while
    /// it finalizes output; `status` reports `Finished` once it is done.
    async fn stop(&mut self) -> Result<()>;

    /// Return a `Finished` backend to `NotStarted` so the next session can
    /// start.
    fn reset(&mut self);

    /// Set the directory new captures are written into.
    fn set_output_dir(&mut self, dir: &Path);
}
