/// Capture session state
///
/// Exactly one is active at any time. `Processing` covers the window between
/// asking the recorder to stop and the recorder finishing its output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Processing,
}
