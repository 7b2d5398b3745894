use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Shows a directory to the user.
///
/// Behind a trait so tests can observe the side effect without spawning a
/// file browser.
pub trait DirectoryReveal: Send {
    fn reveal(&mut self, path: &Path) -> Result<()>;
}

/// Launches the platform file browser pointed at the directory, with the
/// directory path as its sole argument. Fire-and-forget.
pub struct FileBrowserReveal;

impl DirectoryReveal for FileBrowserReveal {
    fn reveal(&mut self, path: &Path) -> Result<()> {
        #[cfg(target_os = "macos")]
        let program = "open";
        #[cfg(target_os = "windows")]
        let program = "explorer";
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let program = "xdg-open";

        Command::new(program)
            .arg(path)
            .spawn()
            .map(|_| ())
            .with_context(|| format!("Failed to launch {} for {}", program, path.display()))
    }
}
