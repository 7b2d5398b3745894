use crate::config::HookCommands;
use crate::session::SessionHooks;

use tokio::process::Command;

/// Subscribe the configured shell commands to the session lifecycle events.
pub fn register_command_hooks(hooks: &mut SessionHooks, commands: &HookCommands) {
    if let Some(cmd) = commands.recording_start.clone() {
        hooks.on_recording_start(move || run_hook("recording-start", &cmd));
    }
    if let Some(cmd) = commands.recording_end.clone() {
        hooks.on_recording_end(move || run_hook("recording-end", &cmd));
    }
    if let Some(cmd) = commands.processing_start.clone() {
        hooks.on_processing_start(move || run_hook("processing-start", &cmd));
    }
    if let Some(cmd) = commands.processing_end.clone() {
        hooks.on_processing_end(move || run_hook("processing-end", &cmd));
    }
}

fn run_hook(label: &'static str, command: &str) {
    let command = command.to_owned();

    tokio::task::spawn(async move {
        tracing::info!("[{}] Running hook: {}", label, command);

        match Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()
        {
            Ok(child) => match child.wait_with_output().await {
                Ok(output) => {
                    if !output.status.success() {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        tracing::warn!(
                            "[{}] Hook exited with {}: {}",
                            label,
                            output.status,
                            stderr.trim()
                        );
                    }
                }
                Err(e) => tracing::warn!("[{}] Failed to wait on hook: {}", label, e),
            },
            Err(e) => tracing::warn!("[{}] Failed to spawn hook: {}", label, e),
        }
    });
}
