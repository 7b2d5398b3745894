use crate::capture::RecorderProcessBackend;
use crate::config::{Config, RuntimeMode};
use crate::hooks;
use crate::reveal::FileBrowserReveal;
use crate::session::SessionController;
use crate::shortcuts;

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

pub struct App {
    controller: SessionController,
    shortcut_rx: mpsc::Receiver<()>,
    poll_interval: Duration,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let mode = RuntimeMode::detect();
        let output_dir = config.resolve_output_dir(mode)?;

        let backend = RecorderProcessBackend::new(
            config.recorder_command.clone(),
            config.stop_input.clone(),
            config.output_extension.clone(),
        );
        let mut controller = SessionController::new(
            output_dir,
            mode,
            config.reveal_when_done,
            Box::new(backend),
            Box::new(FileBrowserReveal),
        )?;
        hooks::register_command_hooks(controller.hooks_mut(), &config.hooks);

        let shortcut_rx = shortcuts::spawn_listener(&config.shortcut_trigger);

        tracing::info!(
            "Ready! Press {} to start/stop capturing",
            config.shortcut_trigger
        );

        Ok(Self {
            controller,
            shortcut_rx,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    pub async fn run(mut self) -> Result<()> {
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(_) = self.shortcut_rx.recv() => {
                    tracing::debug!("Main loop: received toggle signal");
                    if let Err(e) = self.controller.on_signal_edge().await {
                        tracing::error!("Error handling toggle: {}", e);
                    }
                }

                // Status polling only runs while a session is finishing.
                _ = poll.tick(), if self.controller.needs_tick() => {
                    self.controller.on_tick();
                }

                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}
