use anyhow::{Context, Result};
use ashpd::desktop::global_shortcuts::{GlobalShortcuts, NewShortcut};
use futures::StreamExt;
use tokio::sync::mpsc;

const SHORTCUT_ID: &str = "toggle-capture";

/// Spawn the shortcut listener, returning the edge channel.
///
/// Portal failure is logged and leaves the channel silent; the daemon keeps
/// running without a toggle source.
pub fn spawn_listener(trigger: &str) -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(10);
    let trigger = trigger.to_owned();
    tokio::spawn(async move {
        if let Err(e) = monitor_shortcut(&trigger, tx).await {
            tracing::error!("Shortcut monitoring failed: {}", e);
        }
    });
    rx
}

/// Monitor for the global shortcut via XDG Desktop Portal.
///
/// Registers a "toggle-capture" shortcut with the compositor (KDE/GNOME/etc)
/// and sends `()` on the channel once per activation. Activations are already
/// edge-triggered; nothing fires while the chord is held. The user can rebind
/// the trigger through their desktop's shortcut settings.
async fn monitor_shortcut(trigger: &str, tx: mpsc::Sender<()>) -> Result<()> {
    let shortcuts = GlobalShortcuts::new()
        .await
        .context("Failed to connect to GlobalShortcuts portal")?;

    let session = shortcuts
        .create_session()
        .await
        .context("Failed to create GlobalShortcuts session")?;

    let shortcut =
        NewShortcut::new(SHORTCUT_ID, "Toggle video capture").preferred_trigger(Some(trigger));

    shortcuts
        .bind_shortcuts(&session, &[shortcut], None)
        .await
        .context("Failed to bind shortcuts")?
        .response()
        .context("Shortcut binding was rejected")?;

    tracing::info!(
        "Global shortcut registered (default: {}). Reconfigure in System Settings > Shortcuts.",
        trigger
    );

    let mut stream = shortcuts
        .receive_activated()
        .await
        .context("Failed to listen for shortcut activations")?;

    while let Some(activated) = stream.next().await {
        if activated.shortcut_id() == SHORTCUT_ID {
            tracing::debug!("Shortcut activated: {}", SHORTCUT_ID);
            if tx.send(()).await.is_err() {
                break;
            }
        }
    }

    Ok(())
}
