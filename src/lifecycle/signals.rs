//! OS signal handling.
//!
//! # Responsibilities
//! - SIGTERM/SIGINT trigger graceful shutdown
//! - SIGHUP requests a re-read of the configuration document

use tokio::sync::mpsc;

use super::shutdown::Shutdown;

/// Install signal handlers on a background task.
///
/// Returns a receiver yielding one item per reload request.
#[cfg(unix)]
pub fn spawn_signal_handler(shutdown: Shutdown) -> std::io::Result<mpsc::UnboundedReceiver<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let (reload_tx, reload_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = terminate.recv() => {
                    tracing::info!("SIGTERM received, shutting down");
                    shutdown.trigger();
                    break;
                }
                _ = interrupt.recv() => {
                    tracing::info!("SIGINT received, shutting down");
                    shutdown.trigger();
                    break;
                }
                _ = hangup.recv() => {
                    tracing::info!("SIGHUP received, reloading configuration document");
                    if reload_tx.send(()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    Ok(reload_rx)
}

#[cfg(not(unix))]
pub fn spawn_signal_handler(shutdown: Shutdown) -> std::io::Result<mpsc::UnboundedReceiver<()>> {
    let (_reload_tx, reload_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
            shutdown.trigger();
        }
    });
    Ok(reload_rx)
}
