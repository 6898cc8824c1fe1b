// Signal handling module
//
// - SIGINT  (Ctrl+C): stop accepting, release the port, exit
// - SIGTERM:          same as SIGINT

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start the signal listener task (Unix)
///
/// `shutdown` is notified once, on the first SIGINT or SIGTERM. If the handlers
/// cannot be registered the error is returned and nothing is spawned.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => logger::log_info("SIGINT received (Ctrl+C), stopping server"),
            _ = sigterm.recv() => logger::log_info("SIGTERM received, stopping server"),
        }
        // notify_one stores a permit, so a loop not yet waiting still sees it
        shutdown.notify_one();
    });

    Ok(())
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received, stopping server");
            shutdown.notify_one();
        }
    });
    Ok(())
}
