// Server loop module
// Accepts connections until shutdown is requested, then releases the socket

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `state.shutdown` is notified.
///
/// The listener is dropped as soon as shutdown is requested so the port is
/// free for the next process. Connections already accepted then get up to
/// `performance.shutdown_timeout` seconds to finish before this returns.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let shutdown = Arc::clone(&state.shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = drain_connections(&state.active_connections, grace).await;
    logger::log_drain_finished(remaining);
    Ok(())
}

/// Wait until `active` reaches zero or `grace` runs out
///
/// Returns the number of connections still open at the end.
async fn drain_connections(active: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let open = active.load(Ordering::SeqCst);
        if open == 0 {
            return 0;
        }

        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {
                return active.load(Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_drain_returns_at_once_when_idle() {
        let active = AtomicUsize::new(0);
        let started = Instant::now();
        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_drain_waits_for_last_connection() {
        let active = Arc::new(AtomicUsize::new(2));
        let finisher = {
            let active = Arc::clone(&active);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            })
        };

        let started = Instant::now();
        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
        assert!(started.elapsed() >= Duration::from_millis(200));
        finisher.await.unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let active = AtomicUsize::new(1);
        let started = Instant::now();
        assert_eq!(drain_connections(&active, Duration::from_millis(120)).await, 1);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(120));
        assert!(elapsed < Duration::from_secs(2));
    }
}
