// Server loop module
// Accepts connections until shutdown, then drains open connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet` until `shutdown` fires.
///
/// Returns the number of connections still open when the grace period ended.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<ShutdownSignal>,
) -> usize {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.wait() => break,
        }
    }

    drop(listener);
    logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = wait_for_drain(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
    remaining
}

/// Poll the connection counter until it reaches zero or `grace` elapses
async fn wait_for_drain(active: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let open = active.load(Ordering::SeqCst);
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(wait_for_drain(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let active = AtomicUsize::new(2);
        assert_eq!(wait_for_drain(&active, Duration::from_millis(120)).await, 2);
    }
}
