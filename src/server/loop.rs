// Server loop module
// Accepts connections until shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Accept connections until `shutdown` fires, then wait for open connections.
///
/// Accept errors are logged and the loop keeps going. After shutdown the loop
/// stops accepting and waits up to `performance.shutdown_timeout` for in-flight
/// connections, so the caller can close the store once this returns.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
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
            () = shutdown.notified() => break,
        }
    }
    drop(listener);

    let limit = Duration::from_secs(state.config.performance.shutdown_timeout);
    if drain_connections(&active_connections, limit).await {
        logger::log_shutdown("all connections finished");
    } else {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, shutting down anyway",
            active_connections.load(Ordering::SeqCst),
            limit.as_secs()
        ));
    }
}

/// Wait until `counter` reaches zero; `false` when `limit` elapses first.
pub async fn drain_connections(counter: &AtomicUsize, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if counter.load(Ordering::SeqCst) == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {}
        }
    }
}
