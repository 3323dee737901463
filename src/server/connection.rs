// Connection handling module
// Serves a single accepted TCP connection in its own task

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Slot in the active-connection count, released when dropped
///
/// The slot is returned on every exit path of the connection task,
/// including a panic or the task being dropped by the runtime.
struct ConnectionGuard {
    state: Arc<AppState>,
}

impl ConnectionGuard {
    /// Take a slot, or return the count already active when the limit is reached
    fn acquire(state: &Arc<AppState>) -> Result<Self, usize> {
        // Increment first, then check, so concurrent accepts cannot both slip under the limit
        let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);
        let guard = Self {
            state: Arc::clone(state),
        };

        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                return Err(prev_count);
            }
        }

        Ok(guard)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.active_connections.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, enforce the optional connection limit, and spawn its task.
///
/// Each connection runs on its own task so a slow client never holds up others.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    let guard = match ConnectionGuard::acquire(state) {
        Ok(guard) => guard,
        Err(active) => {
            let max_conn = state.config.performance.max_connections.unwrap_or_default();
            logger::log_connection_rejected(&peer_addr, active, max_conn);
            drop(stream);
            return;
        }
    };

    tokio::spawn(serve_connection(stream, peer_addr, guard));
}

/// Serve HTTP/1.1 on one connection until the peer closes it, a framing
/// error occurs, or the optional connection timeout fires.
///
/// Errors stay inside this task; they are logged and the connection is dropped.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, guard: ConnectionGuard) {
    let state = &guard.state;
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(state.config.performance.keep_alive);

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, peer_addr, Arc::clone(&service_state))),
    );

    let timeout_secs = state.config.performance.connection_timeout;
    if timeout_secs > 0 {
        match tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&peer_addr, &err),
            Err(_) => logger::log_connection_timeout(&peer_addr, timeout_secs),
        }
    } else if let Err(err) = conn.await {
        logger::log_connection_error(&peer_addr, &err);
    }
}
