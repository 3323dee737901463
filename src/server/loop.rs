// Server loop module
// Accepts connections until the process ends or a shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::error::ServerError;
use crate::logger;

/// Pause after a failed `accept` (e.g. EMFILE) before trying again
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Accept connections forever
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Accept connections until `shutdown` resolves, then release the listening socket.
///
/// Connections already accepted keep running on their own tasks.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => {
                        logger::log_accept_error(&e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_listener_closed(&local_addr);
    Ok(())
}
