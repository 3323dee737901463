// Signal handling module
//
// - SIGTERM: stop accepting and exit
// - SIGINT:  stop accepting and exit (Ctrl+C)

use std::future::Future;

use crate::logger;

/// Resolve when the process is asked to stop.
///
/// Unix handlers are registered when this is called, not on first poll, so a
/// signal arriving right after the listener is bound is still caught. Must be
/// called inside a tokio runtime. If no handler can be registered the future
/// never resolves, leaving the default signal disposition in charge.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    use tokio::signal::unix::{signal, SignalKind};

    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());

    async move {
        match (sigterm, sigint) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => logger::log_shutdown("SIGTERM"),
                    _ = sigint.recv() => logger::log_shutdown("SIGINT"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!("Failed to register signal handlers: {e}"));
                wait_ctrl_c().await;
            }
        }
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    wait_ctrl_c()
}

async fn wait_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_shutdown("SIGINT"),
        Err(e) => {
            logger::log_warning(&format!("Failed to register Ctrl+C handler: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
