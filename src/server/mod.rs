// Server module entry point
// Listener creation, the accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use connection::accept_connection;
pub use listener::{bind, create_listener};
pub use server_loop::{serve, serve_with_shutdown};
pub use signal::shutdown_signal;
