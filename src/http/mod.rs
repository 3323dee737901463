//! HTTP protocol layer module
//!
//! Response builders shared by the route table and the request dispatcher.

pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, build_405_response, build_ok_response, OK_BODY};
