//! Request handler module
//!
//! Routes requests to the page controllers and turns their views into responses.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
