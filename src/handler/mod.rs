//! Request handler module
//!
//! Responsible for request routing dispatch and the climate query endpoints.

pub mod climate;
pub mod router;
mod welcome;

// Re-export main entry point
pub use router::handle_request;
