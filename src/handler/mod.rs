//! Request handling module
//!
//! Top-level dispatch between the JSON API and static asset serving.

mod router;
pub mod static_files;

pub use router::handle_request;
