//! HTTP protocol layer module
//!
//! Content-Type detection and response builders, decoupled from routing and
//! business logic.

pub mod mime;
pub mod response;

pub use response::{
    apply_cors, build_403_response, build_405_response, build_no_content_response,
    build_options_response, build_preflight_response, build_static_response, error_response,
    json_response,
};
