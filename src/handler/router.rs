//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: classifies requests as API calls
//! or static-asset requests and dispatches accordingly. Every request
//! produces exactly one response; errors from the static path are mapped to
//! 403/404/500 here.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files::{self, StaticFileError};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Unpin + Send,
    B::Error: std::fmt::Display,
{
    if state.config.logging.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    // Reject oversized payloads up front when the client declares a length;
    // the body reader enforces the same cap for chunked uploads.
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }

    Ok(dispatch(req, &state, peer_addr).await)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Message is too large.",
                ))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Classify the request and route it to the API or static file handler
async fn dispatch<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Unpin + Send,
    B::Error: std::fmt::Display,
{
    let path = req.uri().path().to_string();

    if path.starts_with("/api/") {
        return api::handle_api(req, state, peer_addr).await;
    }

    // The portfolio ships an SVG favicon referenced from the page itself;
    // answer the browser's automatic .ico probe with an empty 204.
    if path == "/favicon.ico" {
        return http::build_no_content_response();
    }

    let is_head = match *req.method() {
        Method::GET => false,
        Method::HEAD => true,
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            return http::build_405_response();
        }
    };

    serve_static(&path, is_head, state).await
}

/// Serve a static asset, mapping resolution failures to status codes
async fn serve_static(path: &str, is_head: bool, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match static_files::load(&state.config.static_files, path).await {
        Ok((content, content_type)) => {
            if state.config.logging.access_log {
                logger::log_response(200, content.len());
            }
            http::build_static_response(content, content_type, is_head)
        }
        Err(StaticFileError::Forbidden) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
            http::build_403_response()
        }
        Err(StaticFileError::NotFound) => {
            http::error_response(StatusCode::NOT_FOUND, "Not found")
        }
        Err(StaticFileError::Io(err)) => {
            logger::log_error(&format!("Failed to serve static file '{path}': {err}"));
            http::error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
