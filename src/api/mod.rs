//! API module
//!
//! Routes requests under the `/api/` prefix: health check, contact-form
//! submission, and CORS preflight. CORS headers are applied to every API
//! response before it leaves this module.

pub mod body;
mod contact;

use crate::config::AppState;
use crate::http;
use crate::logger;
use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;

/// Handle a request whose path falls under the API prefix
pub async fn handle_api<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Unpin + Send,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = route_api(req, state, peer_addr).await;
    http::apply_cors(&mut response, &state.config.http.allowed_origin);

    if state.config.logging.access_log {
        logger::log_api_request(method.as_str(), &path, response.status().as_u16());
    }

    response
}

async fn route_api<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Unpin + Send,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Preflight short-circuits before any endpoint matching.
    if method == Method::OPTIONS {
        return http::build_preflight_response();
    }

    if method == Method::GET && path == "/api/health" {
        return handle_health(state);
    }

    if method == Method::POST && path == "/api/contact" {
        return contact::handle_submission(req, state, peer_addr).await;
    }

    http::error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}

/// Handle `GET /api/health`
fn handle_health(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &serde_json::json!({
            "status": "ok",
            "timestamp": Utc::now().to_rfc3339(),
            "storage": state.store.path().display().to_string(),
        }),
    )
}
