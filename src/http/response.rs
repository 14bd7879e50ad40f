//! HTTP response building module
//!
//! Builders for the response shapes the server produces, decoupled from
//! routing and business logic.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build a JSON response from any serializable payload
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build JSON response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Build a JSON error response: `{"error": message}`
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build error response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Build a static file response with Content-Type from the extension table
pub fn build_static_response(
    data: Vec<u8>,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build static file response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 403 Forbidden response for paths escaping the public root
pub fn build_403_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Forbidden")))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 403 response: {e}"));
            Response::new(Full::new(Bytes::from("Forbidden")))
        })
}

/// Build 405 Method Not Allowed response for static paths
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 405 response: {e}"));
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build empty 204 response (favicon shortcut)
pub fn build_no_content_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 204 response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 204 OPTIONS response for non-API paths
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build OPTIONS response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build empty 204 preflight response; CORS headers are applied by the
/// API wrapper like every other API response
pub fn build_preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build preflight response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Apply CORS headers for the configured origin to an API response
pub fn apply_cors(response: &mut Response<Full<Bytes>>, allowed_origin: &str) {
    let origin = HeaderValue::try_from(allowed_origin).unwrap_or_else(|_| {
        logger::log_warning(&format!(
            "Configured CORS origin is not a valid header value: '{allowed_origin}', using '*'"
        ));
        HeaderValue::from_static("*")
    });

    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", origin);
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let resp = error_response(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_apply_cors_sets_headers() {
        let mut resp = build_preflight_response();
        apply_cors(&mut resp, "https://example.com");
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Methods").unwrap(),
            "GET,POST,OPTIONS"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type"
        );
    }

    #[test]
    fn test_apply_cors_falls_back_on_invalid_origin() {
        let mut resp = build_preflight_response();
        apply_cors(&mut resp, "bad\norigin");
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
