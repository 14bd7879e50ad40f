//! Contact submission handler module
//!
//! Validates contact-form submissions, normalizes the fields, and appends
//! the resulting record to the contact store.

use crate::api::body::{self, BodyError, SubmissionPayload};
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::store::ContactRecord;
use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header;
use hyper::{Request, Response, StatusCode};
use regex::Regex;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

const MAX_MESSAGE_CHARS: usize = 2000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A submission that passed validation, with normalized fields.
#[derive(Debug, PartialEq, Eq)]
struct ValidSubmission {
    name: String,
    email: String,
    message: String,
}

/// Handle `POST /api/contact`
pub async fn handle_submission<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Unpin + Send,
    B::Error: std::fmt::Display,
{
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let bytes = match body::read_limited(req.into_body(), limit).await {
        Ok(bytes) => bytes,
        Err(BodyError::TooLarge) => {
            logger::log_warning("Contact submission aborted: payload too large");
            return http::error_response(StatusCode::PAYLOAD_TOO_LARGE, "Message is too large.");
        }
        Err(err) => {
            logger::log_warning(&format!("Failed to read contact submission body: {err}"));
            return http::error_response(
                StatusCode::BAD_REQUEST,
                "Unable to read the request body.",
            );
        }
    };

    let payload = match body::parse_payload(&bytes, &content_type) {
        Ok(payload) => payload,
        Err(err) => {
            logger::log_warning(&format!("Failed to parse contact submission: {err}"));
            return http::error_response(
                StatusCode::BAD_REQUEST,
                "The request body could not be parsed.",
            );
        }
    };

    let submission = match validate(payload) {
        Ok(submission) => submission,
        Err(message) => return http::error_response(StatusCode::BAD_REQUEST, message),
    };

    let record = ContactRecord {
        id: Uuid::new_v4().to_string(),
        name: submission.name,
        email: submission.email,
        message: submission.message,
        submitted_at: Utc::now().to_rfc3339(),
        client_ip: peer_addr.ip().to_string(),
        user_agent,
    };

    match state.store.append(&record).await {
        Ok(()) => {
            logger::log_contact_stored(&record.id);
            http::json_response(
                StatusCode::CREATED,
                &serde_json::json!({
                    "success": true,
                    "message": "Thanks for reaching out! I'll respond within two business days.",
                }),
            )
        }
        Err(err) => {
            // Detail stays server-side; the client gets a generic message.
            logger::log_error(&format!("Failed to store contact submission: {err}"));
            http::error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong while sending your message. Please try again later.",
            )
        }
    }
}

/// Normalize and validate the submitted fields.
///
/// All fields are trimmed and the email is lower-cased before the checks run.
fn validate(payload: SubmissionPayload) -> Result<ValidSubmission, &'static str> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    let message = payload.message.trim().to_string();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err("Please provide a name, email address, and message.");
    }

    if !is_valid_email(&email) {
        return Err("Please enter a valid email address.");
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err("Messages should be 2000 characters or fewer.");
    }

    Ok(ValidSubmission {
        name,
        email,
        message,
    })
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, message: &str) -> SubmissionPayload {
        SubmissionPayload {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_submission_is_normalized() {
        let result = validate(payload("  Ada  ", " Ada@Example.COM ", " hello ")).expect("valid");
        assert_eq!(result.name, "Ada");
        assert_eq!(result.email, "ada@example.com");
        assert_eq!(result.message, "hello");
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(validate(payload("", "ada@example.com", "hi")).is_err());
        assert!(validate(payload("Ada", "", "hi")).is_err());
        assert!(validate(payload("Ada", "ada@example.com", "")).is_err());
        // Whitespace-only counts as blank after trimming.
        assert!(validate(payload("   ", "ada@example.com", "hi")).is_err());
    }

    #[test]
    fn email_without_at_or_domain_is_rejected() {
        assert_eq!(
            validate(payload("Ada", "adaexample.com", "hi")),
            Err("Please enter a valid email address.")
        );
        assert_eq!(
            validate(payload("Ada", "ada@example", "hi")),
            Err("Please enter a valid email address.")
        );
        assert!(validate(payload("Ada", "ada@example.com", "hi")).is_ok());
    }

    #[test]
    fn message_cap_is_exactly_2000_characters() {
        let at_cap = "x".repeat(2000);
        let over_cap = "x".repeat(2001);
        assert!(validate(payload("Ada", "ada@example.com", &at_cap)).is_ok());
        assert_eq!(
            validate(payload("Ada", "ada@example.com", &over_cap)),
            Err("Messages should be 2000 characters or fewer.")
        );
    }

    #[test]
    fn email_pattern_edge_cases() {
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
        assert!(!is_valid_email("a@"));
    }
}
