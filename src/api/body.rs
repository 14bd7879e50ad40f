//! Request body reading and decoding module
//!
//! Reads bodies with a hard size cap and decodes the contact payload from
//! JSON, urlencoded form data, or a raw fallback.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("payload exceeds the configured size limit")]
    TooLarge,
    #[error("failed to read request body: {0}")]
    Read(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Contact form fields as submitted by the client, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Read the whole body, aborting as soon as the accumulated size passes
/// `limit`. The abort happens mid-stream, before any parsing.
pub async fn read_limited<B>(mut body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let mut collected: Vec<u8> = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| BodyError::Read(e.to_string()))?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(BodyError::TooLarge);
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}

/// Decode the submission fields according to the declared content type.
///
/// JSON bodies must be an object with the expected keys; urlencoded forms
/// are picked apart pair by pair; anything else carries no addressable
/// fields and decodes to an empty payload, which validation then rejects.
pub fn parse_payload(bytes: &[u8], content_type: &str) -> Result<SubmissionPayload, BodyError> {
    if bytes.is_empty() {
        return Ok(SubmissionPayload::default());
    }

    if content_type.contains("application/json") {
        return serde_json::from_slice(bytes).map_err(|e| BodyError::Malformed(e.to_string()));
    }

    if content_type.contains("application/x-www-form-urlencoded") {
        let mut payload = SubmissionPayload::default();
        for (key, value) in url::form_urlencoded::parse(bytes) {
            match key.as_ref() {
                "name" => payload.name = value.into_owned(),
                "email" => payload.email = value.into_owned(),
                "message" => payload.message = value.into_owned(),
                _ => {}
            }
        }
        return Ok(payload);
    }

    Ok(SubmissionPayload::default())
}
