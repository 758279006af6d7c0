//! Transport: one POST to the webhook, one JSON answer back.
//!
//! No retry and no request timeout: a resubmission would publish the posts
//! twice. The only bound is the optional connect timeout from
//! [`ClientConfig`].
//!
//! Status handling mirrors what the form shows: 404 and 413 get their own
//! messages, every other non-2xx is reported with its code.

use crate::config::ClientConfig;
use crate::error::PostforgeError;
use crate::pipeline::encode::OutboundPayload;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Build the HTTP client for a config.
pub fn http_client(config: &ClientConfig) -> Result<reqwest::Client, PostforgeError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| PostforgeError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Send the payload and return the raw response body on a 2xx status.
pub async fn send(
    client: &reqwest::Client,
    endpoint: &str,
    payload: OutboundPayload,
) -> Result<String, PostforgeError> {
    info!("Sending submission to {}", endpoint);

    let request = client.post(endpoint);
    let request = match payload {
        OutboundPayload::Json(body) => request.json(&body),
        multipart => {
            let form = multipart
                .into_form()
                .map_err(|e| PostforgeError::Internal(format!("Invalid multipart part: {e}")))?
                .ok_or_else(|| PostforgeError::Internal("multipart payload without form".into()))?;
            request.multipart(form)
        }
    };

    let response = request.send().await.map_err(|e| {
        warn!("Webhook request failed: {}", e);
        PostforgeError::Transport {
            reason: e.to_string(),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!("Webhook answered HTTP {}", status);
        return Err(PostforgeError::Server {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| PostforgeError::Transport {
        reason: e.to_string(),
    })?;
    debug!("Webhook answered HTTP {} with {} bytes", status, body.len());
    Ok(body)
}

/// Parse a response body as JSON.
///
/// Empty and non-JSON bodies are the only hard failures of the rendering
/// path; everything past this point degrades per facet.
pub fn parse_body(body: &str) -> Result<Value, PostforgeError> {
    if body.trim().is_empty() {
        return Err(PostforgeError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| PostforgeError::InvalidResponse {
        detail: e.to_string(),
    })
}
