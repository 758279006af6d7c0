//! Submission entry points.
//!
//! [`Client`] runs one full cycle: validate the form, encode the body, POST
//! it, parse the answer and normalize it into a [`RenderResult`]. Every
//! state transition goes to the configured [`SubmissionObserver`].
//!
//! A client allows one submission at a time. A second concurrent call fails
//! with [`PostforgeError::SubmissionInProgress`] without touching the
//! network.

use crate::config::ClientConfig;
use crate::error::PostforgeError;
use crate::messages;
use crate::output::RenderResult;
use crate::pipeline::build::{self, FormFields, SubmissionRequest};
use crate::pipeline::encode;
use crate::pipeline::render::{self, Rendered};
use crate::pipeline::transport;
use crate::state::UiState;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything a successful submission produced.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// The parsed webhook answer, as received.
    pub response: Value,
    /// Normalized cards or fallback, plus per-facet diagnostics.
    pub rendered: Rendered,
    pub duration_ms: u64,
}

impl SubmissionOutcome {
    pub fn result(&self) -> &RenderResult {
        &self.rendered.result
    }
}

/// Webhook client holding the HTTP connection pool and the in-flight flag.
///
/// # Example
/// ```rust,no_run
/// use postforge::{Client, ClientConfig, FormFields, Platform};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(ClientConfig::default())?;
/// let outcome = client
///     .submit(FormFields {
///         topic: Some("Launch day".into()),
///         platforms: vec![Platform::Instagram, Platform::X],
///         ..Default::default()
///     })
///     .await?;
/// println!("{} cards", outcome.result().cards().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
    in_flight: AtomicBool,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, PostforgeError> {
        let http = transport::http_client(&config)?;
        Ok(Self {
            config,
            http,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True while a submission is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate and submit raw form fields.
    ///
    /// # Errors
    /// * [`PostforgeError::Validation`]: nothing was sent
    /// * [`PostforgeError::SubmissionInProgress`]: another call is running
    /// * transport, status and response-body errors from the webhook
    pub async fn submit(&self, fields: FormFields) -> Result<SubmissionOutcome, PostforgeError> {
        let request = match build::build(fields) {
            Ok(r) => r,
            Err(e) => {
                debug!("Form rejected: {}", e);
                self.notify(&UiState::Failed {
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };
        self.submit_request(&request).await
    }

    /// Submit an already validated request.
    pub async fn submit_request(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionOutcome, PostforgeError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Rejected submission: another one is in flight");
            PostforgeError::SubmissionInProgress
        })?;

        let start = Instant::now();
        self.notify(&UiState::Submitting {
            with_video: request.has_video(),
        });

        match self.run(request).await {
            Ok((response, rendered)) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                info!(
                    "Submission complete: {} cards, {} diagnostics, {}ms",
                    rendered.result.cards().len(),
                    rendered.diagnostics.len(),
                    duration_ms
                );
                self.notify(&UiState::Success);
                Ok(SubmissionOutcome {
                    response,
                    rendered,
                    duration_ms,
                })
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                self.notify(&UiState::Failed {
                    message: e.user_message(),
                });
                Err(e)
            }
        }
    }

    async fn run(&self, request: &SubmissionRequest) -> Result<(Value, Rendered), PostforgeError> {
        let payload = encode::encode(request, self.config.body_encoding);

        if let Some(ref observer) = self.config.observer {
            observer.on_sending(messages::BUTTON_SENDING);
        }
        let body = transport::send(&self.http, &self.config.endpoint, payload).await?;

        let response = transport::parse_body(&body)?;
        let rendered = render::render_detailed(&response);
        Ok((response, rendered))
    }

    fn notify(&self, state: &UiState) {
        if let Some(ref observer) = self.config.observer {
            observer.on_state(state);
        }
    }
}

/// Synchronous wrapper around [`Client::submit`].
///
/// Creates a temporary tokio runtime internally.
pub fn submit_sync(
    config: ClientConfig,
    fields: FormFields,
) -> Result<SubmissionOutcome, PostforgeError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| PostforgeError::Internal(format!("Failed to create tokio runtime: {e}")))?;
    let client = Client::new(config)?;
    runtime.block_on(client.submit(fields))
}

// ── In-flight guard ──────────────────────────────────────────────────────

/// Holds the client's in-flight flag; clears it on drop.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
