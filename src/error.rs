//! Error types for the postforge library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ValidationError`]: the form itself is incomplete. Caught before any
//!   network traffic and shown inline; nothing is sent.
//!
//! * [`PostforgeError`]: **Fatal** for one submission: the webhook could not
//!   be reached, answered with a non-2xx status, or returned something that
//!   is not JSON at all.
//!
//! * [`FacetError`]: **Non-fatal**: one facet of one response item (a legacy
//!   platform result, an image payload) is malformed. The rest of the
//!   response still renders.

use std::path::PathBuf;
use thiserror::Error;

use crate::messages;

/// Form-level precondition failures.
///
/// The `Display` text is the exact message shown in the status region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither a topic nor a video was supplied.
    #[error("Please enter a topic or upload a video.")]
    MissingContent,

    /// No video was supplied and no target platform is selected.
    #[error("Please select at least one target platform.")]
    MissingPlatform,

    /// The attached video exceeds the upload limit.
    #[error("Video file is too large. Please use a file smaller than 100MB.")]
    FileTooLarge { size: u64, limit: u64 },
}

/// All fatal errors returned by the postforge library.
///
/// Facet-level failures use [`FacetError`] and never surface here.
#[derive(Debug, Error)]
pub enum PostforgeError {
    // ── Form errors ───────────────────────────────────────────────────────
    /// The form failed validation; the request was never sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A submission is already in flight on this client.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// The video file could not be read from disk.
    #[error("Failed to read video '{path}': {source}")]
    VideoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The webhook could not be reached at all.
    #[error("Network error: {reason}")]
    Transport { reason: String },

    /// The webhook answered with a non-2xx status.
    #[error("{}", messages::server_error_message(*status))]
    Server { status: u16 },

    // ── Response errors ───────────────────────────────────────────────────
    /// The webhook answered 2xx with an empty body.
    #[error("The server returned an empty response")]
    EmptyResponse,

    /// The webhook answered 2xx with a body that is not JSON.
    #[error("The server returned a response that is not valid JSON: {detail}")]
    InvalidResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write an exported file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference store could not be read or written.
    #[error("Preference store error: {detail}")]
    Preferences { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostforgeError {
    /// The text for the single status-message region.
    ///
    /// Transport failures collapse to one friendly network message; the
    /// underlying cause is only logged.
    pub fn user_message(&self) -> String {
        match self {
            PostforgeError::Transport { .. } => messages::NETWORK_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

/// A non-fatal error for a single facet of one response item.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum FacetError {
    /// A legacy `"<Platform> Post Result"` string was not valid JSON.
    #[error("Error parsing {platform} result: {detail}")]
    LegacyParse { platform: String, detail: String },

    /// Image data was present but cannot be displayed.
    #[error("Image data detected but appears to be invalid/internal ID: {preview}")]
    InvalidImage { preview: String },
}
