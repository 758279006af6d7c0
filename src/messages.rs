//! User-facing copy: status messages, loader text and diagnostic hints.
//!
//! Every string a person reads in the status region, on the submit button or
//! in the loader lives here.

/// Default webhook the form posts to.
pub const DEFAULT_ENDPOINT: &str = "https://n8n.intelligens.app/webhook/content";

/// Status after a successful exchange.
pub const SUCCESS: &str = "Content generated successfully!";

/// Shown for any transport-level failure (DNS, refused connection, TLS).
pub const NETWORK_ERROR: &str =
    "Network error: Could not reach the server. Please check your internet or VPN.";

/// Shown for HTTP 404.
pub const NOT_FOUND: &str = "Webhook URL not found. Please check if your n8n workflow is active.";

/// Shown for HTTP 413.
pub const PAYLOAD_TOO_LARGE: &str =
    "Video file is too large for the server to process even after encoding.";

/// Prefix for every other non-2xx status.
pub const GENERIC_FAILURE: &str = "Failed to generate content.";

// ── Button & loader ──────────────────────────────────────────────────────

pub const BUTTON_IDLE: &str = "Generate Content";
pub const BUTTON_SUBMITTING: &str = "Creating Magic...";
pub const BUTTON_SENDING: &str = "Sending to Server...";

pub const LOADER_VIDEO: &str = "Uploading & Processing Video...";
pub const LOADER_TEXT: &str = "Generating Your Content...";

// ── Image diagnostics ────────────────────────────────────────────────────

/// Heading of the inline block shown for unusable image data.
pub const IMAGE_UNAVAILABLE: &str = "Image preview unavailable. Invalid data detected:";

/// Extra hint when the image payload still contains n8n template syntax.
pub const TEMPLATE_HINT: &str = "It looks like your n8n output is returning raw expressions \
(like {{...}}). Please ensure your n8n \"Respond to Webhook\" node is evaluating these \
expressions to actual values.";

/// Headline of the YouTube upload card.
pub const UPLOADED: &str = "Uploaded Successfully";

/// Status-specific message for a non-2xx webhook response.
pub fn server_error_message(status: u16) -> String {
    match status {
        413 => PAYLOAD_TOO_LARGE.to_string(),
        404 => NOT_FOUND.to_string(),
        other => format!("{GENERIC_FAILURE} (Status: {other})"),
    }
}
