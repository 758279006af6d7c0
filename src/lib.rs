//! # postforge
//!
//! Submit content briefs to a social-media automation webhook and normalize
//! whatever it answers into a uniform list of result cards.
//!
//! ## Why this crate?
//!
//! The webhook behind the form is an n8n workflow whose output shape drifts
//! between versions: a unified `posts` object, older per-platform
//! `"<Platform> Post Result"` strings holding JSON, images in three
//! different places, sometimes just `text`. This crate accepts all of them,
//! degrades per facet instead of failing the whole response, and hands back
//! structured cards that any front end can draw.
//!
//! ## Pipeline Overview
//!
//! ```text
//! form fields
//!  │
//!  ├─ 1. Build      validate topic / video / platforms
//!  ├─ 2. Encode     JSON, or multipart when a video is attached
//!  ├─ 3. Transport  one POST, status → message mapping
//!  ├─ 4. Classify   unified / legacy / plain-text / unknown per item
//!  ├─ 5. Extract    platform cards, YouTube card, image card
//!  └─ 6. Render     cards, or text / raw-JSON fallback
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use postforge::{Client, ClientConfig, FormFields, Platform, Theme};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::default())?;
//!     let outcome = client
//!         .submit(FormFields {
//!             topic: Some("Spring collection launch".into()),
//!             keywords: Some("fashion, spring".into()),
//!             platforms: vec![Platform::Instagram, Platform::Facebook],
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{}", postforge::present::to_text(outcome.result(), Theme::Light, false));
//!     Ok(())
//! }
//! ```
//!
//! Offline rendering of a saved answer needs no client:
//!
//! ```rust
//! let result = postforge::render_body(r#"{"text": "Here is your post"}"#).unwrap();
//! assert_eq!(result, postforge::RenderResult::PlainText("Here is your post".into()));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `postforge` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ```toml
//! postforge = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod messages;
pub mod output;
pub mod pipeline;
pub mod preferences;
pub mod present;
pub mod progress;
pub mod state;
pub mod submit;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{FacetError, PostforgeError, ValidationError};
pub use output::{
    CardBody, CardField, CardKind, CardLink, ImagePreview, ImageSource, InvalidImage, PostSummary,
    RenderResult, RenderedCard,
};
pub use pipeline::build::{build, FormFields, Platform, SubmissionRequest, VideoAttachment};
pub use pipeline::encode::{encode, BodyEncoding, OutboundPayload};
pub use pipeline::render::{render, render_body, render_detailed, Rendered};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, Theme,
};
pub use progress::{NoopObserver, SubmissionObserver};
pub use state::{view, Tone, UiState, UiView};
pub use submit::{submit_sync, Client, SubmissionOutcome};
