//! Pipeline stages for one submission.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! build ──▶ encode ──▶ transport ──▶ classify ──▶ platforms + image ──▶ render
//! (form)    (body)     (HTTP)        (shape)      (cards)                (result)
//! ```
//!
//! 1. [`build`]: validate form fields into a `SubmissionRequest`
//! 2. [`encode`]: JSON or multipart payload, by video presence
//! 3. [`transport`]: the single POST; status mapping; body parsing
//! 4. [`classify`]: sort each response item into unified / legacy /
//!    plain-text / unknown
//! 5. [`platforms`]: per-platform cards for the item's layout
//! 6. [`image`]: locate, validate and wrap the generated image
//! 7. [`render`]: drive 4–6 over every item and apply the fallback
//!
//! [`json`] holds the loose field accessors shared by stages 4–7.

pub mod build;
pub mod classify;
pub mod encode;
pub mod image;
pub mod json;
pub mod platforms;
pub mod render;
pub mod transport;
