//! Response-shape classification.
//!
//! The webhook has answered in at least three layouts over time. Rather than
//! probing fields ad hoc while rendering, each item is classified once into
//! an [`ItemShape`] and the renderer dispatches on it.
//!
//! Classification order (first match wins):
//!
//! 1. [`ItemShape::Unified`]: `posts` present, or `image` is an object and
//!    there is no top-level `mimeType`
//! 2. [`ItemShape::Legacy`]: a `"<Platform> Post Result"` key or a flat
//!    image field (`image`, `url`, `data`, `mimeType`, `fileName`)
//! 3. [`ItemShape::PlainText`]: a non-empty `text`
//! 4. [`ItemShape::Unknown`]: anything else, including non-objects

use crate::pipeline::json::{get, truthy};
use serde_json::Value;

/// Keys of the legacy flat layout holding JSON-encoded post results.
pub const LEGACY_INSTAGRAM_KEY: &str = "Instagram Post Result";
pub const LEGACY_X_KEY: &str = "X Post Result";
pub const LEGACY_FACEBOOK_KEY: &str = "Facebook Post Result";

const LEGACY_POST_KEYS: [&str; 3] = [LEGACY_INSTAGRAM_KEY, LEGACY_X_KEY, LEGACY_FACEBOOK_KEY];
const LEGACY_IMAGE_KEYS: [&str; 5] = ["image", "url", "data", "mimeType", "fileName"];

/// The layout of one response item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// Current layout: `posts` map and structured `image` object.
    Unified,
    /// Older layout: flat keys with JSON-encoded strings.
    Legacy,
    /// Nothing but a text message.
    PlainText,
    /// Nothing recognisable.
    Unknown,
}

/// A response item paired with its classified shape.
#[derive(Debug, Clone, Copy)]
pub struct ResponseItem<'a> {
    pub shape: ItemShape,
    pub value: &'a Value,
}

impl<'a> ResponseItem<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            shape: classify(value),
            value,
        }
    }
}

/// Normalise a response envelope to a sequence of items.
pub fn items(response: &Value) -> Vec<ResponseItem<'_>> {
    match response {
        Value::Array(values) => values.iter().map(ResponseItem::new).collect(),
        single => vec![ResponseItem::new(single)],
    }
}

/// Classify one item.
pub fn classify(item: &Value) -> ItemShape {
    if !item.is_object() {
        return ItemShape::Unknown;
    }

    let image_object = item.get("image").is_some_and(Value::is_object);
    let has_mime = item.get("mimeType").is_some_and(truthy);
    if get(item, "posts").is_some() || (image_object && !has_mime) {
        return ItemShape::Unified;
    }

    let any_present = |keys: &[&str]| keys.iter().any(|k| get(item, k).is_some());
    if any_present(&LEGACY_POST_KEYS[..]) || any_present(&LEGACY_IMAGE_KEYS[..]) {
        return ItemShape::Legacy;
    }

    if get(item, "text").is_some() {
        return ItemShape::PlainText;
    }

    ItemShape::Unknown
}
