//! Image extraction and validation.
//!
//! ## Strategies
//!
//! Three producers have put the generated image in three places. Exactly one
//! strategy is chosen per item, by the first matching primary condition, and
//! values are never merged across strategies:
//!
//! 1. **Unified**: `image` is an object with a `url`
//! 2. **Data object**: `data` is an object (`data.url` or `data.image.url`)
//! 3. **Legacy flat**: `image`, else `url`, else `data` when `mimeType` is set
//!
//! ## Validation
//!
//! Automation tools leak internal values into the image slot: binary-storage
//! ids (`filesystem-…`) and unevaluated template expressions (`{{ $json.x }}`).
//! Only strings that look like a URL, a data URI or a bare base64 payload are
//! displayed; anything else becomes an inline diagnostic so the producer can
//! be fixed.

use crate::error::FacetError;
use crate::output::{CardBody, CardKind, ImagePreview, ImageSource, InvalidImage, RenderedCard};
use crate::pipeline::json::{as_number, display, get, get_display, get_object};
use serde_json::Value;
use tracing::{debug, warn};

const DEFAULT_FILE_NAME: &str = "Generated Image";
const DEFAULT_FILE_TYPE: &str = "png";
const DEFAULT_FILE_SIZE: &str = "Unknown";
const UNIFIED_FILE_NAME: &str = "data.png";
const DEFAULT_MIME: &str = "image/png";

/// Bare base64 payloads are recognised by length alone.
const BASE64_MIN_LEN: usize = 100;
/// Characters kept in an invalid-value preview.
const PREVIEW_LEN: usize = 50;

/// Which strategy located the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    Unified,
    DataObject,
    LegacyFlat,
}

/// Image facts gathered from one item, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedImage {
    pub strategy: ImageStrategy,
    /// The candidate image value; `None` when the strategy found nothing.
    pub raw: Option<Value>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: String,
}

impl ExtractedImage {
    fn defaults(strategy: ImageStrategy) -> Self {
        Self {
            strategy,
            raw: None,
            file_name: DEFAULT_FILE_NAME.into(),
            file_type: DEFAULT_FILE_TYPE.into(),
            file_size: DEFAULT_FILE_SIZE.into(),
        }
    }
}

/// Locate the image of an item using the first matching strategy.
pub fn extract(item: &Value) -> ExtractedImage {
    if let Some(image) = get_object(item, "image").filter(|img| get(img, "url").is_some()) {
        return extract_unified(item, image);
    }
    if let Some(data) = get_object(item, "data") {
        return extract_data_object(data);
    }
    extract_legacy_flat(item)
}

fn extract_unified(item: &Value, image: &Value) -> ExtractedImage {
    let mut out = ExtractedImage::defaults(ImageStrategy::Unified);
    out.raw = get(image, "url").cloned();
    out.file_name = get_display(image, "filename").unwrap_or_else(|| UNIFIED_FILE_NAME.into());

    if let Some(dims) = get(image, "dimensions") {
        let side = |k| get_display(dims, k).unwrap_or_else(|| "?".into());
        out.file_size = format!("{}x{}", side("width"), side("height"));
    }
    if let Some(mb) = item
        .get("metadata")
        .and_then(|m| get(m, "fileSize"))
        .and_then(as_number)
    {
        out.file_size = format_megabytes(mb);
    }
    out
}

fn extract_data_object(data: &Value) -> ExtractedImage {
    let mut out = ExtractedImage::defaults(ImageStrategy::DataObject);
    let nested = get(data, "image");

    out.raw = get(data, "url")
        .or_else(|| nested.and_then(|img| get(img, "url")))
        .cloned();

    if let Some(img) = nested {
        if let Some(name) = get_display(img, "filename").or_else(|| get_display(img, "name")) {
            out.file_name = name;
        }
        if let Some(ext) = get_display(img, "extension") {
            out.file_type = ext;
        }
    }
    if let Some(bytes) = get(data, "size").and_then(as_number) {
        out.file_size = format_megabytes(bytes);
    }
    out
}

fn extract_legacy_flat(item: &Value) -> ExtractedImage {
    let mut out = ExtractedImage::defaults(ImageStrategy::LegacyFlat);

    let raw = get(item, "image")
        .or_else(|| get(item, "url"))
        .or_else(|| get(item, "mimeType").and(get(item, "data")));
    out.raw = raw.map(|v| match get(v, "url") {
        Some(url) if v.is_object() => url.clone(),
        _ => v.clone(),
    });

    if let Some(name) = get_display(item, "fileName") {
        out.file_name = name;
    }
    if let Some(kind) = get_display(item, "fileExtension").or_else(|| get_display(item, "mimeType")) {
        out.file_type = kind;
    }
    if let Some(size) = get_display(item, "fileSize") {
        out.file_size = size;
    }
    out
}

/// Build the image card for an item, if it has one.
///
/// Items with no image value and no `image/*` mime type produce nothing.
/// Invalid values still produce a card carrying the diagnostic, and are
/// recorded in `diagnostics`.
pub fn image_card(item: &Value, diagnostics: &mut Vec<FacetError>) -> Option<RenderedCard> {
    let extracted = extract(item);
    let mime = item.get("mimeType").and_then(Value::as_str).filter(|m| !m.is_empty());

    debug!(
        "Detected image data ({:?}): {}",
        extracted.strategy,
        extracted
            .raw
            .as_ref()
            .map(preview)
            .unwrap_or_else(|| "None".to_string())
    );

    let source = match &extracted.raw {
        Some(raw) => validate(raw, mime),
        None if mime.is_some_and(|m| m.starts_with("image/")) => ImageSource::Missing,
        None => return None,
    };

    if let ImageSource::Invalid(ref invalid) = source {
        warn!(
            "Image data detected but appears to be invalid/internal ID: {}",
            invalid.preview
        );
        diagnostics.push(FacetError::InvalidImage {
            preview: invalid.preview.clone(),
        });
    }

    Some(RenderedCard::new(
        CardKind::Image,
        CardBody::Image(ImagePreview {
            source,
            file_name: extracted.file_name,
            file_type: extracted.file_type,
            file_size: extracted.file_size,
        }),
    ))
}

/// Decide whether an image value can be displayed.
///
/// Displayable values are strings that are not storage ids, contain no
/// template braces, and are a URL, a data URI, or long enough to be bare
/// base64. Bare base64 is wrapped as a data URI using `mime` (default
/// `image/png`).
pub fn validate(raw: &Value, mime: Option<&str>) -> ImageSource {
    if let Value::String(s) = raw {
        if is_displayable(s) {
            let src = if s.starts_with("http") || s.starts_with("data:") {
                s.clone()
            } else {
                format!("data:{};base64,{}", mime.unwrap_or(DEFAULT_MIME), s)
            };
            return ImageSource::Render { src };
        }
    }

    let preview = preview(raw);
    let template_hint = preview.contains("{{") || preview.contains("$node");
    ImageSource::Invalid(InvalidImage {
        preview,
        template_hint,
    })
}

fn is_displayable(s: &str) -> bool {
    !s.starts_with("filesystem-")
        && !s.contains("{{")
        && (s.starts_with("http") || s.starts_with("data:") || s.chars().count() > BASE64_MIN_LEN)
}

/// Short form of a value for diagnostics: strings cut to 50 characters,
/// everything else pretty-printed.
pub fn preview(raw: &Value) -> String {
    match raw {
        Value::String(s) if s.chars().count() > PREVIEW_LEN => {
            format!("{}...", s.chars().take(PREVIEW_LEN).collect::<String>())
        }
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| display(other)),
    }
}

/// Bytes → `"<n> MB"` with two decimals.
pub fn format_megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}
