//! Saving generated images to disk.
//!
//! Only `data:` URIs carry the image itself; they are base64-decoded and
//! written with an extension sniffed from the bytes. Remote `http(s)` images
//! are reported back as links and not downloaded.

use crate::error::PostforgeError;
use crate::output::{CardBody, ImageSource, RenderResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `data:<mime>;base64,<payload>`
static DATA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:(?P<mime>[\w.+-]+/[\w.+-]+)?(?:;[\w-]+=[^;,]*)*;base64,(?P<data>.*)$")
        .expect("valid regex")
});

/// What happened to one image card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedImage {
    /// Decoded and written.
    Written { path: PathBuf, bytes: usize },
    /// A remote image; left where it is.
    Remote { url: String },
    /// The data URI could not be decoded.
    Skipped { reason: String },
}

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Decode a base64 `data:` URI. `None` for anything else.
pub fn decode_data_uri(src: &str) -> Option<Result<DataUri, base64::DecodeError>> {
    let caps = DATA_URI.captures(src)?;
    let mime = caps.name("mime").map(|m| m.as_str().to_string());
    let payload: String = caps
        .name("data")
        .map(|m| m.as_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    Some(STANDARD.decode(payload).map(|bytes| DataUri { mime, bytes }))
}

/// File extension for decoded image bytes.
///
/// Sniffs the content first, then falls back to the declared mime subtype,
/// then to `png`.
pub fn extension_for(bytes: &[u8], mime: Option<&str>) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        if let Some(ext) = format.extensions_str().first() {
            return (*ext).to_string();
        }
    }
    mime.and_then(|m| m.strip_prefix("image/"))
        .map(|sub| sub.trim_end_matches("+xml").to_string())
        .filter(|sub| !sub.is_empty())
        .unwrap_or_else(|| "png".to_string())
}

/// Write every renderable image of `result` into `dir`.
///
/// Files are named `image-<n>.<ext>`, where `n` counts renderable image
/// cards from 1. Invalid and missing images are not counted. Each file is written to a temp file in `dir` and renamed
/// into place.
pub fn save_images(result: &RenderResult, dir: impl AsRef<Path>) -> Result<Vec<SavedImage>, PostforgeError> {
    let dir = dir.as_ref();
    let mut saved = Vec::new();

    let sources = result.cards().iter().filter_map(|card| match &card.body {
        CardBody::Image(preview) => match &preview.source {
            ImageSource::Render { src } => Some(src.as_str()),
            _ => None,
        },
        _ => None,
    });

    for (n, src) in sources.enumerate() {
        if !src.starts_with("data:") {
            debug!("Image {} is remote: {}", n + 1, src);
            saved.push(SavedImage::Remote {
                url: src.to_string(),
            });
            continue;
        }

        let decoded = match decode_data_uri(src) {
            Some(Ok(d)) if !d.bytes.is_empty() => d,
            Some(Ok(_)) => {
                saved.push(SavedImage::Skipped {
                    reason: "empty image payload".into(),
                });
                continue;
            }
            Some(Err(e)) => {
                warn!("Could not decode image {}: {}", n + 1, e);
                saved.push(SavedImage::Skipped {
                    reason: format!("invalid base64: {e}"),
                });
                continue;
            }
            None => {
                saved.push(SavedImage::Skipped {
                    reason: "not a base64 data URI".into(),
                });
                continue;
            }
        };

        let ext = extension_for(&decoded.bytes, decoded.mime.as_deref());
        let path = dir.join(format!("image-{}.{}", n + 1, ext));
        write_atomic(&path, &decoded.bytes)?;
        info!("Saved image to {}", path.display());
        saved.push(SavedImage::Written {
            path,
            bytes: decoded.bytes.len(),
        });
    }

    Ok(saved)
}

/// Write `bytes` to `path` via a temp file in the same directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PostforgeError> {
    let fail = |source: std::io::Error| PostforgeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
