//! Submission building: raw form fields → validated [`SubmissionRequest`].
//!
//! A `SubmissionRequest` can only be obtained from [`build`], so any request
//! that reaches the transport already satisfies the form's preconditions:
//! there is a topic or a video, a platform is selected when there is no
//! video, and the video fits under [`MAX_VIDEO_BYTES`].

use crate::error::{PostforgeError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Upload limit for the video part: 100 MiB.
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// A target platform selectable on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    #[serde(alias = "twitter")]
    X,
    Facebook,
}

impl Platform {
    /// Value sent in the `platforms` field.
    pub fn form_value(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::X => "twitter",
            Platform::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_value())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "twitter" | "x" => Ok(Platform::X),
            "facebook" | "fb" => Ok(Platform::Facebook),
            other => Err(format!(
                "unknown platform '{other}' (expected instagram, twitter/x or facebook)"
            )),
        }
    }
}

/// A video attached to the form.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for VideoAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoAttachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl VideoAttachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a video from disk, guessing its mime type from the extension.
    ///
    /// The size limit is checked against file metadata before reading, so an
    /// oversized file is rejected without loading it into memory.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PostforgeError> {
        let path = path.as_ref();
        let read_err = |source| PostforgeError::VideoRead {
            path: path.to_path_buf(),
            source,
        };

        let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
        if meta.len() > MAX_VIDEO_BYTES {
            return Err(ValidationError::FileTooLarge {
                size: meta.len(),
                limit: MAX_VIDEO_BYTES,
            }
            .into());
        }

        let bytes = tokio::fs::read(path).await.map_err(read_err)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let mime_type = guess_video_mime(&file_name).to_string();

        debug!("Loaded video {} ({} bytes, {})", file_name, bytes.len(), mime_type);
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in MB with two decimals, as logged before sending.
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// Map a video file extension to its mime type.
pub fn guess_video_mime(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Raw form input, before validation.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub topic: Option<String>,
    pub keywords: Option<String>,
    pub link: Option<String>,
    pub platforms: Vec<Platform>,
    pub video: Option<VideoAttachment>,
}

/// A validated submission.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    topic: Option<String>,
    keywords: Option<String>,
    link: Option<String>,
    platforms: Vec<Platform>,
    video: Option<VideoAttachment>,
}

impl SubmissionRequest {
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn video(&self) -> Option<&VideoAttachment> {
        self.video.as_ref()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

/// Validate form fields into a [`SubmissionRequest`].
///
/// Checks run in the same order the form shows them: missing content, then
/// missing platform, then file size. Blank text fields and empty videos are
/// treated as absent.
pub fn build(fields: FormFields) -> Result<SubmissionRequest, ValidationError> {
    let topic = non_blank(fields.topic);
    let keywords = non_blank(fields.keywords);
    let link = non_blank(fields.link);
    let video = fields.video.filter(|v| !v.bytes.is_empty());

    if topic.is_none() && video.is_none() {
        return Err(ValidationError::MissingContent);
    }
    if video.is_none() && fields.platforms.is_empty() {
        return Err(ValidationError::MissingPlatform);
    }
    if let Some(ref v) = video {
        if v.size() > MAX_VIDEO_BYTES {
            return Err(ValidationError::FileTooLarge {
                size: v.size(),
                limit: MAX_VIDEO_BYTES,
            });
        }
    }

    Ok(SubmissionRequest {
        topic,
        keywords,
        link,
        platforms: fields.platforms,
        video,
    })
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
