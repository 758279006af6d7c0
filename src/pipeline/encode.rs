//! Payload encoding: [`SubmissionRequest`] → [`OutboundPayload`].
//!
//! The webhook accepts two encodings. A request carrying a video must be
//! multipart because the video travels as a binary part; anything else goes
//! as a small JSON document. [`BodyEncoding::Multipart`] forces multipart for
//! every request, for webhooks that only parse form data.
//!
//! The payload is described here as plain data and only turned into a
//! `reqwest` body by [`OutboundPayload::into_form`], which lets reqwest pick
//! the multipart boundary and content type.

use crate::pipeline::build::SubmissionRequest;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// How to encode requests that carry no video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyEncoding {
    /// Multipart with a video, JSON without one. (default)
    #[default]
    ByContent,
    /// Always multipart.
    Multipart,
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => *name,
        }
    }
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl OutboundPayload {
    pub fn is_multipart(&self) -> bool {
        matches!(self, OutboundPayload::Multipart(_))
    }

    /// Text values of every part named `name`, in order.
    pub fn text_values(&self, name: &str) -> Vec<&str> {
        match self {
            OutboundPayload::Multipart(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    FormPart::Text { name: n, value } if *n == name => Some(value.as_str()),
                    _ => None,
                })
                .collect(),
            OutboundPayload::Json(_) => Vec::new(),
        }
    }

    /// Build the reqwest multipart form. `None` for JSON payloads.
    pub fn into_form(self) -> Result<Option<reqwest::multipart::Form>, reqwest::Error> {
        let OutboundPayload::Multipart(parts) = self else {
            return Ok(None);
        };
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(Some(form))
    }
}

/// Encode a validated request.
pub fn encode(request: &SubmissionRequest, encoding: BodyEncoding) -> OutboundPayload {
    let multipart = request.has_video() || encoding == BodyEncoding::Multipart;

    let payload = if multipart {
        OutboundPayload::Multipart(multipart_parts(request))
    } else {
        OutboundPayload::Json(json!({
            "topic": request.topic().unwrap_or_default(),
            "keywords": request.keywords().unwrap_or_default(),
            "link": request.link().unwrap_or_default(),
            "platforms": request
                .platforms()
                .iter()
                .map(|p| p.form_value())
                .collect::<Vec<_>>(),
        }))
    };

    debug!(
        "Encoded submission as {} (topic: {}, platforms: {:?}, video: {})",
        if payload.is_multipart() { "multipart" } else { "json" },
        request.topic().unwrap_or("(not provided)"),
        request.platforms(),
        request
            .video()
            .map(|v| format!("{} {} MB {}", v.file_name, v.size_mb(), v.mime_type))
            .unwrap_or_else(|| "(not provided)".to_string()),
    );

    payload
}

fn multipart_parts(request: &SubmissionRequest) -> Vec<FormPart> {
    let mut parts = Vec::new();
    let text_fields = [
        ("topic", request.topic()),
        ("keywords", request.keywords()),
        ("link", request.link()),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            parts.push(FormPart::Text {
                name,
                value: value.to_string(),
            });
        }
    }
    for platform in request.platforms() {
        parts.push(FormPart::Text {
            name: "platforms",
            value: platform.form_value().to_string(),
        });
    }
    if let Some(video) = request.video() {
        parts.push(FormPart::File {
            name: "video",
            file_name: video.file_name.clone(),
            mime_type: video.mime_type.clone(),
            bytes: video.bytes.clone(),
        });
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build::{build, FormFields, Platform, VideoAttachment};

    fn request(video: bool, platforms: Vec<Platform>) -> SubmissionRequest {
        build(FormFields {
            topic: Some("Launch day".into()),
            keywords: Some("rust, release".into()),
            link: None,
            platforms,
            video: video.then(|| VideoAttachment::new("clip.mp4", "video/mp4", vec![9; 16])),
        })
        .unwrap()
    }

    #[test]
    fn json_without_video() {
        let payload = encode(
            &request(false, vec![Platform::Instagram, Platform::X]),
            BodyEncoding::ByContent,
        );
        let OutboundPayload::Json(body) = payload else {
            panic!("expected JSON payload");
        };
        assert_eq!(body["topic"], "Launch day");
        assert_eq!(body["keywords"], "rust, release");
        assert_eq!(body["link"], "");
        assert_eq!(body["platforms"], json!(["instagram", "twitter"]));
    }

    #[test]
    fn multipart_with_video() {
        let payload = encode(&request(true, vec![Platform::Facebook]), BodyEncoding::ByContent);
        assert!(payload.is_multipart());
        assert_eq!(payload.text_values("topic"), vec!["Launch day"]);
        assert_eq!(payload.text_values("platforms"), vec!["facebook"]);
        let OutboundPayload::Multipart(parts) = payload else {
            unreachable!()
        };
        let video = parts.iter().find(|p| p.name() == "video").unwrap();
        assert!(matches!(video, FormPart::File { file_name, bytes, .. }
            if file_name == "clip.mp4" && bytes.len() == 16));
        assert!(parts.iter().all(|p| p.name() != "link"));
    }

    #[test]
    fn platforms_repeat_per_selection() {
        let payload = encode(
            &request(false, vec![Platform::Instagram, Platform::X, Platform::Facebook]),
            BodyEncoding::Multipart,
        );
        assert_eq!(
            payload.text_values("platforms"),
            vec!["instagram", "twitter", "facebook"]
        );
    }

    #[test]
    fn json_payload_has_no_form() {
        let payload = encode(&request(false, vec![Platform::X]), BodyEncoding::ByContent);
        assert!(payload.into_form().unwrap().is_none());
    }

    #[test]
    fn multipart_payload_builds_form() {
        let payload = encode(&request(true, vec![]), BodyEncoding::ByContent);
        assert!(payload.into_form().unwrap().is_some());
    }
}
