//! Structured render output.
//!
//! The normalizer emits these values and nothing else. They carry no markup:
//! [`crate::present`] turns them into terminal text or HTML, and `serde`
//! turns them into JSON for `--json`.

use serde::Serialize;

/// What a response rendered to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RenderResult {
    /// One or more result cards, in emission order.
    Cards(Vec<RenderedCard>),
    /// No cards; the first item's `text` shown verbatim.
    PlainText(String),
    /// No cards and no text; the whole response pretty-printed.
    RawDump(String),
}

impl RenderResult {
    /// The cards, or an empty slice for the fallback variants.
    pub fn cards(&self) -> &[RenderedCard] {
        match self {
            RenderResult::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, RenderResult::Cards(_))
    }
}

/// Which facet a card represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Instagram,
    X,
    Facebook,
    Image,
    Youtube,
}

impl CardKind {
    /// Lowercase tag used in CSS class names and JSON.
    pub fn tag(self) -> &'static str {
        match self {
            CardKind::Instagram => "instagram",
            CardKind::X => "x",
            CardKind::Facebook => "facebook",
            CardKind::Image => "image",
            CardKind::Youtube => "youtube",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CardKind::Instagram => "📸",
            CardKind::X => "🐦",
            CardKind::Facebook => "📘",
            CardKind::Image => "🖼️",
            CardKind::Youtube => "✨",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CardKind::Instagram => "Instagram",
            CardKind::X => "X (Twitter)",
            CardKind::Facebook => "Facebook",
            CardKind::Image => "Generated Image",
            CardKind::Youtube => "YouTube",
        }
    }
}

/// One self-contained result unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCard {
    pub kind: CardKind,
    pub icon: String,
    pub title: String,
    pub body: CardBody,
}

impl RenderedCard {
    pub fn new(kind: CardKind, body: CardBody) -> Self {
        Self {
            kind,
            icon: kind.icon().to_string(),
            title: kind.title().to_string(),
            body,
        }
    }
}

/// Card content, by card family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardBody {
    /// A social post result.
    Post(PostSummary),
    /// A generated image preview.
    Image(ImagePreview),
    /// A completed upload with its public link.
    Upload { headline: String, url: String },
}

/// Body of a platform card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// Post text (X only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Labelled rows, in display order.
    pub fields: Vec<CardField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CardLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

impl CardField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLink {
    pub label: String,
    pub url: String,
}

/// Body of the image card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    pub source: ImageSource,
    pub file_name: String,
    pub file_type: String,
    pub file_size: String,
}

/// What can be displayed for the image itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageSource {
    /// A displayable `http(s)` URL or `data:` URI.
    Render { src: String },
    /// Image data was present but unusable.
    Invalid(InvalidImage),
    /// The item declared an image mime type but carried no data.
    Missing,
}

/// Diagnostic for unusable image data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidImage {
    /// Truncated string or pretty-printed JSON of the offending value.
    pub preview: String,
    /// Set when the preview looks like an unevaluated template expression.
    pub template_hint: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_new_uses_kind_defaults() {
        let card = RenderedCard::new(CardKind::X, CardBody::Post(PostSummary::default()));
        assert_eq!(card.title, "X (Twitter)");
        assert_eq!(card.icon, "🐦");
        assert_eq!(card.kind.tag(), "x");
    }

    #[test]
    fn fallback_has_no_cards() {
        let r = RenderResult::PlainText("hello".into());
        assert!(r.is_fallback());
        assert!(r.cards().is_empty());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let r = RenderResult::PlainText("hi".into());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["kind"], "plain_text");
        assert_eq!(v["value"], "hi");
    }
}
