//! Response rendering: raw webhook JSON → [`RenderResult`].
//!
//! The renderer is stateless: every call starts from an empty card list.
//! Per item it runs, in order:
//!
//! 1. the YouTube short-circuit (`youtube_url` → upload card),
//! 2. platform extraction for the item's [`ItemShape`],
//! 3. image extraction, regardless of shape.
//!
//! When no item produced a card, the first item's `text` is shown verbatim,
//! and failing that the whole response is pretty-printed. Cards and the
//! fallback are never shown together.

use crate::error::{FacetError, PostforgeError};
use crate::messages;
use crate::output::{CardBody, CardKind, RenderResult, RenderedCard};
use crate::pipeline::classify::{self, ItemShape, ResponseItem};
use crate::pipeline::json::get_display;
use crate::pipeline::{image, platforms, transport};
use serde_json::Value;
use tracing::debug;

/// A render result together with the facet errors met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub result: RenderResult,
    pub diagnostics: Vec<FacetError>,
}

/// Render a parsed response.
pub fn render(response: &Value) -> RenderResult {
    render_detailed(response).result
}

/// Parse and render a raw response body.
///
/// Fails only for an empty or non-JSON body.
pub fn render_body(body: &str) -> Result<RenderResult, PostforgeError> {
    let response = transport::parse_body(body)?;
    Ok(render(&response))
}

/// Render a parsed response, keeping per-facet diagnostics.
pub fn render_detailed(response: &Value) -> Rendered {
    let items = classify::items(response);
    let mut cards = Vec::new();
    let mut diagnostics = Vec::new();

    for item in &items {
        debug!("Processing item classified as {:?}", item.shape);
        render_item(item, &mut cards, &mut diagnostics);
    }

    let result = if !cards.is_empty() {
        RenderResult::Cards(cards)
    } else if let Some(text) = items.first().and_then(|i| get_display(i.value, "text")) {
        RenderResult::PlainText(text)
    } else {
        RenderResult::RawDump(pretty(response))
    };

    Rendered {
        result,
        diagnostics,
    }
}

fn render_item(
    item: &ResponseItem<'_>,
    cards: &mut Vec<RenderedCard>,
    diagnostics: &mut Vec<FacetError>,
) {
    if let Some(url) = get_display(item.value, "youtube_url") {
        cards.push(RenderedCard::new(
            CardKind::Youtube,
            CardBody::Upload {
                headline: messages::UPLOADED.to_string(),
                url,
            },
        ));
    }

    match item.shape {
        ItemShape::Unified => cards.extend(platforms::unified_cards(item.value)),
        ItemShape::Legacy | ItemShape::PlainText | ItemShape::Unknown => {
            cards.extend(platforms::legacy_cards(item.value, diagnostics))
        }
    }

    if item.value.is_object() {
        cards.extend(image::image_card(item.value, diagnostics));
    }
}

/// Two-space indented JSON, keys in response order.
fn pretty(response: &Value) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}
