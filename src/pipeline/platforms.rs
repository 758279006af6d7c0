//! Platform card extraction for the unified and legacy layouts.
//!
//! A card is emitted only when the platform's record carries at least one
//! signal field. Unified records fill gaps with placeholders (`Pending` for
//! a missing id, `posted` for a missing status); legacy records show only
//! what they have.

use crate::error::FacetError;
use crate::output::{CardBody, CardField, CardKind, CardLink, PostSummary, RenderedCard};
use crate::pipeline::classify::{LEGACY_FACEBOOK_KEY, LEGACY_INSTAGRAM_KEY, LEGACY_X_KEY};
use crate::pipeline::json::{get, get_display, truthy};
use serde_json::{Map, Value};
use tracing::warn;

const PENDING: &str = "Pending";
const POSTED: &str = "posted";

const INSTAGRAM_KEYS: &[&str] = &["instagram"];
const X_KEYS: &[&str] = &["twitter", "x"];
const FACEBOOK_KEYS: &[&str] = &["facebook"];

// ── Unified layout ───────────────────────────────────────────────────────

/// Cards for an item in the unified layout, in Instagram, X, Facebook order.
///
/// An item classified unified through its `image` object may have no
/// `posts` at all; it simply yields no platform cards.
pub fn unified_cards(item: &Value) -> Vec<RenderedCard> {
    let Some(posts) = item.get("posts").and_then(Value::as_object) else {
        return Vec::new();
    };

    [
        lookup(posts, INSTAGRAM_KEYS).and_then(unified_instagram),
        lookup(posts, X_KEYS).and_then(unified_x),
        lookup(posts, FACEBOOK_KEYS).and_then(unified_facebook),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// First present record whose key matches a synonym, case-insensitively.
fn lookup<'a>(posts: &'a Map<String, Value>, synonyms: &[&str]) -> Option<&'a Value> {
    synonyms.iter().find_map(|syn| {
        posts
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case(syn) && truthy(v))
            .map(|(_, v)| v)
    })
}

fn unified_instagram(record: &Value) -> Option<RenderedCard> {
    let id = get_display(record, "id");
    let status = get_display(record, "status");
    if id.is_none() && status.is_none() {
        return None;
    }
    Some(post_card(
        CardKind::Instagram,
        PostSummary {
            fields: vec![
                CardField::new("Post ID", id.unwrap_or_else(|| PENDING.into())),
                CardField::new("Status", status.unwrap_or_else(|| POSTED.into())),
            ],
            ..Default::default()
        },
    ))
}

fn unified_x(record: &Value) -> Option<RenderedCard> {
    let text = get_display(record, "text");
    let id = get_display(record, "id");
    let status = get_display(record, "status");
    if text.is_none() && id.is_none() && status.is_none() {
        return None;
    }
    let mut fields = Vec::new();
    if let Some(id) = id {
        fields.push(CardField::new("ID", id));
    }
    if let Some(status) = status {
        fields.push(CardField::new("Status", status));
    }
    Some(post_card(
        CardKind::X,
        PostSummary {
            text,
            fields,
            link: None,
        },
    ))
}

fn unified_facebook(record: &Value) -> Option<RenderedCard> {
    let id = facebook_id(record);
    let status = get_display(record, "status");
    if id.is_none() && status.is_none() {
        return None;
    }
    let mut fields = vec![CardField::new(
        "Status",
        status.unwrap_or_else(|| POSTED.into()),
    )];
    if let Some(id) = id {
        fields.push(CardField::new("Post ID", id));
    }
    let link = get_display(record, "url").map(|url| CardLink {
        label: "View on Facebook".into(),
        url,
    });
    Some(post_card(
        CardKind::Facebook,
        PostSummary {
            text: None,
            fields,
            link,
        },
    ))
}

// ── Legacy layout ────────────────────────────────────────────────────────

/// Cards for an item in the legacy flat layout.
///
/// Each `"<Platform> Post Result"` value is a JSON document inside a string.
/// A value that fails to parse is logged, recorded in `diagnostics`, and
/// skipped; the other platforms still render.
pub fn legacy_cards(item: &Value, diagnostics: &mut Vec<FacetError>) -> Vec<RenderedCard> {
    let mut cards = Vec::new();

    if let Some(result) = parse_legacy(item, LEGACY_INSTAGRAM_KEY, "Instagram", diagnostics) {
        if let Some(id) = get_display(&result, "id") {
            cards.push(post_card(
                CardKind::Instagram,
                PostSummary {
                    fields: vec![CardField::new("Post ID", id)],
                    ..Default::default()
                },
            ));
        }
    }

    if let Some(result) = parse_legacy(item, LEGACY_X_KEY, "X", diagnostics) {
        if let Some(text) = get_display(&result, "text") {
            let fields = get_display(&result, "id")
                .map(|id| vec![CardField::new("ID", id)])
                .unwrap_or_default();
            cards.push(post_card(
                CardKind::X,
                PostSummary {
                    text: Some(text),
                    fields,
                    link: None,
                },
            ));
        }
    }

    if let Some(result) = parse_legacy(item, LEGACY_FACEBOOK_KEY, "Facebook", diagnostics) {
        if let Some(id) = facebook_id(&result) {
            cards.push(post_card(
                CardKind::Facebook,
                PostSummary {
                    fields: vec![CardField::new("Post ID", id)],
                    ..Default::default()
                },
            ));
        }
    }

    cards
}

/// Decode one legacy result. Objects are accepted as already decoded.
fn parse_legacy(
    item: &Value,
    key: &str,
    platform: &str,
    diagnostics: &mut Vec<FacetError>,
) -> Option<Value> {
    match get(item, key)? {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Error parsing {} result: {}", platform, e);
                diagnostics.push(FacetError::LegacyParse {
                    platform: platform.to_string(),
                    detail: e.to_string(),
                });
                None
            }
        },
        other => Some(other.clone()),
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn facebook_id(record: &Value) -> Option<String> {
    get_display(record, "post_id").or_else(|| get_display(record, "id"))
}

fn post_card(kind: CardKind, summary: PostSummary) -> RenderedCard {
    RenderedCard::new(kind, CardBody::Post(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(card: &RenderedCard) -> &PostSummary {
        match &card.body {
            CardBody::Post(s) => s,
            other => panic!("expected post body, got {other:?}"),
        }
    }

    fn field<'a>(card: &'a RenderedCard, label: &str) -> Option<&'a str> {
        summary(card)
            .fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    #[test]
    fn instagram_placeholders() {
        let cards = unified_cards(&json!({"posts": {"instagram": {"id": "abc"}}}));
        assert_eq!(cards.len(), 1);
        assert_eq!(field(&cards[0], "Post ID"), Some("abc"));
        assert_eq!(field(&cards[0], "Status"), Some("posted"));

        let cards = unified_cards(&json!({"posts": {"Instagram": {"status": "queued"}}}));
        assert_eq!(field(&cards[0], "Post ID"), Some("Pending"));
        assert_eq!(field(&cards[0], "Status"), Some("queued"));
    }

    #[test]
    fn record_without_signal_is_skipped() {
        let cards = unified_cards(&json!({"posts": {"instagram": {"foo": 1}, "facebook": {}}}));
        assert!(cards.is_empty());
    }

    #[test]
    fn x_synonyms_are_case_insensitive() {
        for key in ["twitter", "Twitter", "x", "X", "TWITTER"] {
            let item = json!({"posts": {key: {"text": "shipped"}}});
            let cards = unified_cards(&item);
            assert_eq!(cards.len(), 1, "key {key}");
            assert_eq!(cards[0].kind, CardKind::X);
            assert_eq!(summary(&cards[0]).text.as_deref(), Some("shipped"));
        }
    }

    #[test]
    fn x_optional_rows() {
        let cards = unified_cards(&json!({"posts": {"x": {"id": 1789, "status": "ok"}}}));
        let s = summary(&cards[0]);
        assert!(s.text.is_none());
        assert_eq!(field(&cards[0], "ID"), Some("1789"));
        assert_eq!(field(&cards[0], "Status"), Some("ok"));
    }

    #[test]
    fn empty_synonym_falls_through() {
        let item = json!({"posts": {"twitter": null, "x": {"id": "7"}}});
        let cards = unified_cards(&item);
        assert_eq!(field(&cards[0], "ID"), Some("7"));
    }

    #[test]
    fn facebook_status_first_and_link() {
        let item = json!({"posts": {"facebook": {"post_id": "p1", "url": "https://fb.com/p1"}}});
        let cards = unified_cards(&item);
        let s = summary(&cards[0]);
        assert_eq!(s.fields[0], CardField::new("Status", "posted"));
        assert_eq!(s.fields[1], CardField::new("Post ID", "p1"));
        assert_eq!(s.link.as_ref().unwrap().url, "https://fb.com/p1");
    }

    #[test]
    fn unified_order_is_fixed() {
        let item = json!({"posts": {
            "facebook": {"id": "f"},
            "x": {"text": "t"},
            "instagram": {"id": "i"}
        }});
        let kinds: Vec<_> = unified_cards(&item).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CardKind::Instagram, CardKind::X, CardKind::Facebook]);
    }

    #[test]
    fn missing_posts_yields_nothing() {
        assert!(unified_cards(&json!({"image": {"url": "https://x"}})).is_empty());
        assert!(unified_cards(&json!({"posts": "oops"})).is_empty());
    }

    #[test]
    fn legacy_all_three() {
        let item = json!({
            "Instagram Post Result": "{\"id\":\"ig1\"}",
            "X Post Result": "{\"text\":\"hello\",\"id\":\"x1\"}",
            "Facebook Post Result": "{\"post_id\":\"fb1\"}"
        });
        let mut diags = Vec::new();
        let cards = legacy_cards(&item, &mut diags);
        assert!(diags.is_empty());
        assert_eq!(cards.len(), 3);
        assert_eq!(field(&cards[0], "Post ID"), Some("ig1"));
        assert_eq!(summary(&cards[1]).text.as_deref(), Some("hello"));
        assert_eq!(field(&cards[1], "ID"), Some("x1"));
        assert_eq!(field(&cards[2], "Post ID"), Some("fb1"));
    }

    #[test]
    fn legacy_parse_failure_is_isolated() {
        let item = json!({
            "Instagram Post Result": "{not json",
            "X Post Result": "{\"text\":\"still here\"}"
        });
        let mut diags = Vec::new();
        let cards = legacy_cards(&item, &mut diags);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::X);
        assert_eq!(diags.len(), 1);
        assert!(matches!(&diags[0], FacetError::LegacyParse { platform, .. } if platform == "Instagram"));
    }

    #[test]
    fn legacy_signal_fields_are_required() {
        let item = json!({
            "Instagram Post Result": "{\"status\":\"ok\"}",
            "X Post Result": "{\"id\":\"only-id\"}",
            "Facebook Post Result": "{\"status\":\"ok\"}"
        });
        let mut diags = Vec::new();
        assert!(legacy_cards(&item, &mut diags).is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn legacy_object_value_is_accepted() {
        let item = json!({"Facebook Post Result": {"id": "fb2"}});
        let mut diags = Vec::new();
        let cards = legacy_cards(&item, &mut diags);
        assert_eq!(field(&cards[0], "Post ID"), Some("fb2"));
    }
}
