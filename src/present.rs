//! Presentation adapters for a [`RenderResult`].
//!
//! Two views, both pure functions of the result and the theme:
//!
//! * [`to_text`]: terminal blocks, optionally coloured with ANSI SGR codes
//! * [`to_html`]: a standalone page using the form's card markup
//!
//! Every value interpolated into HTML goes through [`escape_html`].

use crate::messages;
use crate::output::{CardBody, ImagePreview, ImageSource, PostSummary, RenderResult, RenderedCard};
use crate::preferences::Theme;
use std::fmt::Write as _;

/// Longest `data:` URI shown verbatim in terminal output.
const MAX_INLINE_SRC: usize = 80;

// ── Terminal ─────────────────────────────────────────────────────────────

/// ANSI palette for one theme.
struct Palette {
    title: &'static str,
    label: &'static str,
    link: &'static str,
    error: &'static str,
    reset: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme, color: bool) -> Self {
        if !color {
            return Self {
                title: "",
                label: "",
                link: "",
                error: "",
                reset: "",
            };
        }
        match theme {
            Theme::Light => Self {
                title: "\x1b[1;34m",
                label: "\x1b[1m",
                link: "\x1b[4;36m",
                error: "\x1b[31m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                title: "\x1b[1;96m",
                label: "\x1b[1;97m",
                link: "\x1b[4;93m",
                error: "\x1b[91m",
                reset: "\x1b[0m",
            },
        }
    }
}

/// Terminal view: one block per card, blank line between blocks.
///
/// Fallback variants are returned verbatim.
pub fn to_text(result: &RenderResult, theme: Theme, color: bool) -> String {
    let cards = match result {
        RenderResult::Cards(cards) => cards,
        RenderResult::PlainText(text) | RenderResult::RawDump(text) => return text.clone(),
    };
    let p = Palette::for_theme(theme, color);
    cards
        .iter()
        .map(|card| card_text(card, &p))
        .collect::<Vec<_>>()
        .join("\n")
}

fn card_text(card: &RenderedCard, p: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{} {}{}", p.title, card.icon, card.title, p.reset);
    match &card.body {
        CardBody::Post(post) => post_text(&mut out, post, p),
        CardBody::Image(preview) => image_text(&mut out, preview, p),
        CardBody::Upload { headline, url } => {
            let _ = writeln!(out, "  {headline}");
            let _ = writeln!(out, "  {}{url}{}", p.link, p.reset);
        }
    }
    out
}

fn post_text(out: &mut String, post: &PostSummary, p: &Palette) {
    if let Some(ref text) = post.text {
        for line in text.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    for field in &post.fields {
        let _ = writeln!(out, "  {}{}:{} {}", p.label, field.label, p.reset, field.value);
    }
    if let Some(ref link) = post.link {
        let _ = writeln!(out, "  {} ↗ {}{}{}", link.label, p.link, link.url, p.reset);
    }
}

fn image_text(out: &mut String, preview: &ImagePreview, p: &Palette) {
    match &preview.source {
        ImageSource::Render { src } => {
            let _ = writeln!(out, "  {}{}{}", p.link, shorten_src(src), p.reset);
        }
        ImageSource::Invalid(invalid) => {
            let _ = writeln!(out, "  {}⚠️ {}{}", p.error, messages::IMAGE_UNAVAILABLE, p.reset);
            for line in invalid.preview.lines() {
                let _ = writeln!(out, "    {line}");
            }
            if invalid.template_hint {
                let _ = writeln!(out, "  {}Hint: {}{}", p.error, messages::TEMPLATE_HINT, p.reset);
            }
        }
        ImageSource::Missing => {}
    }
    let _ = writeln!(out, "  {}Name:{} {}", p.label, p.reset, preview.file_name);
    let _ = writeln!(out, "  {}Type:{} {}", p.label, p.reset, preview.file_type);
    let _ = writeln!(out, "  {}Size:{} {}", p.label, p.reset, preview.file_size);
}

/// Data URIs are cut after the media type and a few payload chars.
fn shorten_src(src: &str) -> String {
    if !src.starts_with("data:") || src.chars().count() <= MAX_INLINE_SRC {
        return src.to_string();
    }
    let head: String = src.chars().take(MAX_INLINE_SRC).collect();
    format!("{head}... ({} chars)", src.chars().count())
}

// ── HTML ─────────────────────────────────────────────────────────────────

const STYLE: &str = r#"
:root { --bg: #f7f7fb; --card: #ffffff; --text: #1f2933; --light-text: #6b7280; --border: #e5e7eb; }
[data-theme="dark"] { --bg: #111827; --card: #1f2937; --text: #f3f4f6; --light-text: #9ca3af; --border: #374151; }
body { background: var(--bg); color: var(--text); font-family: 'Inter', system-ui, sans-serif; margin: 2rem; }
.social-results-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px; }
.social-card { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 16px; }
.card-header { display: flex; align-items: center; gap: 8px; font-weight: 700; margin-bottom: 8px; }
.card-content p { margin: 6px 0; }
.meta { font-size: 0.85em; color: var(--light-text); }
.generated-image { max-width: 100%; border-radius: 8px; }
.image-error { padding: 10px; background: #fee; color: #c00; border-radius: 4px; font-size: 0.9em; margin-top: 10px; }
.image-error pre { background: #fff; padding: 5px; border-radius: 3px; overflow-x: auto; }
.file-info-row { display: flex; gap: 6px; font-size: 0.9em; }
.file-label { color: var(--light-text); }
.youtube-success-ultra { grid-column: 1 / -1; display: flex; flex-direction: column; align-items: center; gap: 6px; border: 1px solid rgba(255, 90, 95, 0.2); border-radius: 12px; padding: 12px 20px; }
.youtube-success-ultra a { color: #FF5A5F; font-weight: 600; word-break: break-all; }
.raw-output { white-space: pre-wrap; }
"#;

/// Standalone HTML page for a result.
pub fn to_html(result: &RenderResult, theme: Theme) -> String {
    let content = match result {
        RenderResult::Cards(cards) => {
            let mut grid = String::from("<div class=\"social-results-grid\">\n");
            for card in cards {
                grid.push_str(&card_html(card));
            }
            grid.push_str("</div>");
            grid
        }
        RenderResult::PlainText(text) | RenderResult::RawDump(text) => {
            format!("<pre class=\"raw-output\">{}</pre>", escape_html(text))
        }
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{theme}\">\n<head>\n\
         <meta charset=\"utf-8\">\n<title>Generated Content</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n\
         <div id=\"generatedContent\">\n{content}\n</div>\n</body>\n</html>\n"
    )
}

fn card_html(card: &RenderedCard) -> String {
    if let CardBody::Upload { headline, url } = &card.body {
        let url = escape_html(url);
        return format!(
            "<div class=\"youtube-success-ultra\">\n\
             <div><span>{}</span> <span>{}</span></div>\n\
             <div><a href=\"{url}\" target=\"_blank\">{url}</a></div>\n</div>\n",
            escape_html(&card.icon),
            escape_html(headline),
        );
    }

    let body = match &card.body {
        CardBody::Post(post) => post_html(post),
        CardBody::Image(preview) => image_html(preview),
        CardBody::Upload { .. } => String::new(),
    };
    format!(
        "<div class=\"social-card card-{}\">\n\
         <div class=\"card-header\">\n\
         <span class=\"platform-icon\">{}</span>\n\
         <span class=\"platform-name\">{}</span>\n</div>\n\
         <div class=\"card-content\">\n{body}</div>\n</div>\n",
        card.kind.tag(),
        escape_html(&card.icon),
        escape_html(&card.title),
    )
}

fn post_html(post: &PostSummary) -> String {
    let mut html = String::new();
    let meta = if post.text.is_some() { " class=\"meta\"" } else { "" };
    if let Some(ref text) = post.text {
        let _ = writeln!(html, "<p>{}</p>", escape_html(text));
    }
    for field in &post.fields {
        let _ = writeln!(
            html,
            "<p{meta}><strong>{}:</strong> {}</p>",
            escape_html(&field.label),
            escape_html(&field.value)
        );
    }
    if let Some(ref link) = post.link {
        let _ = writeln!(
            html,
            "<p><a href=\"{}\" target=\"_blank\">{} <span>↗</span></a></p>",
            escape_html(&link.url),
            escape_html(&link.label)
        );
    }
    html
}

fn image_html(preview: &ImagePreview) -> String {
    let mut html = String::new();
    match &preview.source {
        ImageSource::Render { src } => {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"Generated Image\" class=\"generated-image\">",
                escape_html(src)
            );
        }
        ImageSource::Invalid(invalid) => {
            let _ = write!(
                html,
                "<div class=\"image-error\">\n⚠️ {}<br>\n<pre>{}</pre>\n",
                escape_html(messages::IMAGE_UNAVAILABLE),
                escape_html(&invalid.preview)
            );
            if invalid.template_hint {
                let _ = writeln!(
                    html,
                    "<div><strong>Hint:</strong> {}</div>",
                    escape_html(messages::TEMPLATE_HINT)
                );
            }
            html.push_str("</div>\n");
        }
        ImageSource::Missing => {}
    }
    html.push_str("<div class=\"image-preview-area\">\n");
    for (label, value) in [
        ("Name", &preview.file_name),
        ("Type", &preview.file_type),
        ("Size", &preview.file_size),
    ] {
        let _ = writeln!(
            html,
            "<div class=\"file-info-row\"><span class=\"file-label\">{label}:</span> \
             <span class=\"file-value\">{}</span></div>",
            escape_html(value)
        );
    }
    html.push_str("</div>\n");
    html
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
