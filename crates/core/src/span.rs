//! Inline formatting tree and the span builder.
//!
//! A [`Span`] is one node of the inline-formatting tree underlying a text
//! block. Spans are built from two directions: the flattener builds them
//! from the editor's styled text runs ([`span_from_text_run`]) and turns
//! them back into markup ([`span_to_markup`]); the block parser builds them
//! from markup via [`crate::inline::markup_to_spans`].

use crate::doc::TextRun;
use serde::{Deserialize, Serialize};

/// A bare simple-text span, used where formatting is structurally excluded
/// (pull-quote text, recirc titles, simple-text blocks).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "spanType", rename = "span-simple-text")]
pub struct SimpleText {
    pub text: String,
}

impl SimpleText {
    pub fn new(text: impl Into<String>) -> Self {
        SimpleText { text: text.into() }
    }
}

// ──────────────────────────────────────────────
// Span
// ──────────────────────────────────────────────

/// One node of the inline-formatting tree.
///
/// Non-leaf variants own their children; nesting order is meaningful
/// (bold-inside-link and link-inside-bold render differently) and is
/// preserved exactly as encountered in the source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "spanType")]
pub enum Span {
    #[serde(rename = "span-simple-text")]
    SimpleText { text: String },
    #[serde(rename = "span-newline")]
    Newline,
    #[serde(rename = "span-italic")]
    Italic { children: Vec<Span> },
    #[serde(rename = "span-bold")]
    Bold { children: Vec<Span> },
    #[serde(rename = "span-underline")]
    Underline { children: Vec<Span> },
    #[serde(rename = "span-subscript")]
    Subscript { children: Vec<Span> },
    #[serde(rename = "span-superscript")]
    Superscript { children: Vec<Span> },
    #[serde(rename = "span-quote")]
    Quote { children: Vec<Span> },
    /// A hyperlink to an arbitrary target.
    #[serde(rename = "span-link")]
    Link { url: String, children: Vec<Span> },
    /// A footnote-style citation, resolved against the ref dictionary.
    #[serde(rename = "span-ref")]
    Ref { id: String, children: Vec<Span> },
    /// A detail-on-demand popover term, resolved against the glossary.
    #[serde(rename = "span-dod")]
    Dod { id: String, children: Vec<Span> },
    /// Wraps content the inline parser did not recognize so that nothing
    /// is silently dropped.
    #[serde(rename = "span-fallback")]
    Fallback { children: Vec<Span> },
}

impl Span {
    pub fn simple_text(text: impl Into<String>) -> Span {
        Span::SimpleText { text: text.into() }
    }

    /// Child spans of a non-leaf variant; empty for leaves.
    pub fn children(&self) -> &[Span] {
        match self {
            Span::SimpleText { .. } | Span::Newline => &[],
            Span::Italic { children }
            | Span::Bold { children }
            | Span::Underline { children }
            | Span::Subscript { children }
            | Span::Superscript { children }
            | Span::Quote { children }
            | Span::Link { children, .. }
            | Span::Ref { children, .. }
            | Span::Dod { children, .. }
            | Span::Fallback { children } => children,
        }
    }
}

// ──────────────────────────────────────────────
// Span builder (text run -> span)
// ──────────────────────────────────────────────

/// Builds the span for one styled text run of the editor document.
///
/// Starts from a simple-text leaf and applies formatting wraps
/// innermost-first in a fixed order: link, italic, bold, superscript,
/// subscript. A run cannot be both super- and subscript, and the editor's
/// style model has no wrap ordering of its own, so the fixed order is
/// enough for rendering parity. A bare-newline run is returned unwrapped.
pub fn span_from_text_run(run: &TextRun) -> Span {
    let content = run.content.clone().unwrap_or_default();
    let mut span = Span::SimpleText {
        text: content.clone(),
    };

    let Some(style) = &run.text_style else {
        return span;
    };
    if content == "\n" {
        return span;
    }

    if let Some(url) = style.link.as_ref().and_then(|link| link.url.as_deref()) {
        span = Span::Link {
            url: url.to_owned(),
            children: vec![span],
        };
    }
    if style.italic == Some(true) {
        span = Span::Italic {
            children: vec![span],
        };
    }
    if style.bold == Some(true) {
        span = Span::Bold {
            children: vec![span],
        };
    }
    if style.baseline_offset.as_deref() == Some("SUPERSCRIPT") {
        span = Span::Superscript {
            children: vec![span],
        };
    }
    if style.baseline_offset.as_deref() == Some("SUBSCRIPT") {
        span = Span::Subscript {
            children: vec![span],
        };
    }

    span
}

// ──────────────────────────────────────────────
// Markup serialization (span -> markup string)
// ──────────────────────────────────────────────

/// Renders a span as the minimal inline markup that round-trips its
/// formatting through the tokenizer. Fallback spans render their children
/// only; the wrapping cannot be reproduced.
pub fn span_to_markup(span: &Span) -> String {
    match span {
        Span::SimpleText { text } => html_escape::encode_text(text).into_owned(),
        Span::Newline => "<br/>".to_owned(),
        Span::Italic { children } => wrap_markup("i", children),
        Span::Bold { children } => wrap_markup("b", children),
        Span::Underline { children } => wrap_markup("u", children),
        Span::Subscript { children } => wrap_markup("sub", children),
        Span::Superscript { children } => wrap_markup("sup", children),
        Span::Quote { children } => wrap_markup("q", children),
        Span::Link { url, children } => anchor_markup(url, children),
        Span::Ref { id, children } => anchor_markup(&format!("#ref:{}", id), children),
        Span::Dod { id, children } => anchor_markup(&format!("#dod:{}", id), children),
        Span::Fallback { children } => spans_to_markup(children),
    }
}

pub fn spans_to_markup(spans: &[Span]) -> String {
    spans.iter().map(span_to_markup).collect()
}

fn wrap_markup(tag: &str, children: &[Span]) -> String {
    format!("<{tag}>{}</{tag}>", spans_to_markup(children))
}

fn anchor_markup(href: &str, children: &[Span]) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        html_escape::encode_double_quoted_attribute(href),
        spans_to_markup(children)
    )
}

// ──────────────────────────────────────────────
// Plain text extraction
// ──────────────────────────────────────────────

/// Flattens a span tree to unformatted plain text (newlines preserved).
pub fn spans_to_plain_text(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::SimpleText { text } => out.push_str(text),
            Span::Newline => out.push('\n'),
            other => out.push_str(&spans_to_plain_text(other.children())),
        }
    }
    out
}
