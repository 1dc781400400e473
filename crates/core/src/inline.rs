//! Inline markup parsing: markup string -> span tree.
//!
//! This is the inverse of the span serializer for the small inline tag set
//! the pipeline emits. The parser is deliberately infallible: anything it
//! does not recognize is either kept as literal text (a stray `<`) or
//! wrapped in a fallback span (an unknown tag), so no content is silently
//! dropped. Nesting order is preserved exactly as encountered.

use crate::ast::{SimpleTextBlock, TextBlock};
use crate::error::ParseError;
use crate::links::{DOD_ANCHOR_REGEX, REF_ANCHOR_REGEX};
use crate::span::{spans_to_plain_text, SimpleText, Span};
use once_cell::sync::Lazy;
use regex::Regex;

static HREF_ATTR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());

/// Parses inline markup into a span tree. Never fails; unclosed tags close
/// at end of input.
pub fn markup_to_spans(markup: &str) -> Vec<Span> {
    let mut parser = Parser {
        input: markup,
        pos: 0,
    };
    let (spans, _) = parser.parse_sequence(None);
    spans
}

/// Parses inline markup into a text block. The block itself cannot fail;
/// callers add shape errors for non-string raw values before getting here.
pub fn markup_to_text_block(markup: &str) -> TextBlock {
    TextBlock {
        value: markup_to_spans(markup),
        parse_errors: Vec::new(),
    }
}

/// Parses inline markup into a simple-text block, flattening any formatting
/// to plain text with a single warning. Used where formatting is
/// structurally excluded (e.g. recirc titles).
pub fn markup_to_simple_text_block(markup: &str) -> SimpleTextBlock {
    let spans = markup_to_spans(markup);
    let has_formatting = spans
        .iter()
        .any(|span| !matches!(span, Span::SimpleText { .. }));
    let mut parse_errors = Vec::new();
    if has_formatting {
        parse_errors.push(ParseError::warning(
            "Formatting is not supported here and was flattened into plain text",
        ));
    }
    SimpleTextBlock {
        value: SimpleText::new(spans_to_plain_text(&spans)),
        parse_errors,
    }
}

// ──────────────────────────────────────────────
// Cursor parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Parses spans until end of input or until the closing tag named by
    /// `until` is consumed. Returns the spans and whether the closing tag
    /// was found.
    fn parse_sequence(&mut self, until: Option<&str>) -> (Vec<Span>, bool) {
        let mut spans: Vec<Span> = Vec::new();
        let mut text = String::new();

        loop {
            let rest = self.rest();
            let Some(offset) = rest.find('<') else {
                text.push_str(rest);
                self.pos = self.input.len();
                flush_text(&mut spans, &mut text);
                return (spans, false);
            };

            text.push_str(&rest[..offset]);
            self.pos += offset;

            if let Some(name) = self.peek_closing_tag() {
                if until == Some(name.as_str()) {
                    self.consume_tag();
                    flush_text(&mut spans, &mut text);
                    return (spans, true);
                }
                // A closing tag we did not open: literal text.
                text.push('<');
                self.pos += 1;
                continue;
            }

            let Some(tag) = self.peek_open_tag() else {
                // A `<` that does not start a tag: literal text.
                text.push('<');
                self.pos += 1;
                continue;
            };

            flush_text(&mut spans, &mut text);
            self.consume_tag();

            if tag.name == "br" {
                spans.push(Span::Newline);
                continue;
            }
            if tag.self_closing {
                // No other self-closing tag carries content.
                spans.push(Span::Fallback {
                    children: Vec::new(),
                });
                continue;
            }

            let (children, _) = self.parse_sequence(Some(&tag.name));
            spans.push(span_for_tag(&tag, children));
        }
    }

    /// The tag name if the cursor sits on a well-formed closing tag.
    fn peek_closing_tag(&self) -> Option<String> {
        let rest = self.rest();
        let inner = rest.strip_prefix("</")?;
        let end = inner.find('>')?;
        let name = inner[..end].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(name.to_ascii_lowercase())
    }

    /// The parsed tag if the cursor sits on a well-formed opening tag.
    fn peek_open_tag(&self) -> Option<Tag> {
        let rest = self.rest();
        let inner = rest.strip_prefix('<')?;
        if inner.starts_with('/') {
            return None;
        }
        let end = inner.find('>')?;
        let mut body = &inner[..end];
        let self_closing = body.ends_with('/');
        if self_closing {
            body = &body[..body.len() - 1];
        }
        let (name, attrs) = match body.split_once(char::is_whitespace) {
            Some((name, attrs)) => (name, attrs),
            None => (body, ""),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Tag {
            name: name.to_ascii_lowercase(),
            attrs: attrs.to_owned(),
            self_closing,
        })
    }

    /// Advances past the tag the cursor sits on. Only called after a
    /// successful peek.
    fn consume_tag(&mut self) {
        if let Some(end) = self.rest().find('>') {
            self.pos += end + 1;
        } else {
            self.pos = self.input.len();
        }
    }
}

struct Tag {
    name: String,
    attrs: String,
    self_closing: bool,
}

fn flush_text(spans: &mut Vec<Span>, text: &mut String) {
    if !text.is_empty() {
        spans.push(Span::SimpleText {
            text: html_escape::decode_html_entities(text).into_owned(),
        });
        text.clear();
    }
}

fn span_for_tag(tag: &Tag, children: Vec<Span>) -> Span {
    match tag.name.as_str() {
        "i" | "em" => Span::Italic { children },
        "b" | "strong" => Span::Bold { children },
        "u" => Span::Underline { children },
        "sub" => Span::Subscript { children },
        "sup" => Span::Superscript { children },
        "q" => Span::Quote { children },
        "a" => anchor_span(&tag.attrs, children),
        _ => Span::Fallback { children },
    }
}

fn anchor_span(attrs: &str, children: Vec<Span>) -> Span {
    let href = HREF_ATTR_REGEX
        .captures(attrs)
        .map(|captures| html_escape::decode_html_entities(&captures[1]).into_owned())
        .unwrap_or_default();
    if let Some(captures) = DOD_ANCHOR_REGEX.captures(&href) {
        return Span::Dod {
            id: captures[1].to_owned(),
            children,
        };
    }
    if let Some(captures) = REF_ANCHOR_REGEX.captures(&href) {
        return Span::Ref {
            id: captures[1].to_owned(),
            children,
        };
    }
    Span::Link {
        url: href,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::spans_to_markup;

    #[test]
    fn plain_text_is_one_simple_span() {
        assert_eq!(
            markup_to_spans("hello world"),
            vec![Span::simple_text("hello world")]
        );
    }

    #[test]
    fn empty_markup_is_no_spans() {
        assert_eq!(markup_to_spans(""), Vec::<Span>::new());
    }

    #[test]
    fn nesting_order_is_preserved() {
        assert_eq!(
            markup_to_spans("<i><b>hello</b></i>"),
            vec![Span::Italic {
                children: vec![Span::Bold {
                    children: vec![Span::simple_text("hello")]
                }]
            }]
        );
        // the reverse nesting parses to the reverse tree
        assert_eq!(
            markup_to_spans("<b><i>hello</i></b>"),
            vec![Span::Bold {
                children: vec![Span::Italic {
                    children: vec![Span::simple_text("hello")]
                }]
            }]
        );
    }

    #[test]
    fn em_and_strong_are_aliases() {
        assert_eq!(
            markup_to_spans("<em>a</em><strong>b</strong>"),
            vec![
                Span::Italic {
                    children: vec![Span::simple_text("a")]
                },
                Span::Bold {
                    children: vec![Span::simple_text("b")]
                },
            ]
        );
    }

    #[test]
    fn line_breaks_become_newline_spans() {
        assert_eq!(
            markup_to_spans("a<br/>b<br>c"),
            vec![
                Span::simple_text("a"),
                Span::Newline,
                Span::simple_text("b"),
                Span::Newline,
                Span::simple_text("c"),
            ]
        );
    }

    #[test]
    fn anchors_classify_as_link_ref_or_dod() {
        assert_eq!(
            markup_to_spans("<a href=\"https://example.com\">x</a>"),
            vec![Span::Link {
                url: "https://example.com".to_owned(),
                children: vec![Span::simple_text("x")]
            }]
        );
        assert_eq!(
            markup_to_spans("<a href=\"#ref:note-1\">1</a>"),
            vec![Span::Ref {
                id: "note-1".to_owned(),
                children: vec![Span::simple_text("1")]
            }]
        );
        assert_eq!(
            markup_to_spans("<a href=\"#dod:gdp\">GDP</a>"),
            vec![Span::Dod {
                id: "gdp".to_owned(),
                children: vec![Span::simple_text("GDP")]
            }]
        );
    }

    #[test]
    fn unknown_tags_wrap_in_fallback() {
        assert_eq!(
            markup_to_spans("<marquee>hi</marquee>"),
            vec![Span::Fallback {
                children: vec![Span::simple_text("hi")]
            }]
        );
    }

    #[test]
    fn stray_angle_brackets_stay_literal() {
        assert_eq!(
            markup_to_spans("1 < 2 and 3 > 2"),
            vec![Span::simple_text("1 < 2 and 3 > 2")]
        );
        // a closing tag that was never opened is literal text too
        assert_eq!(
            markup_to_spans("a</b>c"),
            vec![Span::simple_text("a</b>c")]
        );
    }

    #[test]
    fn unclosed_tags_close_at_end_of_input() {
        assert_eq!(
            markup_to_spans("<b>rest"),
            vec![Span::Bold {
                children: vec![Span::simple_text("rest")]
            }]
        );
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(
            markup_to_spans("a &amp; b &lt; c"),
            vec![Span::simple_text("a & b < c")]
        );
    }

    #[test]
    fn serializer_output_round_trips() {
        let original = vec![
            Span::simple_text("See "),
            Span::Link {
                url: "https://example.com/?q=\"x\"".to_owned(),
                children: vec![Span::Bold {
                    children: vec![Span::simple_text("this & that")],
                }],
            },
            Span::Ref {
                id: "note-2".to_owned(),
                children: vec![Span::simple_text("2")],
            },
        ];
        let markup = spans_to_markup(&original);
        assert_eq!(markup_to_spans(&markup), original);
    }

    #[test]
    fn simple_text_block_flattens_formatting_with_a_warning() {
        let block = markup_to_simple_text_block("All <b>about</b> data");
        assert_eq!(block.value, SimpleText::new("All about data"));
        assert_eq!(block.parse_errors.len(), 1);
        assert!(block.parse_errors[0].is_warning);

        let clean = markup_to_simple_text_block("All about data");
        assert!(clean.parse_errors.is_empty());
    }
}
