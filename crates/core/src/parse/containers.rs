//! Handlers for container blocks: the two-column layouts, gray sections,
//! callouts, expandable paragraphs, alignment wrappers, and key-insight
//! decks. Containers recurse through the main dispatcher and keep their
//! children's diagnostics attached to the children.

use super::{parse_nested_blocks, present_str};
use crate::ast::{
    AlignBlock, CalloutBlock, ColumnsBlock, EnrichedBlock, ExpandableParagraphBlock,
    GraySectionBlock, HorizontalAlign, KeyInsightSlide, KeyInsightsBlock,
};
use crate::error::ParseError;
use crate::links::{extract_url, link_kind, LinkKind};
use serde_json::Value;

/// Shared handler for `sticky-left`, `sticky-right` and `side-by-side`:
/// two arrays of nested blocks, each defaulting to empty when absent.
pub(super) fn parse_columns(value: &Value) -> ColumnsBlock {
    if !value.is_object() {
        return ColumnsBlock {
            left: Vec::new(),
            right: Vec::new(),
            parse_errors: vec![ParseError::new(
                "Value is a string, not an object with properties",
            )],
        };
    }
    let mut parse_errors = Vec::new();
    let left = column(value.get("left"), &mut parse_errors);
    let right = column(value.get("right"), &mut parse_errors);
    ColumnsBlock {
        left,
        right,
        parse_errors,
    }
}

fn column(value: Option<&Value>, errors: &mut Vec<ParseError>) -> Vec<EnrichedBlock> {
    match value.and_then(Value::as_array) {
        Some(blocks) => parse_nested_blocks(blocks, errors),
        None => Vec::new(),
    }
}

pub(super) fn parse_gray_section(value: &Value) -> GraySectionBlock {
    let Some(raw_items) = value.as_array() else {
        return GraySectionBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new("Value is not an array of blocks")],
        };
    };
    let mut parse_errors = Vec::new();
    let items = parse_nested_blocks(raw_items, &mut parse_errors);
    GraySectionBlock {
        items,
        parse_errors,
    }
}

/// Callouts only admit text, list and heading content; anything else fails
/// the whole block rather than being silently dropped.
pub(super) fn parse_callout(value: &Value) -> CalloutBlock {
    fn error_block(message: impl Into<String>) -> CalloutBlock {
        CalloutBlock {
            parse_errors: vec![ParseError::new(message)],
            ..CalloutBlock::default()
        }
    }

    let Some(text_value) = value.get("text") else {
        return error_block("No text provided for callout block");
    };
    let Some(raw_items) = text_value.as_array() else {
        return error_block("Text must be provided as an array e.g. inside a [.+text] block");
    };
    for raw_item in raw_items {
        let kind = raw_item.get("type").and_then(Value::as_str).unwrap_or("");
        if !matches!(kind, "text" | "list" | "heading") {
            return error_block("Callout blocks can only contain text, lists, and headings");
        }
    }

    let mut parse_errors = Vec::new();
    let text = parse_nested_blocks(raw_items, &mut parse_errors);
    CalloutBlock {
        title: value
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_owned),
        text,
        parse_errors,
    }
}

pub(super) fn parse_expandable_paragraph(value: &Value) -> ExpandableParagraphBlock {
    let items = value.as_array().filter(|items| !items.is_empty());
    let Some(raw_items) = items else {
        return ExpandableParagraphBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new(
                "The block should be defined as an array, and have some content in it",
            )],
        };
    };
    let mut parse_errors = Vec::new();
    let items = parse_nested_blocks(raw_items, &mut parse_errors);
    ExpandableParagraphBlock {
        items,
        parse_errors,
    }
}

pub(super) fn parse_align(value: &Value) -> AlignBlock {
    fn error_block(message: impl Into<String>) -> AlignBlock {
        AlignBlock {
            alignment: HorizontalAlign::Left,
            content: Vec::new(),
            parse_errors: vec![ParseError::new(message)],
        }
    }
    fn allowed() -> String {
        HorizontalAlign::KEYWORDS
            .iter()
            .map(|keyword| format!("\"{keyword}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    let Some(keyword) = present_str(value, "alignment") else {
        return error_block(format!(
            "Missing alignment property (allowed: one of {})",
            allowed()
        ));
    };
    let Some(alignment) = HorizontalAlign::from_keyword(keyword) else {
        return error_block(format!(
            "Invalid alignment property (allowed: one of {})",
            allowed()
        ));
    };
    let Some(raw_content) = value.get("content").and_then(Value::as_array) else {
        return error_block("Missing content");
    };

    let mut parse_errors = Vec::new();
    let content = parse_nested_blocks(raw_content, &mut parse_errors);
    AlignBlock {
        alignment,
        content,
        parse_errors,
    }
}

/// Key insights: a heading plus a deck of slides. Every slide needs a
/// title and exactly one of a chart/explorer url or an image filename;
/// slides without a title are dropped, but their errors are kept.
pub(super) fn parse_key_insights(value: &Value) -> KeyInsightsBlock {
    fn error_block(message: impl Into<String>) -> KeyInsightsBlock {
        KeyInsightsBlock {
            parse_errors: vec![ParseError::new(message)],
            ..KeyInsightsBlock::default()
        }
    }

    let Some(raw_insights) = value
        .get("insights")
        .and_then(Value::as_array)
        .filter(|insights| !insights.is_empty())
    else {
        return error_block("No insights included");
    };
    let heading = match value.get("heading") {
        None | Some(Value::Null) => return error_block("No heading for key insights block"),
        Some(Value::String(heading)) if heading.is_empty() => {
            return error_block("No heading for key insights block")
        }
        Some(Value::String(heading)) => heading.clone(),
        Some(_) => return error_block("Heading for key insights block must be a string"),
    };

    let mut insights = Vec::new();
    let mut parse_errors = Vec::new();
    for raw_insight in raw_insights {
        let title = present_str(raw_insight, "title");
        if title.is_none() {
            parse_errors.push(ParseError::new("Key insight is missing a title"));
        }

        let raw_url = present_str(raw_insight, "url");
        let filename = present_str(raw_insight, "filename");
        if raw_url.is_none() && filename.is_none() {
            parse_errors.push(ParseError::new(
                "Key insight is missing a url or filename. One of these two fields must be specified.",
            ));
        }
        if raw_url.is_some() && filename.is_some() {
            parse_errors.push(ParseError::new(
                "Key insight has both a url and a filename. Only one of these two fields can be specified.",
            ));
        }

        let url = raw_url.map(extract_url);
        if let Some(url) = &url {
            if !matches!(link_kind(url), LinkKind::Chart | LinkKind::Explorer) {
                parse_errors.push(ParseError::new(
                    "Key insight has a url that isn't a chart or explorer link",
                ));
            }
        }

        let content = match raw_insight.get("content").and_then(Value::as_array) {
            Some(raw_content) => parse_nested_blocks(raw_content, &mut parse_errors),
            None => {
                parse_errors.push(ParseError::new("Key insight is missing content"));
                Vec::new()
            }
        };

        if let Some(title) = title {
            insights.push(KeyInsightSlide {
                title: title.to_owned(),
                filename: filename.map(str::to_owned),
                url,
                content,
            });
        }
    }

    KeyInsightsBlock {
        heading,
        insights,
        parse_errors,
    }
}
