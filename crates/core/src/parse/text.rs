//! Handlers for the text-family blocks: text, simple text, heading, list,
//! numbered list, pull quote, and raw html passthrough.

use super::{present_str, raw_block_from_value, value_kind_name};
use crate::ast::{EnrichedBlock, HeadingBlock, HtmlBlock, ListBlock, PullQuoteBlock, SimpleTextBlock, TextBlock};
use crate::error::ParseError;
use crate::inline::{markup_to_simple_text_block, markup_to_spans, markup_to_text_block};
use crate::links::split_title_supertitle;
use crate::span::{SimpleText, Span};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Leading `1. `-style prefix of a numbered-list item. The markup language
/// only has plain lists; numbering is a source convention, stripped here
/// and re-generated by renderers. Strictly sequential numbering is not
/// validated.
static NUMBERED_ITEM_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s*").unwrap());

/// Parses a text-typed raw value into a text block. Public because the
/// detail resolver parses glossary text with the plain text parser only.
pub fn parse_text(value: &Value) -> TextBlock {
    match value.as_str() {
        Some(markup) => markup_to_text_block(markup),
        None => TextBlock {
            value: Vec::new(),
            parse_errors: vec![ParseError::new("Value is not a string")],
        },
    }
}

/// Parses a text-typed raw value to a simple-text block, for callers that
/// want formatting excluded. This is not reachable from the dispatcher --
/// simple text exists only on the enriched level.
pub fn parse_simple_text(value: &Value) -> SimpleTextBlock {
    match value.as_str() {
        Some(markup) => markup_to_simple_text_block(markup),
        None => SimpleTextBlock {
            value: SimpleText::default(),
            parse_errors: vec![ParseError::new(format!(
                "Value is not a string but a {}",
                value_kind_name(value)
            ))],
        },
    }
}

pub(super) fn parse_html(value: &Value) -> HtmlBlock {
    match value.as_str() {
        Some(html) => HtmlBlock {
            value: html.to_owned(),
            parse_errors: Vec::new(),
        },
        None => HtmlBlock {
            value: String::new(),
            parse_errors: vec![ParseError::new("Value is not a string")],
        },
    }
}

pub(super) fn parse_heading(value: &Value) -> HeadingBlock {
    fn error_block(message: impl Into<String>) -> HeadingBlock {
        HeadingBlock {
            text: vec![Span::simple_text("")],
            supertitle: None,
            level: 1,
            parse_errors: vec![ParseError::new(message)],
        }
    }

    if !value.is_object() {
        return error_block("Value is a string, not an object with properties");
    }
    let Some(heading_text) = present_str(value, "text") else {
        return error_block("Text property is missing");
    };

    let level = match value.get("level") {
        None | Some(Value::Null) => return error_block("Header level property is missing"),
        Some(Value::String(s)) if s.is_empty() => {
            return error_block("Header level property is missing")
        }
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        Some(_) => None,
    };
    let level = match level {
        Some(level) if (1..=5).contains(&level) => level as u8,
        Some(_) => {
            return error_block("Header level property is outside the valid range between 1 and 5")
        }
        None => return error_block("Header level property is not a number"),
    };

    // A vertical tab separates an optional supertitle from the title. The
    // split happens on the raw text, so it only catches top-level
    // separators, which is the only place the editor puts them.
    let (title, supertitle) = split_title_supertitle(heading_text);

    HeadingBlock {
        text: markup_to_spans(title),
        supertitle: supertitle.map(markup_to_spans),
        level,
        parse_errors: Vec::new(),
    }
}

pub(super) fn parse_list(value: &Value) -> ListBlock {
    parse_list_items(value, |item| item.to_owned())
}

pub(super) fn parse_numbered_list(value: &Value) -> ListBlock {
    parse_list_items(value, |item| {
        NUMBERED_ITEM_PREFIX.replace(item, "").into_owned()
    })
}

fn parse_list_items(value: &Value, prepare: impl Fn(&str) -> String) -> ListBlock {
    let Some(raw_items) = value.as_array() else {
        return ListBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new("Value is a string, not a list of strings")],
        };
    };

    let mut items = Vec::new();
    let mut parse_errors = Vec::new();
    for raw_item in raw_items {
        match raw_item.as_str() {
            Some(item) => items.push(markup_to_text_block(&prepare(item))),
            None => parse_errors.push(ParseError::new(format!(
                "List item is not a string but a {}",
                value_kind_name(raw_item)
            ))),
        }
    }
    ListBlock {
        items,
        parse_errors,
    }
}

/// Pull quotes accept only text blocks, and only unformatted spans inside
/// those. Formatted spans are dropped with a warning; other block kinds are
/// dropped with their own errors carried over.
pub(super) fn parse_pull_quote(value: &Value) -> PullQuoteBlock {
    let Some(raw_items) = value.as_array() else {
        return PullQuoteBlock {
            text: Vec::new(),
            parse_errors: vec![ParseError::new("Value is a string, not a list of strings")],
        };
    };

    let mut text = Vec::new();
    let mut parse_errors = Vec::new();
    for raw_item in raw_items {
        let raw = match raw_block_from_value(raw_item) {
            Ok(raw) => raw,
            Err(error) => {
                parse_errors.push(error);
                continue;
            }
        };
        match super::parse_raw_block(&raw) {
            Some(EnrichedBlock::Text(block)) => {
                parse_errors.extend(block.parse_errors);
                for span in block.value {
                    match span {
                        Span::SimpleText { text: span_text } => {
                            text.push(SimpleText::new(span_text))
                        }
                        _ => parse_errors.push(ParseError::warning(
                            "Formatting is not supported inside pull-quotes",
                        )),
                    }
                }
            }
            Some(other) => parse_errors.extend(other.parse_errors().to_vec()),
            None => {}
        }
    }

    PullQuoteBlock { text, parse_errors }
}
