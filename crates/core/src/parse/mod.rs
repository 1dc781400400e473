//! Block parsing: raw blocks -> enriched blocks.
//!
//! [`parse_raw_block`] is the central dispatcher of the pipeline: one
//! exhaustive match over every raw block kind, so that adding a kind
//! without a handler is a compile error. Handlers never fail -- they
//! shape-check the loosely-typed payload, substitute safe defaults where
//! validation fails, and attach the diagnostics describing why. Errors on
//! one block never stop sibling parsing.

mod charts;
mod containers;
mod media;
mod promos;
mod text;

pub use text::{parse_simple_text, parse_text};

use crate::ast::{EnrichedBlock, MarkerBlock, RawBlock};
use crate::error::ParseError;
use serde_json::Value;

/// Parses one raw block into its enriched counterpart.
///
/// Returns `None` exactly for the `url` and `position` pass-through kinds,
/// which are meaningful only inside specific containers (scrollers, chart
/// stories) and are dropped everywhere else. Every other kind yields
/// `Some` with the matching discriminant, possibly carrying parse errors.
pub fn parse_raw_block(raw: &RawBlock) -> Option<EnrichedBlock> {
    let enriched = match raw {
        RawBlock::Text(value) => EnrichedBlock::Text(text::parse_text(value)),
        RawBlock::Heading(value) => EnrichedBlock::Heading(text::parse_heading(value)),
        RawBlock::List(value) => EnrichedBlock::List(text::parse_list(value)),
        RawBlock::NumberedList(value) => {
            EnrichedBlock::NumberedList(text::parse_numbered_list(value))
        }
        RawBlock::PullQuote(value) => EnrichedBlock::PullQuote(text::parse_pull_quote(value)),
        RawBlock::HorizontalRule(value) => EnrichedBlock::HorizontalRule(parse_marker(value)),
        RawBlock::Image(value) => EnrichedBlock::Image(media::parse_image(value)),
        RawBlock::Chart(value) => EnrichedBlock::Chart(charts::parse_chart(value)),
        RawBlock::ChartStory(value) => EnrichedBlock::ChartStory(charts::parse_chart_story(value)),
        RawBlock::Scroller(value) => EnrichedBlock::Scroller(charts::parse_scroller(value)),
        RawBlock::Callout(value) => EnrichedBlock::Callout(containers::parse_callout(value)),
        RawBlock::Aside(value) => EnrichedBlock::Aside(media::parse_aside(value)),
        RawBlock::Recirc(value) => EnrichedBlock::Recirc(promos::parse_recirc(value)),
        RawBlock::StickyLeft(value) => EnrichedBlock::StickyLeft(containers::parse_columns(value)),
        RawBlock::StickyRight(value) => {
            EnrichedBlock::StickyRight(containers::parse_columns(value))
        }
        RawBlock::SideBySide(value) => EnrichedBlock::SideBySide(containers::parse_columns(value)),
        RawBlock::GraySection(value) => {
            EnrichedBlock::GraySection(containers::parse_gray_section(value))
        }
        RawBlock::ProminentLink(value) => {
            EnrichedBlock::ProminentLink(promos::parse_prominent_link(value))
        }
        RawBlock::TopicPageIntro(value) => {
            EnrichedBlock::TopicPageIntro(promos::parse_topic_page_intro(value))
        }
        RawBlock::KeyInsights(value) => {
            EnrichedBlock::KeyInsights(containers::parse_key_insights(value))
        }
        RawBlock::ResearchAndWriting(value) => {
            EnrichedBlock::ResearchAndWriting(promos::parse_research_and_writing(value))
        }
        RawBlock::ExpandableParagraph(value) => {
            EnrichedBlock::ExpandableParagraph(containers::parse_expandable_paragraph(value))
        }
        RawBlock::Align(value) => EnrichedBlock::Align(containers::parse_align(value)),
        RawBlock::Html(value) => EnrichedBlock::Html(text::parse_html(value)),
        RawBlock::SdgGrid(value) => EnrichedBlock::SdgGrid(charts::parse_sdg_grid(value)),
        RawBlock::SdgToc(value) => EnrichedBlock::SdgToc(parse_marker(value)),
        RawBlock::MissingData(value) => EnrichedBlock::MissingData(parse_marker(value)),
        RawBlock::AllCharts(value) => EnrichedBlock::AllCharts(charts::parse_all_charts(value)),
        RawBlock::AdditionalCharts(value) => {
            EnrichedBlock::AdditionalCharts(charts::parse_additional_charts(value))
        }
        // url and position blocks only occur inside chart stories,
        // scrollers and the like; on their own they enrich to nothing.
        RawBlock::Url(_) => return None,
        RawBlock::Position(_) => return None,
    };
    Some(enriched)
}

/// Parses a list of raw blocks, dropping the pass-through kinds and
/// keeping going unconditionally past errored blocks.
pub fn parse_raw_blocks(blocks: &[RawBlock]) -> Vec<EnrichedBlock> {
    blocks.iter().filter_map(parse_raw_block).collect()
}

/// Marker blocks (`horizontal-rule`, `sdg-toc`, `missing-data`) carry a
/// dummy value which is passed through untouched.
fn parse_marker(value: &Value) -> MarkerBlock {
    MarkerBlock {
        value: match value {
            Value::Null => None,
            other => Some(other.clone()),
        },
        parse_errors: Vec::new(),
    }
}

// ──────────────────────────────────────────────
// Shared payload helpers
// ──────────────────────────────────────────────

/// JSON kind name for shape-error messages.
pub(crate) fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A field that is present as a non-empty string. Missing, non-string and
/// empty all count as absent, matching the tolerance the markup serializer
/// requires.
pub(crate) fn present_str<'v>(value: &'v Value, field: &str) -> Option<&'v str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// An optional string field passed through as-is (empty strings included).
pub(crate) fn opt_str(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Converts a nested payload value back into a typed raw block. The
/// tokenizer only emits known kinds, so a failure here means the payload
/// was not a block at all.
pub(crate) fn raw_block_from_value(value: &Value) -> Result<RawBlock, ParseError> {
    serde_json::from_value(value.clone())
        .map_err(|_| ParseError::new(format!("Unrecognized block: {}", value)))
}

/// Recursively parses an array of nested payload values, accumulating
/// deserialization failures into `errors` and dropping pass-through kinds.
pub(crate) fn parse_nested_blocks(
    values: &[Value],
    errors: &mut Vec<ParseError>,
) -> Vec<EnrichedBlock> {
    let mut blocks = Vec::new();
    for value in values {
        match raw_block_from_value(value) {
            Ok(raw) => {
                if let Some(block) = parse_raw_block(&raw) {
                    blocks.push(block);
                }
            }
            Err(error) => errors.push(error),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Every raw kind must parse to the matching enriched kind (or to
    /// nothing, for the two pass-through kinds) without panicking, no
    /// matter how degenerate the payload.
    #[test]
    fn every_kind_parses_to_its_own_discriminant() {
        let kinds = [
            "text",
            "heading",
            "list",
            "numbered-list",
            "pull-quote",
            "horizontal-rule",
            "image",
            "chart",
            "chart-story",
            "scroller",
            "callout",
            "aside",
            "recirc",
            "sticky-left",
            "sticky-right",
            "side-by-side",
            "gray-section",
            "prominent-link",
            "topic-page-intro",
            "key-insights",
            "research-and-writing",
            "expandable-paragraph",
            "align",
            "html",
            "sdg-grid",
            "sdg-toc",
            "missing-data",
            "all-charts",
            "additional-charts",
        ];
        let degenerate_values = [
            json!(null),
            json!(""),
            json!("some string"),
            json!([]),
            json!({}),
            json!([{ "stray": true }]),
            json!({ "stray": true }),
        ];
        for kind in kinds {
            for value in &degenerate_values {
                let raw: RawBlock =
                    serde_json::from_value(json!({ "type": kind, "value": value })).unwrap();
                let enriched = parse_raw_block(&raw)
                    .unwrap_or_else(|| panic!("{kind} should enrich to Some"));
                assert_eq!(enriched.kind(), kind, "value {value}");
            }
        }
    }

    #[test]
    fn url_and_position_enrich_to_nothing() {
        for kind in ["url", "position"] {
            let raw: RawBlock =
                serde_json::from_value(json!({ "type": kind, "value": "x" })).unwrap();
            assert!(parse_raw_block(&raw).is_none());
        }
    }

    #[test]
    fn sibling_blocks_survive_an_errored_block() {
        let blocks: Vec<RawBlock> = serde_json::from_value(json!([
            { "type": "chart", "value": {} },
            { "type": "url", "value": "/charts/x" },
            { "type": "text", "value": "fine" },
        ]))
        .unwrap();
        let enriched = parse_raw_blocks(&blocks);
        assert_eq!(enriched.len(), 2);
        assert!(!enriched[0].parse_errors().is_empty());
        assert!(enriched[1].parse_errors().is_empty());
    }

    #[test]
    fn markers_pass_their_value_through() {
        let raw: RawBlock =
            serde_json::from_value(json!({ "type": "horizontal-rule", "value": {} })).unwrap();
        let enriched = parse_raw_block(&raw).unwrap();
        assert_eq!(
            serde_json::to_value(&enriched).unwrap(),
            json!({ "type": "horizontal-rule", "value": {}, "parseErrors": [] })
        );
    }
}
