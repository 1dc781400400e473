//! Handlers for the chart-family blocks: chart embeds, chart stories,
//! scrollers, and the chart collection blocks.

use super::{opt_str, present_str, raw_block_from_value, value_kind_name};
use crate::ast::{
    AllChartsBlock, AllChartsItem, AdditionalChartsBlock, ChartBlock, ChartControl,
    ChartPosition, ChartStoryBlock, ChartStoryItem, ChartTab, RawBlock, ScrollerBlock,
    ScrollerItem, SdgGridBlock, SdgGridItem, TextBlock,
};
use crate::error::ParseError;
use crate::inline::{markup_to_spans, markup_to_text_block};
use crate::links::extract_url;
use serde_json::Value;

pub(super) fn parse_chart(value: &Value) -> ChartBlock {
    // The bare-string form is a chart that is nothing but a url.
    if let Some(url) = value.as_str() {
        return ChartBlock::from_url(url);
    }

    let Some(raw_url) = present_str(value, "url") else {
        return ChartBlock {
            parse_errors: vec![ParseError::new("url property is missing")],
            ..ChartBlock::default()
        };
    };

    let mut warnings = Vec::new();

    let position = match present_str(value, "position") {
        None => None,
        Some("featured") => Some(ChartPosition::Featured),
        Some(_) => {
            warnings.push(ParseError::warning("position must be 'featured' or unset"));
            None
        }
    };

    let caption = present_str(value, "caption")
        .map(markup_to_spans)
        .filter(|spans| !spans.is_empty());

    let controls = filter_keywords(
        keyword_groups(value, "controls"),
        "controls",
        ChartControl::KEYWORDS,
        ChartControl::from_keyword,
        &mut warnings,
    );
    let tabs = filter_keywords(
        keyword_groups(value, "tabs"),
        "tabs",
        ChartTab::KEYWORDS,
        ChartTab::from_keyword,
        &mut warnings,
    );

    ChartBlock {
        url: extract_url(raw_url),
        height: opt_str(value, "height"),
        row: opt_str(value, "row"),
        column: opt_str(value, "column"),
        position,
        caption,
        title: opt_str(value, "title"),
        subtitle: opt_str(value, "subtitle"),
        controls,
        tabs,
        parse_errors: warnings,
    }
}

/// Keyword fields arrive as arrays of `{ list: [..] }` groups; flatten
/// them to the contained strings.
fn keyword_groups(value: &Value, field: &str) -> Vec<String> {
    let Some(groups) = value.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    groups
        .iter()
        .filter_map(|group| group.get("list").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

/// Keeps the valid keywords (deduplicated, first-appearance order) and
/// warns once per invalid keyword, naming the allowed set. An empty result
/// is omitted from the enriched block entirely.
fn filter_keywords<T>(
    keywords: Vec<String>,
    field: &str,
    allowed: &[&str],
    from_keyword: fn(&str) -> Option<T>,
    warnings: &mut Vec<ParseError>,
) -> Option<Vec<T>> {
    let mut seen: Vec<String> = Vec::new();
    let mut valid = Vec::new();
    for keyword in keywords {
        match from_keyword(&keyword) {
            Some(value) => {
                if !seen.contains(&keyword) {
                    seen.push(keyword);
                    valid.push(value);
                }
            }
            None => warnings.push(ParseError::warning(format!(
                "Keyword '{}' in '{}' is not valid. Must be one of: {}",
                keyword,
                field,
                allowed.join(", ")
            ))),
        }
    }
    if valid.is_empty() {
        None
    } else {
        Some(valid)
    }
}

pub(super) fn parse_chart_story(value: &Value) -> ChartStoryBlock {
    let Some(raw_items) = value.as_array() else {
        return ChartStoryBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new(
                "Value is a string, not an object with properties",
            )],
        };
    };

    let mut items = Vec::new();
    let mut parse_errors = Vec::new();
    for raw_item in raw_items {
        let Some(narrative) = present_str(raw_item, "narrative") else {
            parse_errors.push(ParseError::new(
                "Item is missing narrative property or it is not a string value",
            ));
            continue;
        };
        let Some(chart) = present_str(raw_item, "chart") else {
            parse_errors.push(ParseError::new(
                "Item is missing chart property or it is not a string value",
            ));
            continue;
        };
        if raw_item.get("technical").is_some_and(Value::is_array) {
            parse_errors.push(ParseError::new(
                "Item's technical tag is an array (e.g. \"[.technical]\"). \
                 Please update this tag to use curly braces (e.g. {.technical})",
            ));
            continue;
        }
        let technical: Vec<TextBlock> = raw_item
            .get("technical")
            .and_then(|technical| technical.get("list"))
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(markup_to_text_block)
                    .collect()
            })
            .unwrap_or_default();

        items.push(ChartStoryItem {
            narrative: markup_to_text_block(narrative),
            chart: ChartBlock::from_url(chart),
            technical,
        });
    }

    ChartStoryBlock {
        items,
        parse_errors,
    }
}

/// Scrollers consume a flat sequence of alternating `url` and `text`
/// blocks. A second `url` starts a new item only once the current item has
/// a url; a trailing item that never got one is silently discarded (the
/// lenient parse is load-bearing for existing content).
pub(super) fn parse_scroller(value: &Value) -> ScrollerBlock {
    let Some(raw_items) = value.as_array() else {
        return ScrollerBlock {
            blocks: Vec::new(),
            parse_errors: vec![ParseError::new(
                "Value is a string, not an object with properties",
            )],
        };
    };

    let mut blocks = Vec::new();
    let mut current = ScrollerItem::default();
    let mut parse_errors = Vec::new();
    for raw_item in raw_items {
        match raw_block_from_value(raw_item) {
            Ok(RawBlock::Url(url_value)) => {
                if !current.url.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.url = url_value.as_str().unwrap_or_default().to_owned();
            }
            Ok(RawBlock::Text(text_value)) => {
                current.text = super::text::parse_text(&text_value);
            }
            _ => parse_errors.push(ParseError::warning(
                "scroller items must be of type 'url' or 'text'",
            )),
        }
    }
    if !current.url.is_empty() {
        blocks.push(current);
    }

    ScrollerBlock {
        blocks,
        parse_errors,
    }
}

pub(super) fn parse_all_charts(value: &Value) -> AllChartsBlock {
    fn error_block(message: impl Into<String>) -> AllChartsBlock {
        AllChartsBlock {
            parse_errors: vec![ParseError::new(message)],
            ..AllChartsBlock::default()
        }
    }

    let Some(heading) = present_str(value, "heading") else {
        return error_block("all-charts block missing heading");
    };

    let mut top = Vec::new();
    match value.get("top") {
        None | Some(Value::Null) => {}
        Some(top_value) => {
            let Some(raw_items) = top_value.as_array() else {
                return error_block(format!(
                    "all-charts malformed \"top\" property: {}",
                    value_kind_name(top_value)
                ));
            };
            for raw_item in raw_items {
                if !raw_item.is_object() {
                    return error_block(format!("all-charts invalid top item: {raw_item}"));
                }
                let Some(url) = raw_item.get("url") else {
                    return error_block(format!(
                        "all-charts top item missing \"url\" property: {raw_item}"
                    ));
                };
                top.push(AllChartsItem {
                    url: extract_url(url.as_str().unwrap_or_default()),
                });
            }
        }
    }

    AllChartsBlock {
        heading: heading.to_owned(),
        top,
        parse_errors: Vec::new(),
    }
}

pub(super) fn parse_additional_charts(value: &Value) -> AdditionalChartsBlock {
    fn error_block(message: impl Into<String>) -> AdditionalChartsBlock {
        AdditionalChartsBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new(message)],
        }
    }

    if value.is_array() {
        return error_block(
            "additional-charts block is using an array tag (e.g. [.additional-charts]). \
             Please update it to use curly braces (e.g. {.additional-charts})",
        );
    }
    let Some(list) = value.get("list").and_then(Value::as_array) else {
        return error_block("Block does not contain a list");
    };
    for item in list {
        if !item.is_string() {
            return error_block(format!(
                "Item in list with value \"{item}\" isn't a plain string."
            ));
        }
    }

    AdditionalChartsBlock {
        items: list
            .iter()
            .filter_map(Value::as_str)
            .map(markup_to_spans)
            .collect(),
        parse_errors: Vec::new(),
    }
}

pub(super) fn parse_sdg_grid(value: &Value) -> SdgGridBlock {
    let Some(raw_items) = value.as_array() else {
        return SdgGridBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new(
                "Value is a string, not an object with properties",
            )],
        };
    };
    if raw_items.is_empty() {
        return SdgGridBlock {
            items: Vec::new(),
            parse_errors: vec![ParseError::new("SDG Grid must have at least one item")],
        };
    }

    let mut items = Vec::new();
    let mut parse_errors = Vec::new();
    for raw_item in raw_items {
        let Some(goal) = raw_item.get("goal").and_then(Value::as_str) else {
            parse_errors.push(ParseError::new(
                "Item is missing goal property or it is not a string value",
            ));
            continue;
        };
        let Some(link) = raw_item.get("link").and_then(Value::as_str) else {
            parse_errors.push(ParseError::new(
                "Item is missing link property or it is not a string value",
            ));
            continue;
        };
        items.push(SdgGridItem {
            goal: goal.to_owned(),
            link: link.to_owned(),
        });
    }

    SdgGridBlock {
        items,
        parse_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use serde_json::json;

    #[test]
    fn chart_accepts_the_bare_string_form() {
        let block = parse_chart(&json!("/charts/life-expectancy"));
        assert!(block.parse_errors.is_empty());
        assert_eq!(block.url, "/charts/life-expectancy");
    }

    #[test]
    fn chart_without_url_is_an_error_with_empty_url() {
        let block = parse_chart(&json!({}));
        assert_eq!(block.url, "");
        assert_eq!(block.parse_errors.len(), 1);
        assert_eq!(block.parse_errors[0].message, "url property is missing");
    }

    #[test]
    fn chart_missing_caption_is_not_an_error() {
        let block = parse_chart(&json!({ "url": "/charts/x" }));
        assert!(block.parse_errors.is_empty());
        assert!(block.caption.is_none());
    }

    #[test]
    fn chart_url_is_unwrapped_from_anchor_markup() {
        let block = parse_chart(&json!({
            "url": "<a href=\"https://galleypress.org/charts/x\">chart</a>"
        }));
        assert_eq!(block.url, "https://galleypress.org/charts/x");
    }

    #[test]
    fn chart_controls_are_filtered_deduplicated_and_warned() {
        let block = parse_chart(&json!({
            "url": "/charts/x",
            "controls": [
                { "list": ["timeline", "sparkle", "timeline"] },
                { "list": ["relativeToggle"] }
            ]
        }));
        assert_eq!(
            block.controls,
            Some(vec![ChartControl::Timeline, ChartControl::RelativeToggle])
        );
        assert_eq!(block.parse_errors.len(), 1);
        let warning = &block.parse_errors[0];
        assert!(warning.is_warning);
        assert!(warning.message.contains("'sparkle' in 'controls'"));
        assert!(warning.message.contains("relativeToggle"));
    }

    #[test]
    fn chart_tabs_are_omitted_when_none_are_valid() {
        let block = parse_chart(&json!({
            "url": "/charts/x",
            "tabs": [{ "list": ["globe"] }]
        }));
        assert_eq!(block.tabs, None);
        assert_eq!(block.parse_errors.len(), 1);
    }

    #[test]
    fn chart_position_only_accepts_featured() {
        let block = parse_chart(&json!({ "url": "/charts/x", "position": "featured" }));
        assert_eq!(block.position, Some(ChartPosition::Featured));

        let block = parse_chart(&json!({ "url": "/charts/x", "position": "floating" }));
        assert_eq!(block.position, None);
        assert!(block.parse_errors[0].is_warning);
    }

    #[test]
    fn scroller_pairs_alternating_urls_and_texts() {
        let block = parse_scroller(&json!([
            { "type": "url", "value": "u1" },
            { "type": "text", "value": "t1" },
            { "type": "url", "value": "u2" },
            { "type": "text", "value": "t2" },
        ]));
        assert!(block.parse_errors.is_empty());
        assert_eq!(block.blocks.len(), 2);
        assert_eq!(block.blocks[0].url, "u1");
        assert_eq!(block.blocks[0].text.value, vec![Span::simple_text("t1")]);
        assert_eq!(block.blocks[1].url, "u2");
        assert_eq!(block.blocks[1].text.value, vec![Span::simple_text("t2")]);
    }

    #[test]
    fn scroller_discards_a_trailing_item_without_a_url() {
        let block = parse_scroller(&json!([
            { "type": "url", "value": "u1" },
            { "type": "text", "value": "t1" },
            { "type": "text", "value": "orphan" },
        ]));
        // the orphan text overwrote u1's text before the item was flushed,
        // and no new item was started: the lenient parse keeps one item
        assert_eq!(block.blocks.len(), 1);
        assert_eq!(block.blocks[0].url, "u1");
        assert_eq!(
            block.blocks[0].text.value,
            vec![Span::simple_text("orphan")]
        );
    }

    #[test]
    fn scroller_warns_on_foreign_kinds() {
        let block = parse_scroller(&json!([
            { "type": "url", "value": "u1" },
            { "type": "chart", "value": "/charts/x" },
        ]));
        assert_eq!(block.parse_errors.len(), 1);
        assert!(block.parse_errors[0].is_warning);
    }

    #[test]
    fn chart_story_items_fail_independently() {
        let block = parse_chart_story(&json!([
            { "narrative": "n1", "chart": "/charts/a" },
            { "chart": "/charts/b" },
            { "narrative": "n3", "chart": "/charts/c", "technical": { "list": ["uses <i>interpolated</i> data"] } },
        ]));
        assert_eq!(block.items.len(), 2);
        assert_eq!(block.parse_errors.len(), 1);
        assert_eq!(
            block.parse_errors[0].message,
            "Item is missing narrative property or it is not a string value"
        );
        assert_eq!(block.items[1].technical.len(), 1);
    }

    #[test]
    fn chart_story_rejects_the_deprecated_array_technical_tag() {
        let block = parse_chart_story(&json!([
            { "narrative": "n", "chart": "c", "technical": ["old style"] },
        ]));
        assert!(block.items.is_empty());
        assert!(block.parse_errors[0].message.contains("curly braces"));
    }

    #[test]
    fn additional_charts_rejects_the_array_tag_form() {
        let block = parse_additional_charts(&json!(["chart one"]));
        assert!(block.items.is_empty());
        assert!(block.parse_errors[0].message.contains("curly braces"));
    }

    #[test]
    fn additional_charts_parses_list_items_to_spans() {
        let block = parse_additional_charts(&json!({
            "list": ["<a href=\"/charts/a\">Chart A</a>"]
        }));
        assert!(block.parse_errors.is_empty());
        assert_eq!(
            block.items,
            vec![vec![Span::Link {
                url: "/charts/a".to_owned(),
                children: vec![Span::simple_text("Chart A")]
            }]]
        );
    }

    #[test]
    fn sdg_grid_requires_at_least_one_item() {
        let block = parse_sdg_grid(&json!([]));
        assert_eq!(
            block.parse_errors[0].message,
            "SDG Grid must have at least one item"
        );
    }

    #[test]
    fn sdg_grid_items_fail_independently() {
        let block = parse_sdg_grid(&json!([
            { "goal": "No poverty", "link": "/charts/poverty" },
            { "goal": 3 },
        ]));
        assert_eq!(block.items.len(), 1);
        assert_eq!(block.parse_errors.len(), 1);
    }

    #[test]
    fn all_charts_requires_a_heading_and_url_bearing_top_items() {
        let block = parse_all_charts(&json!({ "top": [] }));
        assert_eq!(
            block.parse_errors[0].message,
            "all-charts block missing heading"
        );

        let block = parse_all_charts(&json!({ "heading": "All charts", "top": "x" }));
        assert!(block.parse_errors[0]
            .message
            .contains("malformed \"top\" property: string"));

        let block = parse_all_charts(&json!({
            "heading": "All charts",
            "top": [{ "url": "/charts/a" }]
        }));
        assert!(block.parse_errors.is_empty());
        assert_eq!(block.top, vec![AllChartsItem { url: "/charts/a".to_owned() }]);
    }
}
