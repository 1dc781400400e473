//! Handlers for the link-promotion blocks: prominent links, recirc boxes,
//! topic page intros, and research-and-writing sections.
//!
//! These are the blocks where the link taxonomy matters: links to other
//! documents are resolved later from the target's own metadata, so they
//! need no local title or authors, while external links must carry their
//! metadata inline.

use super::{opt_str, present_str, value_kind_name};
use crate::ast::{
    ProminentLinkBlock, RecircBlock, RecircLink, ResearchAndWritingBlock, ResearchAndWritingLink,
    ResearchAndWritingRow, TopicPageIntroBlock, TopicPageIntroDownloadButton,
    TopicPageIntroRelatedTopic,
};
use crate::error::ParseError;
use crate::inline::markup_to_simple_text_block;
use crate::links::{extract_url, is_internal_link, link_kind, parse_authors, LinkKind};
use serde_json::Value;

pub(super) fn parse_prominent_link(value: &Value) -> ProminentLinkBlock {
    fn error_block(message: impl Into<String>) -> ProminentLinkBlock {
        ProminentLinkBlock {
            parse_errors: vec![ParseError::new(message)],
            ..ProminentLinkBlock::default()
        }
    }

    let url = value
        .get("url")
        .and_then(Value::as_str)
        .map(|raw_url| extract_url(raw_url))
        .unwrap_or_default();
    if url.is_empty() {
        return error_block("No url given for the prominent link");
    }

    let title = opt_str(value, "title");
    if !is_internal_link(&url) && title.is_none() {
        return error_block(
            "No title given for the prominent link. \
             If the link points to an external source, it must have a title.",
        );
    }

    ProminentLinkBlock {
        url,
        title,
        description: opt_str(value, "description"),
        thumbnail: opt_str(value, "thumbnail"),
        parse_errors: Vec::new(),
    }
}

pub(super) fn parse_recirc(value: &Value) -> RecircBlock {
    fn error_block(message: impl Into<String>) -> RecircBlock {
        RecircBlock {
            parse_errors: vec![ParseError::new(message)],
            ..RecircBlock::default()
        }
    }

    let Some(title) = present_str(value, "title") else {
        return error_block("Recirc must have a title");
    };
    let Some(raw_links) = value
        .get("links")
        .and_then(Value::as_array)
        .filter(|links| !links.is_empty())
    else {
        return error_block("Recirc must have at least one link");
    };

    let parsed_title = markup_to_simple_text_block(title);
    let mut parse_errors = parsed_title.parse_errors;
    for raw_link in raw_links {
        match present_str(raw_link, "url") {
            None => parse_errors.push(ParseError::new("Recirc link missing url property")),
            // External targets are tolerated but discouraged.
            Some(url) if link_kind(url) != LinkKind::Document => parse_errors.push(
                ParseError::warning("External urls are not supported in recirc blocks"),
            ),
            Some(_) => {}
        }
    }

    RecircBlock {
        title: parsed_title.value,
        links: raw_links
            .iter()
            .map(|raw_link| RecircLink {
                url: opt_str(raw_link, "url").unwrap_or_default(),
            })
            .collect(),
        parse_errors,
    }
}

pub(super) fn parse_topic_page_intro(value: &Value) -> TopicPageIntroBlock {
    fn error_block(message: impl Into<String>) -> TopicPageIntroBlock {
        TopicPageIntroBlock {
            parse_errors: vec![ParseError::new(message)],
            ..TopicPageIntroBlock::default()
        }
    }

    let Some(raw_content) = value.get("content").and_then(Value::as_array) else {
        return error_block("Missing content");
    };

    let mut parse_errors = Vec::new();
    let text_only: Vec<&Value> = raw_content
        .iter()
        .filter(|element| element.get("type").and_then(Value::as_str) == Some("text"))
        .collect();
    if text_only.len() != raw_content.len() {
        parse_errors.push(ParseError::warning(
            "Only paragraphs are supported in topic-page-intro blocks.",
        ));
    }

    let download_button = match value.get("download-button") {
        None | Some(Value::Null) => None,
        Some(raw_button) => {
            let Some(text) = present_str(raw_button, "text") else {
                return error_block("Download button specified but missing text value");
            };
            let Some(url) = present_str(raw_button, "url") else {
                return error_block("Download button specified but missing url value");
            };
            Some(TopicPageIntroDownloadButton {
                text: text.to_owned(),
                url: url.to_owned(),
            })
        }
    };

    let related_topics = match value.get("related-topics").and_then(Value::as_array) {
        None => None,
        Some(raw_topics) => {
            let mut topics = Vec::new();
            for raw_topic in raw_topics {
                let Some(raw_url) = present_str(raw_topic, "url") else {
                    return error_block("A related topic is missing a url");
                };
                let url = extract_url(raw_url);
                let text = opt_str(raw_topic, "text");
                if link_kind(&url) != LinkKind::Document && text.is_none() {
                    return error_block(
                        "A title must be provided for related topics that aren't linked to an internal document",
                    );
                }
                topics.push(TopicPageIntroRelatedTopic { text, url });
            }
            Some(topics)
        }
    };

    TopicPageIntroBlock {
        download_button,
        related_topics,
        content: text_only
            .iter()
            .map(|element| super::text::parse_text(element.get("value").unwrap_or(&Value::Null)))
            .collect(),
        parse_errors,
    }
}

pub(super) fn parse_research_and_writing(value: &Value) -> ResearchAndWritingBlock {
    fn error_block(message: impl Into<String>) -> ResearchAndWritingBlock {
        ResearchAndWritingBlock {
            parse_errors: vec![ParseError::new(message)],
            ..ResearchAndWritingBlock::default()
        }
    }

    let Some(raw_primary) = value.get("primary") else {
        return error_block("Missing primary link");
    };
    let Some(raw_secondary) = value.get("secondary") else {
        return error_block("Missing secondary link");
    };
    let Some(raw_more) = value.get("more") else {
        return error_block("No 'more' section defined");
    };

    let mut parse_errors = Vec::new();
    let primary = enrich_link(Some(raw_primary), false, &mut parse_errors);
    let secondary = enrich_link(Some(raw_secondary), false, &mut parse_errors);
    // The "more" row aggregates links whose thumbnails are never shown, so
    // it skips the filename requirement.
    let more = parse_row(raw_more, true, &mut parse_errors);
    let rows = match value.get("rows").and_then(Value::as_array) {
        Some(raw_rows) => raw_rows
            .iter()
            .map(|raw_row| parse_row(raw_row, false, &mut parse_errors))
            .collect(),
        None => Vec::new(),
    };

    ResearchAndWritingBlock {
        primary,
        secondary,
        more,
        rows,
        parse_errors,
    }
}

fn enrich_link(
    raw_link: Option<&Value>,
    skip_filename_validation: bool,
    parse_errors: &mut Vec<ParseError>,
) -> ResearchAndWritingLink {
    fn failed(message: impl Into<String>, errors: &mut Vec<ParseError>) -> ResearchAndWritingLink {
        errors.push(ParseError::new(message));
        ResearchAndWritingLink::default()
    }

    let Some(link) = raw_link.filter(|link| link.is_object()) else {
        let kind = raw_link.map_or("undefined", value_kind_name);
        return failed(format!("Malformed link data: {kind}"), parse_errors);
    };
    let Some(raw_url) = present_str(link, "url") else {
        return failed("Link missing url", parse_errors);
    };
    let url = extract_url(raw_url);

    let authors = present_str(link, "authors");
    let title = present_str(link, "title");
    let filename = present_str(link, "filename");
    if link_kind(&url) != LinkKind::Document {
        if authors.is_none() {
            return failed(
                format!("Research and writing link with URL \"{url}\" missing authors"),
                parse_errors,
            );
        }
        if title.is_none() {
            return failed(
                format!("Research and writing link with URL \"{url}\" missing title"),
                parse_errors,
            );
        }
        if !skip_filename_validation && filename.is_none() {
            return failed(
                format!("Research and writing link with URL \"{url}\" missing filename"),
                parse_errors,
            );
        }
    }

    ResearchAndWritingLink {
        url,
        authors: authors.map(parse_authors),
        title: title.map(str::to_owned),
        subtitle: opt_str(link, "subtitle"),
        filename: filename.map(str::to_owned),
    }
}

fn parse_row(
    raw_row: &Value,
    skip_filename_validation: bool,
    parse_errors: &mut Vec<ParseError>,
) -> ResearchAndWritingRow {
    match raw_row.get("heading") {
        None | Some(Value::Null) => {
            parse_errors.push(ParseError::new("Row missing \"heading\" value"));
        }
        Some(Value::String(heading)) if heading.is_empty() => {
            parse_errors.push(ParseError::new("Row missing \"heading\" value"));
        }
        Some(Value::String(heading)) => match raw_row.get("articles").and_then(Value::as_array) {
            None => parse_errors.push(ParseError::new(format!(
                "Row with heading {heading} no articles defined. \
                 Be sure to use a \"[.articles]\" tag"
            ))),
            Some(raw_articles) => {
                return ResearchAndWritingRow {
                    heading: heading.clone(),
                    articles: raw_articles
                        .iter()
                        .map(|article| {
                            enrich_link(Some(article), skip_filename_validation, parse_errors)
                        })
                        .collect(),
                }
            }
        },
        Some(_) => {
            parse_errors.push(ParseError::new("Row \"heading\" must be a string"));
        }
    }
    ResearchAndWritingRow::default()
}
