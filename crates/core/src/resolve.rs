//! Reference resolution: refs, details-on-demand, and FAQ fragments.
//!
//! These passes run after block parsing over the same grammar. Refs are
//! checked in both directions (every use has a definition, every
//! definition is used); details and faqs build id-keyed dictionaries whose
//! malformed entries are excluded wholesale, with their diagnostics
//! prefixed by the offending id for traceability.

use crate::ast::{EnrichedBlock, RawBlock, TextBlock};
use crate::error::{DocumentError, ParseError};
use crate::parse::{parse_raw_block, parse_text, raw_block_from_value};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

// ──────────────────────────────────────────────
// Refs
// ──────────────────────────────────────────────

/// A resolved footnote-style ref definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    pub id: String,
    /// Position in first-appearance order within the body text; -1 when
    /// the definition is unused (which is also a document error).
    pub index: i64,
    pub content: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

pub type RefDictionary = BTreeMap<String, Ref>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRefs {
    pub definitions: RefDictionary,
    pub errors: Vec<DocumentError>,
}

/// Resolves ref definitions against the ordered set of ref ids as they
/// first appear in body text (see [`ref_ids_in_order`]). Definition
/// content is restricted to text, list and numbered-list blocks.
pub fn parse_refs(refs: &Value, ids_in_order: &[String]) -> ParsedRefs {
    let mut definitions = RefDictionary::new();
    let mut errors: Vec<DocumentError> = Vec::new();

    if let Some(raw_refs) = refs.as_array() {
        for raw_ref in raw_refs {
            // Entries without a string id cannot be resolved at all.
            let Some(id) = raw_ref.get("id").and_then(Value::as_str) else {
                continue;
            };

            if !ids_in_order.iter().any(|used| used.as_str() == id) {
                errors.push(DocumentError::new(
                    "refs",
                    format!("A ref with ID \"{id}\" has been defined but isn't used in this document"),
                ));
            }

            let mut content = Vec::new();
            let mut parse_errors = Vec::new();
            match raw_ref
                .get("content")
                .and_then(Value::as_array)
                .filter(|blocks| !blocks.is_empty())
            {
                None => errors.push(DocumentError::new(
                    "refs",
                    format!(
                        "Ref with ID {id} has no content. \
                         Make sure the ID is defined and it has a [.+content] block"
                    ),
                )),
                Some(raw_content) => {
                    for raw_value in raw_content {
                        match raw_block_from_value(raw_value) {
                            Ok(
                                raw @ (RawBlock::Text(_)
                                | RawBlock::List(_)
                                | RawBlock::NumberedList(_)),
                            ) => {
                                if let Some(block) = parse_raw_block(&raw) {
                                    parse_errors.extend(block.parse_errors().to_vec());
                                    content.push(block);
                                }
                            }
                            Ok(other) => errors.push(DocumentError::new(
                                "refs",
                                format!(
                                    "Unsupported block type \"{}\" in ref with ID \"{id}\"",
                                    other.kind()
                                ),
                            )),
                            Err(_) => errors.push(DocumentError::new(
                                "refs",
                                format!("Unrecognized block in ref with ID \"{id}\""),
                            )),
                        }
                    }
                }
            }

            let index = ids_in_order
                .iter()
                .position(|used| used.as_str() == id)
                .map_or(-1, |position| position as i64);

            definitions.insert(
                id.to_owned(),
                Ref {
                    id: id.to_owned(),
                    index,
                    content,
                    parse_errors,
                },
            );
        }
    }

    for id in ids_in_order {
        if !definitions.contains_key(id) {
            errors.push(DocumentError::new(
                "refs",
                format!(
                    "\"{id}\" is used as a ref ID but no definition for this ref has been written."
                ),
            ));
        }
    }

    ParsedRefs {
        definitions,
        errors,
    }
}

/// Collects distinct ref ids from a document's enriched blocks in first
/// appearance order. This is the ordering input to [`parse_refs`].
pub fn ref_ids_in_order(blocks: &[EnrichedBlock]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    for block in blocks {
        collect_block_ref_ids(block, &mut ids, &mut seen);
    }
    ids
}

fn collect_block_ref_ids(block: &EnrichedBlock, ids: &mut Vec<String>, seen: &mut HashSet<String>) {
    match block {
        EnrichedBlock::Text(text) => collect_span_ref_ids(&text.value, ids, seen),
        EnrichedBlock::Heading(heading) => {
            collect_span_ref_ids(&heading.text, ids, seen);
            if let Some(supertitle) = &heading.supertitle {
                collect_span_ref_ids(supertitle, ids, seen);
            }
        }
        EnrichedBlock::List(list) | EnrichedBlock::NumberedList(list) => {
            for item in &list.items {
                collect_span_ref_ids(&item.value, ids, seen);
            }
        }
        EnrichedBlock::Image(image) => {
            if let Some(caption) = &image.caption {
                collect_span_ref_ids(caption, ids, seen);
            }
        }
        EnrichedBlock::Chart(chart) => {
            if let Some(caption) = &chart.caption {
                collect_span_ref_ids(caption, ids, seen);
            }
        }
        EnrichedBlock::Aside(aside) => collect_span_ref_ids(&aside.caption, ids, seen),
        EnrichedBlock::ChartStory(story) => {
            for item in &story.items {
                collect_span_ref_ids(&item.narrative.value, ids, seen);
                for technical in &item.technical {
                    collect_span_ref_ids(&technical.value, ids, seen);
                }
            }
        }
        EnrichedBlock::Scroller(scroller) => {
            for item in &scroller.blocks {
                collect_span_ref_ids(&item.text.value, ids, seen);
            }
        }
        EnrichedBlock::TopicPageIntro(intro) => {
            for text in &intro.content {
                collect_span_ref_ids(&text.value, ids, seen);
            }
        }
        EnrichedBlock::AdditionalCharts(charts) => {
            for item in &charts.items {
                collect_span_ref_ids(item, ids, seen);
            }
        }
        // Containers: recurse into nested blocks in document order.
        EnrichedBlock::StickyLeft(_)
        | EnrichedBlock::StickyRight(_)
        | EnrichedBlock::SideBySide(_)
        | EnrichedBlock::GraySection(_)
        | EnrichedBlock::Callout(_)
        | EnrichedBlock::ExpandableParagraph(_)
        | EnrichedBlock::Align(_)
        | EnrichedBlock::KeyInsights(_) => {
            for child in block.children() {
                collect_block_ref_ids(child, ids, seen);
            }
        }
        // No spans anywhere in these.
        EnrichedBlock::SimpleText(_)
        | EnrichedBlock::PullQuote(_)
        | EnrichedBlock::HorizontalRule(_)
        | EnrichedBlock::Recirc(_)
        | EnrichedBlock::ProminentLink(_)
        | EnrichedBlock::ResearchAndWriting(_)
        | EnrichedBlock::Html(_)
        | EnrichedBlock::SdgGrid(_)
        | EnrichedBlock::SdgToc(_)
        | EnrichedBlock::MissingData(_)
        | EnrichedBlock::AllCharts(_) => {}
    }
}

fn collect_span_ref_ids(spans: &[Span], ids: &mut Vec<String>, seen: &mut HashSet<String>) {
    for span in spans {
        if let Span::Ref { id, .. } = span {
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
        collect_span_ref_ids(span.children(), ids, seen);
    }
}

// ──────────────────────────────────────────────
// Details on demand
// ──────────────────────────────────────────────

/// A glossary entry. Details never contain rich blocks; their text is
/// parsed with the plain text-block parser only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    pub id: String,
    pub text: Vec<TextBlock>,
    pub parse_errors: Vec<ParseError>,
}

pub type DetailDictionary = BTreeMap<String, Detail>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetails {
    pub details: DetailDictionary,
    pub parse_errors: Vec<ParseError>,
}

/// Parses the glossary's details array. `glossary_doc_id` is the id of the
/// external glossary document, used only for error-message context.
/// Malformed entries are excluded from the dictionary wholesale; their
/// errors are prefixed with the entry id.
pub fn parse_details(details: &Value, glossary_doc_id: &str) -> ParsedDetails {
    let Some(raw_details) = details.as_array() else {
        return ParsedDetails {
            details: DetailDictionary::new(),
            parse_errors: vec![ParseError::new(format!(
                "No details defined in document with id \"{glossary_doc_id}\""
            ))],
        };
    };

    let mut details_by_id = DetailDictionary::new();
    let mut parse_errors = Vec::new();
    for raw_detail in raw_details {
        let detail = parse_detail(raw_detail);
        if detail.parse_errors.is_empty() {
            details_by_id.insert(detail.id.clone(), detail);
        } else {
            parse_errors.extend(detail.parse_errors);
        }
    }

    ParsedDetails {
        details: details_by_id,
        parse_errors,
    }
}

fn parse_detail(raw: &Value) -> Detail {
    fn failed(message: impl Into<String>, id: &str) -> Detail {
        Detail {
            id: id.to_owned(),
            text: Vec::new(),
            parse_errors: vec![ParseError::new(message)],
        }
    }

    if !raw.is_object() {
        return failed("Detail is not a plain-object and cannot be parsed", "");
    }
    let Some(id) = raw.get("id").and_then(Value::as_str) else {
        return failed("Detail does not have an id", "");
    };
    let Some(raw_text) = raw
        .get("text")
        .and_then(Value::as_array)
        .filter(|text| !text.is_empty())
    else {
        return failed(format!("Detail with id \"{id}\" does not have any text"), id);
    };

    let text: Vec<TextBlock> = raw_text
        .iter()
        .map(|item| parse_text(item.get("value").unwrap_or(&Value::Null)))
        .collect();
    let prefix = format!("Text parse error in detail with id \"{id}\": ");
    let parse_errors = text
        .iter()
        .flat_map(|block| block.parse_errors.iter())
        .map(|error| error.prefixed(&prefix))
        .collect();

    Detail {
        id: id.to_owned(),
        text,
        parse_errors,
    }
}

// ──────────────────────────────────────────────
// Faqs
// ──────────────────────────────────────────────

/// A named content fragment. Unlike details, faqs may contain any block
/// kind; entries are rejected wholesale on any nested parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub content: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

pub type FaqDictionary = BTreeMap<String, Faq>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFaqs {
    pub faqs: FaqDictionary,
    pub parse_errors: Vec<ParseError>,
}

/// Parses a document's faqs array. `document_id` is used only for
/// error-message context.
pub fn parse_faqs(faqs: &Value, document_id: &str) -> ParsedFaqs {
    let Some(raw_faqs) = faqs.as_array() else {
        return ParsedFaqs {
            faqs: FaqDictionary::new(),
            parse_errors: vec![ParseError::new(format!(
                "No faqs defined in document with id \"{document_id}\""
            ))],
        };
    };

    let mut faqs_by_id = FaqDictionary::new();
    let mut parse_errors = Vec::new();
    for raw_faq in raw_faqs {
        let faq = parse_faq(raw_faq);
        if faq.parse_errors.is_empty() {
            faqs_by_id.insert(faq.id.clone(), faq);
        } else {
            parse_errors.extend(faq.parse_errors);
        }
    }

    ParsedFaqs {
        faqs: faqs_by_id,
        parse_errors,
    }
}

fn parse_faq(raw: &Value) -> Faq {
    fn failed(message: impl Into<String>, id: &str) -> Faq {
        Faq {
            id: id.to_owned(),
            content: Vec::new(),
            parse_errors: vec![ParseError::new(message)],
        }
    }

    if !raw.is_object() {
        return failed("Faq is not a plain-object and cannot be parsed", "");
    }
    let Some(id) = raw.get("id").and_then(Value::as_str) else {
        return failed("Faq does not have an id", "");
    };
    let Some(raw_content) = raw
        .get("content")
        .and_then(Value::as_array)
        .filter(|content| !content.is_empty())
    else {
        return failed(format!("Faq with id \"{id}\" does not have any blocks"), id);
    };

    let prefix = format!("Block parse error in faq with id \"{id}\": ");
    let mut content = Vec::new();
    let mut parse_errors: Vec<ParseError> = Vec::new();
    for raw_value in raw_content {
        match raw_block_from_value(raw_value) {
            Ok(raw_block) => {
                if let Some(block) = parse_raw_block(&raw_block) {
                    parse_errors.extend(
                        block
                            .parse_errors()
                            .iter()
                            .map(|error| error.prefixed(&prefix)),
                    );
                    content.push(block);
                }
            }
            Err(error) => parse_errors.push(error.prefixed(&prefix)),
        }
    }

    Faq {
        id: id.to_owned(),
        content,
        parse_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_raw_blocks;
    use serde_json::json;

    fn used(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn used_but_undefined_ref_is_one_error() {
        let parsed = parse_refs(&json!([]), &used(&["a"]));
        assert!(parsed.definitions.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].message,
            "\"a\" is used as a ref ID but no definition for this ref has been written."
        );
    }

    #[test]
    fn defined_but_unused_ref_is_one_error() {
        let parsed = parse_refs(
            &json!([{ "id": "b", "content": [{ "type": "text", "value": "note" }] }]),
            &used(&[]),
        );
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].message,
            "A ref with ID \"b\" has been defined but isn't used in this document"
        );
        assert_eq!(parsed.definitions["b"].index, -1);
    }

    #[test]
    fn refs_record_first_appearance_order() {
        let refs = json!([
            { "id": "second", "content": [{ "type": "text", "value": "s" }] },
            { "id": "first", "content": [{ "type": "text", "value": "f" }] },
        ]);
        let parsed = parse_refs(&refs, &used(&["first", "second"]));
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.definitions["first"].index, 0);
        assert_eq!(parsed.definitions["second"].index, 1);
    }

    #[test]
    fn ref_content_is_restricted_to_text_and_lists() {
        let refs = json!([{
            "id": "a",
            "content": [
                { "type": "text", "value": "fine" },
                { "type": "list", "value": ["also fine"] },
                { "type": "chart", "value": "/charts/x" },
            ]
        }]);
        let parsed = parse_refs(&refs, &used(&["a"]));
        assert_eq!(parsed.definitions["a"].content.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].message,
            "Unsupported block type \"chart\" in ref with ID \"a\""
        );
    }

    #[test]
    fn ref_without_content_is_an_error() {
        let parsed = parse_refs(&json!([{ "id": "a", "content": [] }]), &used(&["a"]));
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("has no content"));
    }

    #[test]
    fn ref_ids_collect_in_document_order_across_containers() {
        let raw: Vec<crate::ast::RawBlock> = serde_json::from_value(json!([
            { "type": "text", "value": "a<a href=\"#ref:one\">1</a>" },
            { "type": "gray-section", "value": [
                { "type": "text", "value": "b<a href=\"#ref:two\">2</a>" }
            ]},
            { "type": "text", "value": "c<a href=\"#ref:one\">1</a><a href=\"#ref:three\">3</a>" },
        ]))
        .unwrap();
        let enriched = parse_raw_blocks(&raw);
        assert_eq!(ref_ids_in_order(&enriched), used(&["one", "two", "three"]));
    }

    #[test]
    fn malformed_details_are_excluded_with_prefixed_errors() {
        let details = json!([
            { "id": "good", "text": [{ "type": "text", "value": "plain" }] },
            { "id": "bad", "text": [{ "type": "text", "value": ["not a string"] }] },
            { "text": [{ "type": "text", "value": "no id" }] },
            "not an object",
        ]);
        let parsed = parse_details(&details, "glossary-doc");
        assert_eq!(parsed.details.len(), 1);
        assert!(parsed.details.contains_key("good"));
        let messages: Vec<_> = parsed
            .parse_errors
            .iter()
            .map(|error| error.message.as_str())
            .collect();
        assert!(messages
            .iter()
            .any(|m| m.starts_with("Text parse error in detail with id \"bad\": ")));
        assert!(messages.contains(&"Detail does not have an id"));
        assert!(messages.contains(&"Detail is not a plain-object and cannot be parsed"));
    }

    #[test]
    fn missing_details_input_names_the_glossary_document() {
        let parsed = parse_details(&json!(null), "glossary-doc");
        assert_eq!(
            parsed.parse_errors[0].message,
            "No details defined in document with id \"glossary-doc\""
        );
    }

    #[test]
    fn faqs_accept_rich_content() {
        let faqs = json!([{
            "id": "why",
            "content": [
                { "type": "text", "value": "Because." },
                { "type": "chart", "value": "/charts/x" },
            ]
        }]);
        let parsed = parse_faqs(&faqs, "doc-1");
        assert!(parsed.parse_errors.is_empty());
        assert_eq!(parsed.faqs["why"].content.len(), 2);
    }

    #[test]
    fn faqs_are_rejected_wholesale_on_nested_errors() {
        let faqs = json!([{
            "id": "broken",
            "content": [
                { "type": "text", "value": "fine" },
                { "type": "chart", "value": {} },
            ]
        }]);
        let parsed = parse_faqs(&faqs, "doc-1");
        assert!(parsed.faqs.is_empty());
        assert!(parsed.parse_errors[0]
            .message
            .starts_with("Block parse error in faq with id \"broken\": "));
    }
}
