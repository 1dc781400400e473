//! Document flattening: editor document -> linear markup string.
//!
//! The flattener walks the document's paragraph list once, left to right,
//! and emits the line-oriented markup the external tokenizer consumes:
//! `[.list]` / `[]` list delimiters, `* ` bullets, block tags for headings
//! and horizontal rules, and inline markup (via the span serializer) for
//! everything else. The only state carried across the pass is whether we
//! are currently inside a list.

use crate::doc::{Paragraph, SourceDocument};
use crate::span::{span_from_text_run, span_to_markup};

/// Named paragraph styles carrying a heading level, e.g. `HEADING_2`.
const HEADING_STYLE_PREFIX: &str = "HEADING_";

const LIST_OPEN: &str = "\n[.list]\n";
const LIST_CLOSE: &str = "[]\n";
const HORIZONTAL_RULE_TAG: &str = "\n{.horizontal-rule}\n";

/// The flattened form of a document, ready for the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub text: String,
}

/// Flattens a document into a single markup string. A document without a
/// body (or without content) flattens to the empty string; that is a valid
/// empty document, not an error.
pub fn flatten_document(document: &SourceDocument) -> Flattened {
    let mut text = String::new();
    let mut is_in_list = false;

    let Some(body) = &document.body else {
        return Flattened { text };
    };

    for element in &body.content {
        let Some(paragraph) = &element.paragraph else {
            continue;
        };

        // Open or close the list exactly once at each membership boundary,
        // not per item.
        let needs_bullet = paragraph.bullet.is_some();
        if needs_bullet && !is_in_list {
            is_in_list = true;
            text.push_str(LIST_OPEN);
        } else if !needs_bullet && is_in_list {
            is_in_list = false;
            text.push_str(LIST_CLOSE);
        }

        let mut paragraph_text = String::new();
        for (idx, value) in paragraph.elements.iter().enumerate() {
            // Only the first run of a list item gets the bullet.
            if needs_bullet && idx == 0 {
                paragraph_text.push_str("* ");
            }
            if let Some(run) = &value.text_run {
                paragraph_text.push_str(&span_to_markup(&span_from_text_run(run)));
            } else if value.horizontal_rule.is_some() {
                paragraph_text.push_str(HORIZONTAL_RULE_TAG);
            }
        }

        match heading_level(paragraph) {
            Some(level) => text.push_str(&heading_tag(paragraph_text.trim(), level)),
            None => text.push_str(&paragraph_text),
        }
    }

    Flattened { text }
}

/// The heading level carried by a paragraph's named style, as the raw
/// string following the fixed prefix. Validation of the numeric range
/// happens in the block parser, not here.
fn heading_level(paragraph: &Paragraph) -> Option<&str> {
    paragraph
        .paragraph_style
        .as_ref()?
        .named_style_type
        .as_deref()?
        .strip_prefix(HEADING_STYLE_PREFIX)
}

fn heading_tag(text: &str, level: &str) -> String {
    format!("\n{{.heading}}\ntext: {text}\nlevel: {level}\n{{}}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{
        Bullet, DocumentBody, Paragraph, ParagraphElement, ParagraphStyle, SourceDocument,
        StructuralElement, TextRun, TextStyle,
    };

    fn paragraph(runs: &[&str]) -> Paragraph {
        Paragraph {
            elements: runs
                .iter()
                .map(|content| ParagraphElement {
                    text_run: Some(TextRun {
                        content: Some((*content).to_owned()),
                        text_style: None,
                    }),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn document(paragraphs: Vec<Paragraph>) -> SourceDocument {
        SourceDocument {
            body: Some(DocumentBody {
                content: paragraphs
                    .into_iter()
                    .map(|p| StructuralElement { paragraph: Some(p) })
                    .collect(),
            }),
        }
    }

    #[test]
    fn missing_body_flattens_to_empty_string() {
        let flattened = flatten_document(&SourceDocument::default());
        assert_eq!(flattened.text, "");
    }

    #[test]
    fn plain_paragraphs_concatenate_their_runs() {
        let flattened = flatten_document(&document(vec![paragraph(&["Hello ", "world\n"])]));
        assert_eq!(flattened.text, "Hello world\n");
    }

    #[test]
    fn list_markers_are_emitted_once_per_transition() {
        let mut item1 = paragraph(&["first\n"]);
        item1.bullet = Some(Bullet::default());
        let mut item2 = paragraph(&["second\n"]);
        item2.bullet = Some(Bullet::default());

        let flattened = flatten_document(&document(vec![
            paragraph(&["before\n"]),
            item1,
            item2,
            paragraph(&["after\n"]),
        ]));
        assert_eq!(
            flattened.text,
            "before\n\n[.list]\n* first\n* second\n[]\nafter\n"
        );
    }

    #[test]
    fn bullet_prefixes_only_the_first_run() {
        let mut item = paragraph(&["first ", "half\n"]);
        item.bullet = Some(Bullet::default());
        let flattened = flatten_document(&document(vec![item]));
        assert_eq!(flattened.text, "\n[.list]\n* first half\n");
    }

    #[test]
    fn headings_wrap_in_a_block_tag_with_their_level() {
        let mut heading = paragraph(&["A heading\n"]);
        heading.paragraph_style = Some(ParagraphStyle {
            named_style_type: Some("HEADING_2".to_owned()),
        });
        let flattened = flatten_document(&document(vec![heading]));
        assert_eq!(
            flattened.text,
            "\n{.heading}\ntext: A heading\nlevel: 2\n{}\n"
        );
    }

    #[test]
    fn normal_style_is_not_a_heading() {
        let mut p = paragraph(&["body\n"]);
        p.paragraph_style = Some(ParagraphStyle {
            named_style_type: Some("NORMAL_TEXT".to_owned()),
        });
        let flattened = flatten_document(&document(vec![p]));
        assert_eq!(flattened.text, "body\n");
    }

    #[test]
    fn horizontal_rule_elements_emit_their_block_tag() {
        let rule = Paragraph {
            elements: vec![ParagraphElement {
                horizontal_rule: Some(serde_json::json!({})),
                ..Default::default()
            }],
            ..Default::default()
        };
        let flattened = flatten_document(&document(vec![rule]));
        assert_eq!(flattened.text, "\n{.horizontal-rule}\n");
    }

    #[test]
    fn styled_runs_flatten_to_inline_markup() {
        let mut p = Paragraph::default();
        p.elements = vec![ParagraphElement {
            text_run: Some(TextRun {
                content: Some("important".to_owned()),
                text_style: Some(TextStyle {
                    bold: Some(true),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }];
        let flattened = flatten_document(&document(vec![p]));
        assert_eq!(flattened.text, "<b>important</b>");
    }

    #[test]
    fn a_list_at_document_end_stays_open_in_markup() {
        // The tokenizer closes any still-open list at end of input; the
        // flattener only emits the close marker on a transition.
        let mut item = paragraph(&["only\n"]);
        item.bullet = Some(Bullet::default());
        let flattened = flatten_document(&document(vec![paragraph(&["x\n"]), item]));
        assert_eq!(flattened.text, "x\n\n[.list]\n* only\n");
    }
}
