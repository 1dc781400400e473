//! Serde model of the editor's document export.
//!
//! The external word-processor exposes documents as JSON: a body holding a
//! list of structural elements, each optionally a paragraph made of styled
//! text runs. Only the fields the flattener consumes are modeled; everything
//! else in the export is ignored by serde. Field names mirror the editor's
//! camelCase wire format.

use serde::{Deserialize, Serialize};

/// Failure to ingest an editor document export. This is the one fallible
/// boundary of the crate; everything past it accumulates diagnostics
/// instead of returning errors.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A document as exported by the editor. A missing body (or a body with no
/// content) is a valid empty document, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<DocumentBody>,
}

impl SourceDocument {
    pub fn from_json_str(json: &str) -> Result<SourceDocument, DocError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<SourceDocument, DocError> {
        Ok(serde_json::from_value(json)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One element of the document body. Non-paragraph elements (tables,
/// section breaks) are not flattened and deserialize to an empty shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    /// Present exactly when the paragraph is a list item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Bullet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
}

/// List-item marker. Only its presence matters to the flattener.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nesting_level: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    /// Named style, e.g. `NORMAL_TEXT` or `HEADING_3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
}

/// One run inside a paragraph: either a styled text run or an embedded
/// horizontal-rule marker. Other element kinds deserialize to an empty
/// shell and flatten to nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_rule: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// `SUPERSCRIPT` or `SUBSCRIPT`; anything else is treated as unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
