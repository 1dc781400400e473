use serde::{Deserialize, Serialize};

/// A diagnostic attached to a single content block. Matches the JSON shape
/// consumed by the editing surface exactly: `isWarning` is only present
/// when true, and its absence means a hard error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    #[serde(
        default,
        rename = "isWarning",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_warning: bool,
}

impl ParseError {
    /// A hard error: blocks publication until fixed.
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            is_warning: false,
        }
    }

    /// A warning: surfaced to editors but never blocks downstream use.
    pub fn warning(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            is_warning: true,
        }
    }

    /// The same diagnostic with its message prefixed, used when hoisting
    /// entry-local errors into a document-level list.
    pub fn prefixed(&self, prefix: &str) -> Self {
        ParseError {
            message: format!("{}{}", prefix, self.message),
            is_warning: self.is_warning,
        }
    }
}

/// Severity of a document-level diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A document-level diagnostic produced by cross-block passes (e.g. ref
/// completeness). `property` names the part of the document the error
/// belongs to so the editing surface can attach it to the right field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentError {
    pub property: String,
    pub severity: Severity,
    pub message: String,
}

impl DocumentError {
    pub fn new(property: &str, message: impl Into<String>) -> Self {
        DocumentError {
            property: property.to_owned(),
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_flag_is_omitted_when_false() {
        let err = serde_json::to_value(ParseError::new("url property is missing")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({ "message": "url property is missing" })
        );

        let warn = serde_json::to_value(ParseError::warning("discouraged")).unwrap();
        assert_eq!(
            warn,
            serde_json::json!({ "message": "discouraged", "isWarning": true })
        );
    }

    #[test]
    fn warning_flag_defaults_to_false_on_deserialize() {
        let err: ParseError = serde_json::from_str(r#"{ "message": "m" }"#).unwrap();
        assert!(!err.is_warning);
    }
}
