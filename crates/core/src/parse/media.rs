//! Handlers for the media-adjacent blocks: images and asides.

use super::{opt_str, present_str};
use crate::ast::{AsideBlock, BlockPosition, ImageBlock, ImageSize};
use crate::error::ParseError;
use crate::inline::markup_to_spans;
use serde_json::Value;

pub(super) fn parse_image(value: &Value) -> ImageBlock {
    fn error_block(message: impl Into<String>) -> ImageBlock {
        ImageBlock {
            parse_errors: vec![ParseError::new(message)],
            ..ImageBlock::default()
        }
    }

    let Some(filename) = present_str(value, "filename") else {
        return error_block("filename property is missing or empty");
    };

    // Wide is the default; an explicit but unknown size is a hard error.
    let size = match value.get("size").and_then(Value::as_str) {
        None => ImageSize::Wide,
        Some(keyword) => match ImageSize::from_keyword(keyword) {
            Some(size) => size,
            None => return error_block(format!("Invalid size property: {keyword}")),
        },
    };

    ImageBlock {
        filename: filename.to_owned(),
        alt: opt_str(value, "alt"),
        caption: present_str(value, "caption").map(markup_to_spans),
        size,
        original_width: None,
        parse_errors: Vec::new(),
    }
}

pub(super) fn parse_aside(value: &Value) -> AsideBlock {
    fn error_block(message: impl Into<String>) -> AsideBlock {
        AsideBlock {
            parse_errors: vec![ParseError::new(message)],
            ..AsideBlock::default()
        }
    }

    if !value.is_object() {
        return error_block("Value is a string, not an object with properties");
    }
    let Some(caption) = present_str(value, "caption") else {
        return error_block("Caption property is missing");
    };

    // Anything other than left/right is silently dropped.
    let position = value
        .get("position")
        .and_then(Value::as_str)
        .and_then(BlockPosition::from_keyword);

    AsideBlock {
        caption: markup_to_spans(caption),
        position,
        parse_errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use serde_json::json;

    #[test]
    fn image_requires_a_filename() {
        let block = parse_image(&json!({ "alt": "a chart" }));
        assert_eq!(block.filename, "");
        assert_eq!(
            block.parse_errors[0].message,
            "filename property is missing or empty"
        );
    }

    #[test]
    fn image_defaults_to_wide() {
        let block = parse_image(&json!({ "filename": "poverty.png" }));
        assert!(block.parse_errors.is_empty());
        assert_eq!(block.size, ImageSize::Wide);
        assert!(block.caption.is_none());
    }

    #[test]
    fn image_rejects_unknown_sizes() {
        let block = parse_image(&json!({ "filename": "poverty.png", "size": "huge" }));
        assert_eq!(block.parse_errors[0].message, "Invalid size property: huge");
    }

    #[test]
    fn image_parses_caption_markup() {
        let block = parse_image(&json!({
            "filename": "poverty.png",
            "size": "narrow",
            "caption": "Source: <i>survey</i>"
        }));
        assert_eq!(block.size, ImageSize::Narrow);
        assert_eq!(
            block.caption,
            Some(vec![
                Span::simple_text("Source: "),
                Span::Italic {
                    children: vec![Span::simple_text("survey")]
                }
            ])
        );
    }

    #[test]
    fn aside_requires_a_caption() {
        let block = parse_aside(&json!({}));
        assert_eq!(block.parse_errors[0].message, "Caption property is missing");

        let block = parse_aside(&json!("just text"));
        assert_eq!(
            block.parse_errors[0].message,
            "Value is a string, not an object with properties"
        );
    }

    #[test]
    fn aside_position_tolerates_unknown_keywords() {
        let block = parse_aside(&json!({ "caption": "c", "position": "top" }));
        assert!(block.parse_errors.is_empty());
        assert_eq!(block.position, None);

        let block = parse_aside(&json!({ "caption": "c", "position": "right" }));
        assert_eq!(block.position, Some(BlockPosition::Right));
    }
}
