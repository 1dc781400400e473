//! galley-core: content pipeline core library.
//!
//! Converts documents authored in an external word-processor-style editor
//! into a strongly-typed, renderer-agnostic content block tree,
//! accumulating diagnostics along the way instead of failing outright:
//!
//! 1. [`flatten_document`] -- editor document -> linear markup string
//!    (consumed by the external markup tokenizer)
//! 2. [`parse_raw_block`] -- tokenizer raw block -> enriched block, with
//!    per-block parse errors and recursive container handling
//! 3. [`resolve`] -- refs / details / faq dictionaries over the same
//!    block grammar, with document-level completeness checks
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`RawBlock`] / [`EnrichedBlock`] -- the block grammar
//! - [`Span`] -- the inline-formatting tree
//! - [`ParseError`] / [`DocumentError`] -- block- and document-level
//!   diagnostics
//! - [`SourceDocument`] -- the editor's document export model

pub mod ast;
pub mod doc;
pub mod error;
pub mod flatten;
pub mod inline;
pub mod links;
pub mod parse;
pub mod resolve;
pub mod span;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{EnrichedBlock, RawBlock};
pub use doc::{DocError, SourceDocument};
pub use error::{DocumentError, ParseError, Severity};
pub use span::{SimpleText, Span};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use flatten::{flatten_document, Flattened};
pub use inline::{markup_to_simple_text_block, markup_to_spans, markup_to_text_block};
pub use parse::{parse_raw_block, parse_raw_blocks, parse_simple_text, parse_text};
pub use resolve::{parse_details, parse_faqs, parse_refs, ref_ids_in_order};
