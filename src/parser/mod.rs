// Two-phase parsing pipeline: `block` segments the document into a tree of
// `Block<Isp>` (collecting YAML front matter and reference definitions along
// the way), then `inline` resolves each `Isp` against the finished reference
// table into `NonEmptyVec<Inline>`.

pub mod block;
pub mod inline;
pub mod line;
pub mod reference;
pub mod yaml;

use crate::ast::{Block, Isp, NonEmptyVec, Inline};
use crate::error::{ParseError, ParseErrorBundle};
use serde_json::Value as JsonValue;

pub struct ParsedDocument {
    pub yaml: Option<JsonValue>,
    pub blocks: Vec<Block<NonEmptyVec<Inline>>>,
    pub errors: Vec<ParseError>,
}

/// Run both parsing phases over `input`. Always returns a document — even a
/// badly malformed one resolves to *something*, with the damage recorded as
/// `Isp::Error`/`Inline::Plain` fallbacks — plus whatever errors were
/// collected, which the caller bundles into a `ParseErrorBundle` if
/// non-empty (see `crate::parse`).
pub fn parse(input: &str) -> ParsedDocument {
    let block_result = block::parse_document(input);
    let mut errors = block_result.errors;

    let blocks = block_result
        .blocks
        .into_iter()
        .map(|b| {
            b.map(&mut |isp: Isp| inline::resolve(isp, &block_result.references, &mut errors))
        })
        .collect();

    ParsedDocument {
        yaml: block_result.yaml,
        blocks,
        errors,
    }
}

pub fn into_bundle(file_name: &str, input: &str, errors: Vec<ParseError>) -> Option<ParseErrorBundle> {
    if errors.is_empty() {
        None
    } else {
        Some(ParseErrorBundle::new(file_name, input, errors))
    }
}
