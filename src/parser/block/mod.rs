// Block-level parser: front matter extraction, then the per-block dispatch
// loop described in §4.2. Produces a tree of `Block<Isp>` — inline content
// is left as unresolved spans for the inline parser to pick up later.

mod container;
mod leaf;
mod table;

use crate::ast::{Block, Isp};
use crate::error::ParseError;
use crate::parser::line::{split_lines, SourceLine};
use crate::parser::reference::ReferenceTable;
use crate::parser::yaml::decode_yaml_err;
use serde_json::Value as JsonValue;

pub struct BlockParseResult {
    pub yaml: Option<JsonValue>,
    pub blocks: Vec<Block<Isp>>,
    pub references: ReferenceTable,
    pub errors: Vec<ParseError>,
}

/// Threaded through the recursive descent: the reference table being built
/// up (definitions can appear anywhere at the top level or inside a
/// container) and the errors collected along the way.
pub(crate) struct Ctx {
    pub references: ReferenceTable,
    pub errors: Vec<ParseError>,
}

pub fn parse_document(input: &str) -> BlockParseResult {
    let (yaml, body_offset, yaml_err) = extract_front_matter(input);
    let lines = split_lines(&input[body_offset..]);
    let lines: Vec<SourceLine> = lines
        .into_iter()
        .map(|l| SourceLine::new(l.text, l.offset + body_offset))
        .collect();

    let mut ctx = Ctx {
        references: ReferenceTable::new(),
        errors: Vec::new(),
    };
    if let Some(err) = yaml_err {
        ctx.errors.push(err);
    }
    let blocks = parse_blocks(&lines, 0, false, &mut ctx);

    BlockParseResult {
        yaml,
        blocks,
        references: ctx.references,
        errors: ctx.errors,
    }
}

/// `---\n...yaml...\n---\n` at the very start of the document. Returns the
/// decoded value, the byte offset at which the document body begins, and —
/// on a malformed front-matter block — a `YamlParseError` located at the
/// opening `---` (per §4.2 step 1: parsing continues with `yaml: None`, but
/// the error still surfaces in the bundle per §7).
fn extract_front_matter(input: &str) -> (Option<JsonValue>, usize, Option<ParseError>) {
    let fence = "---";
    if !input.starts_with(fence) {
        return (None, 0, None);
    }
    let after_fence = &input[fence.len()..];
    if !after_fence.starts_with(['\n', '\r']) {
        return (None, 0, None);
    }
    let body_start = fence.len() + newline_len(after_fence);
    find_front_matter_close(input, body_start)
}

fn newline_len(s: &str) -> usize {
    if s.starts_with("\r\n") {
        2
    } else {
        1
    }
}

fn find_front_matter_close(input: &str, body_start: usize) -> (Option<JsonValue>, usize, Option<ParseError>) {
    let rest = &input[body_start..];
    for line in split_lines(rest) {
        let trimmed = line.text.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml_text = &rest[..line.offset];
            let after_close_rel = line.offset + line.text.len();
            let after_close = &rest[after_close_rel..];
            let skip = newline_len_or_zero(after_close);
            let new_body_offset = body_start + after_close_rel + skip;
            return match decode_yaml_err(yaml_text) {
                Ok(value) => (Some(value), new_body_offset, None),
                Err(kind) => (None, new_body_offset, Some(ParseError::new(0, kind))),
            };
        }
    }
    (None, 0, None)
}

fn newline_len_or_zero(s: &str) -> usize {
    if s.is_empty() {
        0
    } else {
        newline_len(s)
    }
}

/// Recursively parse a run of lines into a list of sibling blocks. `ref_level`
/// is the indentation (in columns) that has already been consumed by
/// enclosing containers; `naked_allowed` selects `Block::Naked` over
/// `Block::Paragraph` for bare-inline content (tight list items).
pub(crate) fn parse_blocks<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
    naked_allowed: bool,
    ctx: &mut Ctx,
) -> Vec<Block<Isp>> {
    let mut blocks = Vec::new();
    let mut lines = lines;

    loop {
        while let Some(line) = lines.first() {
            if line.is_blank() {
                lines = &lines[1..];
            } else {
                break;
            }
        }
        if lines.is_empty() {
            break;
        }

        if lines[0].indent_width() >= ref_level + 4 {
            if let Some((block, rest)) = leaf::try_indented_code_block(lines, ref_level) {
                blocks.push(block);
                lines = rest;
                continue;
            }
        }

        if let Some((block, rest)) = leaf::try_thematic_break(lines) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = leaf::try_atx_heading(lines) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = leaf::try_fenced_code_block(lines, ref_level) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = table::try_pipe_table(lines, ref_level) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = container::try_unordered_list(lines, ref_level, ctx) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = container::try_ordered_list(lines, ref_level, ctx) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some((block, rest)) = container::try_blockquote(lines, ref_level, ctx) {
            blocks.push(block);
            lines = rest;
            continue;
        }
        if let Some(rest) = leaf::try_reference_definition(lines, ref_level, &mut ctx.references, &mut ctx.errors) {
            lines = rest;
            continue;
        }

        let (block, rest) = leaf::parse_paragraph(lines, ref_level, naked_allowed);
        blocks.push(block);
        lines = rest;
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_front_matter_and_leaves_body_offset() {
        let input = "---\ntitle: Hi\n---\n# Heading\n";
        let (yaml, offset, err) = extract_front_matter(input);
        let yaml = yaml.unwrap();
        assert_eq!(yaml["title"], "Hi");
        assert_eq!(&input[offset..], "# Heading\n");
        assert!(err.is_none());
    }

    #[test]
    fn no_front_matter_leaves_whole_document() {
        let input = "# Heading\n";
        let (yaml, offset, err) = extract_front_matter(input);
        assert!(yaml.is_none());
        assert_eq!(offset, 0);
        assert!(err.is_none());
    }

    #[test]
    fn malformed_front_matter_reports_yaml_parse_error() {
        let input = "---\n: : :\n\tbad\n---\n# Heading\n";
        let result = parse_document(input);
        assert!(result.yaml.is_none());
        assert!(result.errors.iter().any(|e| matches!(e.kind, crate::error::MMarkErr::YamlParseError(_))));
    }

    #[test]
    fn parses_heading_then_paragraph() {
        let result = parse_document("# Title\n\nSome text.\n");
        assert_eq!(result.blocks.len(), 2);
        assert!(matches!(result.blocks[0], Block::Heading { level: 1, .. }));
        assert!(matches!(result.blocks[1], Block::Paragraph(_)));
    }
}
