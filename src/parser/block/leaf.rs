// Leaf block recognizers: thematic break, ATX heading, fenced/indented code
// blocks, reference-link definitions, paragraphs.

use crate::ast::{Block, Isp};
use crate::error::{MMarkErr, ParseError};
use crate::parser::line::{indent_width, SourceLine};
use crate::parser::reference::ReferenceTable;
use url::Url;

pub fn try_thematic_break<'a>(lines: &'a [SourceLine<'a>]) -> Option<(Block<Isp>, &'a [SourceLine<'a>])> {
    let line = lines.first()?;
    let stripped: String = line.text.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.len() < 3 {
        return None;
    }
    let first = stripped.chars().next()?;
    if !matches!(first, '*' | '-' | '_') {
        return None;
    }
    if !stripped.chars().all(|c| c == first) {
        return None;
    }
    Some((Block::ThematicBreak, &lines[1..]))
}

pub fn try_atx_heading<'a>(lines: &'a [SourceLine<'a>]) -> Option<(Block<Isp>, &'a [SourceLine<'a>])> {
    let line = lines.first()?;
    let text = line.text;
    if indent_width(text) > 3 {
        return None;
    }
    let trimmed_start = text.trim_start_matches(|c| c == ' ');
    let hashes = trimmed_start.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let after_hashes = &trimmed_start[hashes..];
    let content = if after_hashes.is_empty() {
        ""
    } else if after_hashes.starts_with(' ') || after_hashes.starts_with('\t') {
        after_hashes.trim_start_matches([' ', '\t'])
    } else {
        return None; // '#' run not followed by space/tab/EOL: not an ATX heading
    };

    // Strip an optional trailing closing sequence: whitespace, then one or
    // more '#', then only whitespace to end of line.
    let content = strip_closing_hashes(content);

    let hash_byte_len = text.len() - trimmed_start.len() + hashes;
    let content_start_in_line =
        hash_byte_len + (after_hashes.len() - after_hashes.trim_start_matches([' ', '\t']).len());
    let isp_offset = line.offset + content_start_in_line;

    let isp = Isp::span(isp_offset, content.to_string());
    Some((Block::heading(hashes as u8, isp), &lines[1..]))
}

fn strip_closing_hashes(content: &str) -> &str {
    let trimmed_end = content.trim_end_matches([' ', '\t']);
    let hash_run = trimmed_end.chars().rev().take_while(|&c| c == '#').count();
    if hash_run == 0 {
        return content.trim();
    }
    let before_hashes = &trimmed_end[..trimmed_end.len() - hash_run];
    if before_hashes.is_empty() {
        return content.trim();
    }
    if before_hashes.ends_with([' ', '\t']) {
        before_hashes.trim()
    } else {
        content.trim()
    }
}

pub fn try_fenced_code_block<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
) -> Option<(Block<Isp>, &'a [SourceLine<'a>])> {
    let opener = lines.first()?;
    let alevel = opener.indent_width();
    if alevel >= ref_level + 4 {
        return None;
    }
    let trimmed = opener.text.trim_start_matches([' ']);
    let fence_char = trimmed.chars().next()?;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let info = trimmed[fence_len..].trim().to_string();
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    let info = if info.is_empty() { None } else { Some(info) };

    let mut content = String::new();
    let mut idx = 1usize;
    let mut closed = false;
    while idx < lines.len() {
        let line = &lines[idx];
        let line_indent = line.indent_width();
        let candidate = line.text.trim_start();
        let candidate_fence_len = candidate.chars().take_while(|&c| c == fence_char).count();
        let rest_is_blank = candidate[candidate_fence_len..].trim().is_empty();
        if line_indent < ref_level + 4 && candidate_fence_len >= fence_len && rest_is_blank {
            closed = true;
            idx += 1;
            break;
        }
        let (_, consumed_width) = strip_up_to(line.text, alevel);
        content.push_str(&line.text[consumed_width..]);
        content.push('\n');
        idx += 1;
    }
    if !closed {
        // Unterminated fence: consume to EOF per §4.2 fallback.
    }
    Some((
        Block::CodeBlock { info, content },
        &lines[idx..],
    ))
}

/// Strip up to `columns` of leading whitespace, tab-aware. Returns
/// `(consumed_width, consumed_bytes)`.
fn strip_up_to(text: &str, columns: usize) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for c in text.chars() {
        if width >= columns {
            break;
        }
        match c {
            ' ' => {
                width += 1;
                bytes += 1;
            }
            '\t' => {
                width += 4 - (width % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (width, bytes)
}

pub fn try_indented_code_block<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
) -> Option<(Block<Isp>, &'a [SourceLine<'a>])> {
    let first = lines.first()?;
    if first.indent_width() < ref_level + 4 {
        return None;
    }
    let mut idx = 0usize;
    let mut content_lines: Vec<String> = Vec::new();
    let mut trailing_blanks = 0usize;
    while idx < lines.len() {
        let line = &lines[idx];
        if line.is_blank() {
            content_lines.push(String::new());
            trailing_blanks += 1;
            idx += 1;
            continue;
        }
        if line.indent_width() < ref_level + 4 {
            break;
        }
        let strip_cols = ref_level + 3;
        let (_, bytes) = strip_up_to(line.text, strip_cols);
        content_lines.push(line.text[bytes..].to_string());
        trailing_blanks = 0;
        idx += 1;
    }
    // Trim the trailing blank lines that don't precede further content.
    for _ in 0..trailing_blanks {
        content_lines.pop();
        idx -= 1;
    }
    if content_lines.is_empty() {
        return None;
    }
    let content = content_lines.join("\n");
    Some((
        Block::CodeBlock { info: None, content },
        &lines[idx..],
    ))
}

/// `[label]:` destination [title]. Registers into `references`; on a
/// duplicate label, records a `DuplicateReferenceDefinition` error and
/// leaves the first definition in place. Consumes no visible block.
pub fn try_reference_definition<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
    references: &mut ReferenceTable,
    errors: &mut Vec<ParseError>,
) -> Option<&'a [SourceLine<'a>]> {
    let first = lines.first()?;
    if first.indent_width() >= ref_level + 4 {
        return None;
    }
    let text = first.text.trim_start();
    if !text.starts_with('[') {
        return None;
    }
    let close = text.find("]:")?;
    let label = &text[1..close];
    if label.trim().is_empty() {
        return None;
    }
    let after = text[close + 2..].trim_start();

    // Gather the rest of the definition: destination, then optional title,
    // possibly continued on the next line.
    let mut combined = after.to_string();
    let mut consumed = 1usize;
    if combined.trim().is_empty() && lines.len() > 1 {
        combined = lines[1].text.trim().to_string();
        consumed = 2;
    }

    let (dest_str, rest_after_dest) = parse_destination(&combined)?;
    let title = parse_title(rest_after_dest.trim())
        .or_else(|| {
            if rest_after_dest.trim().is_empty() && lines.len() > consumed {
                parse_title(lines[consumed].text.trim()).inspect(|_| consumed += 1)
            } else {
                None
            }
        });

    let dest = match Url::parse(&dest_str) {
        Ok(url) => url,
        Err(_) => return Some(&lines[consumed..]),
    };

    if !references.insert(label, dest, title) {
        let offset = first.offset + (first.text.len() - text.len());
        errors.push(ParseError::new(
            offset,
            MMarkErr::DuplicateReferenceDefinition(label.trim().to_string()),
        ));
    }
    Some(&lines[consumed..])
}

fn parse_destination(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('<') {
        let end = rest.find('>')?;
        Some((rest[..end].to_string(), &rest[end + 1..]))
    } else {
        let end = s
            .find(|c: char| c.is_whitespace())
            .unwrap_or(s.len());
        if end == 0 {
            return None;
        }
        Some((s[..end].to_string(), &s[end..]))
    }
}

fn parse_title(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (open, close) = match s.chars().next()? {
        '"' => ('"', '"'),
        '\'' => ('\'', '\''),
        '(' => ('(', ')'),
        _ => return None,
    };
    let rest = &s[open.len_utf8()..];
    let end = rest.rfind(close)?;
    Some(rest[..end].to_string())
}

/// Consume non-blank lines up to the next block-starting line or EOF.
/// `naked_allowed` selects `Naked` (list-item body) over `Paragraph`.
pub fn parse_paragraph<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
    naked_allowed: bool,
) -> (Block<Isp>, &'a [SourceLine<'a>]) {
    let first = lines.first().expect("paragraph requires at least one line");
    let offset = first.offset;
    let mut text_lines: Vec<&str> = Vec::new();
    let mut idx = 0usize;
    while idx < lines.len() {
        let line = &lines[idx];
        if line.is_blank() {
            break;
        }
        if idx > 0 && starts_other_block(line, ref_level) {
            break;
        }
        text_lines.push(line.text);
        idx += 1;
    }
    let joined = text_lines.join("\n");
    let trimmed_end = joined.trim_end();
    let isp = Isp::span(offset, trimmed_end.to_string());
    let block = if naked_allowed {
        Block::Naked(isp)
    } else {
        Block::Paragraph(isp)
    };
    (block, &lines[idx..])
}

fn starts_other_block(line: &SourceLine, ref_level: usize) -> bool {
    if line.indent_width() >= ref_level + 4 {
        return false; // paragraph continuation lines aren't reinterpreted as code
    }
    try_thematic_break(std::slice::from_ref(line)).is_some()
        || try_atx_heading(std::slice::from_ref(line)).is_some()
        || is_fence_opener(line)
        || is_list_marker_start(line)
        || is_blockquote_marker(line)
}

fn is_fence_opener(line: &SourceLine) -> bool {
    let trimmed = line.text.trim_start_matches(' ');
    matches!(trimmed.chars().next(), Some('`') | Some('~'))
        && trimmed.chars().take_while(|&c| Some(c) == trimmed.chars().next()).count() >= 3
}

fn is_list_marker_start(line: &SourceLine) -> bool {
    let trimmed = line.text.trim_start_matches(' ');
    match trimmed.chars().next() {
        Some(c) if matches!(c, '-' | '+' | '*') => {
            trimmed[c.len_utf8()..].starts_with([' ', '\t']) || trimmed[c.len_utf8()..].is_empty()
        }
        Some(c) if c.is_ascii_digit() => {
            let digits: String = trimmed.chars().take_while(|d| d.is_ascii_digit()).collect();
            let after = &trimmed[digits.len()..];
            matches!(after.chars().next(), Some('.') | Some(')'))
        }
        _ => false,
    }
}

fn is_blockquote_marker(line: &SourceLine) -> bool {
    line.text.trim_start_matches(' ').starts_with('>')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line::split_lines;

    #[test]
    fn recognizes_thematic_break_variants() {
        for text in ["---", "***", "___", "- - -", "* * * *"] {
            let lines = split_lines(text);
            assert!(try_thematic_break(&lines).is_some(), "{text}");
        }
    }

    #[test]
    fn rejects_two_char_runs() {
        let lines = split_lines("--");
        assert!(try_thematic_break(&lines).is_none());
    }

    #[test]
    fn atx_heading_strips_trailing_hashes() {
        let lines = split_lines("## Hello ##");
        let (block, _) = try_atx_heading(&lines).unwrap();
        match block {
            Block::Heading { level, content: Isp::Span { text, .. } } => {
                assert_eq!(level, 2);
                assert_eq!(text, "Hello");
            }
            _ => panic!("expected heading"),
        }
    }

    #[test]
    fn fenced_code_block_strips_indentation_and_keeps_info() {
        let lines = split_lines("```rust\nfn x() {}\n```\n");
        let (block, rest) = try_fenced_code_block(&lines, 0).unwrap();
        match block {
            Block::CodeBlock { info, content } => {
                assert_eq!(info.as_deref(), Some("rust"));
                assert_eq!(content, "fn x() {}\n");
            }
            _ => panic!("expected code block"),
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn reference_definition_registers_label() {
        let lines = split_lines("[foo]: /url \"title\"");
        let mut refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let rest = try_reference_definition(&lines, 0, &mut refs, &mut errors).unwrap();
        assert!(rest.is_empty());
        let (url, title) = refs.get("foo").unwrap();
        assert_eq!(url.as_str(), "/url");
        assert_eq!(title.as_deref(), Some("title"));
        assert!(errors.is_empty());
    }
}
