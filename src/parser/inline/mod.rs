// Inline-phase resolution: turns each block's `Isp` into a `NonEmptyVec<Inline>`
// against the finished reference table. Delimiter runs (`*_~^`) are matched
// by flanking rules (§4.3); code spans, links, images, and autolinks are
// recognized by their fixed delimiter pairs.

mod link;

use crate::ast::{Inline, Isp, NonEmptyVec};
use crate::error::{MMarkErr, ParseError};
use crate::lexical::{classify, decode_escape, decode_named_entity, decode_numeric_reference, CharClass};
use crate::parser::reference::ReferenceTable;

use link::{find_code_span_close, try_autolink, try_link_or_image};

pub fn resolve(isp: Isp, references: &ReferenceTable, errors: &mut Vec<ParseError>) -> NonEmptyVec<Inline> {
    match isp {
        Isp::Error(e) => {
            errors.push(e);
            NonEmptyVec::new(Inline::Plain(String::new()))
        }
        Isp::Span { offset, text } => {
            let inlines = parse_run(&text, offset, references, errors, false, false);
            NonEmptyVec::from_vec(inlines).unwrap_or_else(|| NonEmptyVec::new(Inline::Plain(String::new())))
        }
    }
}

/// Parse one span of raw text (a block's content, or the text inside a
/// link/emphasis span) into a flat sequence of `Inline`s. `base_offset` is
/// the absolute byte offset of `text[0]` in the original document, so
/// errors raised while parsing `text` are located correctly. `links_disallowed`
/// and `images_disallowed` carry the §4.3/§5 nesting restrictions: set while
/// descending into a link's own text (no nested links) or an image's alt text
/// (no nested images).
pub(crate) fn parse_run(
    text: &str,
    base_offset: usize,
    references: &ReferenceTable,
    errors: &mut Vec<ParseError>,
    links_disallowed: bool,
    images_disallowed: bool,
) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut pos = 0usize;

    macro_rules! flush {
        () => {
            if !buf.is_empty() {
                out.push(Inline::Plain(std::mem::take(&mut buf)));
            }
        };
    }

    while pos < text.len() {
        let rest = &text[pos..];
        let c = rest.chars().next().unwrap();

        match c {
            '\\' => {
                if let Some((decoded, consumed)) = decode_escape(rest) {
                    buf.push(decoded);
                    pos += consumed;
                } else if rest[1..].starts_with('\n') {
                    flush!();
                    out.push(Inline::LineBreak);
                    pos += 2;
                } else if rest[1..].starts_with("\r\n") {
                    flush!();
                    out.push(Inline::LineBreak);
                    pos += 3;
                } else {
                    buf.push('\\');
                    pos += 1;
                }
            }

            '&' => match decode_named_entity(rest).or_else(|| decode_numeric_reference(rest)) {
                Some(Ok((decoded, consumed))) => {
                    buf.push_str(&decoded);
                    pos += consumed;
                }
                Some(Err(kind)) => {
                    errors.push(ParseError::new(base_offset + pos, kind));
                    buf.push('&');
                    pos += 1;
                }
                None => {
                    buf.push('&');
                    pos += 1;
                }
            },

            '`' => {
                let run_len = rest.chars().take_while(|&ch| ch == '`').count();
                match find_code_span_close(text, pos + run_len, run_len) {
                    Some((content, close_end)) => {
                        flush!();
                        out.push(Inline::CodeSpan(content));
                        pos = close_end;
                    }
                    None => {
                        buf.push_str(&"`".repeat(run_len));
                        pos += run_len;
                    }
                }
            }

            '<' => match try_autolink(rest) {
                Some((inline, consumed)) => {
                    flush!();
                    out.push(inline);
                    pos += consumed;
                }
                None => {
                    buf.push('<');
                    pos += 1;
                }
            },

            '!' if rest[1..].starts_with('[') && !images_disallowed => {
                match try_link_or_image(
                    text,
                    pos + 1,
                    base_offset,
                    references,
                    errors,
                    true,
                    links_disallowed,
                    images_disallowed,
                ) {
                    Some((inline, end)) => {
                        flush!();
                        out.push(inline);
                        pos = end;
                    }
                    None => {
                        buf.push('!');
                        pos += 1;
                    }
                }
            }

            '[' if !links_disallowed => {
                match try_link_or_image(
                    text,
                    pos,
                    base_offset,
                    references,
                    errors,
                    false,
                    links_disallowed,
                    images_disallowed,
                ) {
                    Some((inline, end)) => {
                        flush!();
                        out.push(inline);
                        pos = end;
                    }
                    None => {
                        buf.push('[');
                        pos += 1;
                    }
                }
            }

            '*' | '_' | '~' | '^' => {
                let run_len = rest.chars().take_while(|&ch| ch == c).count();
                match try_delimited_span(
                    text,
                    pos,
                    run_len,
                    c,
                    base_offset,
                    references,
                    errors,
                    links_disallowed,
                    images_disallowed,
                ) {
                    Some((inline, end)) => {
                        flush!();
                        out.push(inline);
                        pos = end;
                    }
                    None => {
                        buf.push_str(&c.to_string().repeat(run_len));
                        pos += run_len;
                    }
                }
            }

            '\n' | '\r' => {
                let trailing_spaces = buf.chars().rev().take_while(|&ch| ch == ' ').count();
                if trailing_spaces >= 2 {
                    let cut = buf.len() - trailing_spaces;
                    let before = buf[..cut].to_string();
                    buf.clear();
                    if !before.is_empty() {
                        out.push(Inline::Plain(before));
                    }
                    out.push(Inline::LineBreak);
                } else {
                    buf.push(' ');
                }
                pos += if c == '\r' && rest[1..].starts_with('\n') { 2 } else { 1 };
            }

            other => {
                buf.push(other);
                pos += other.len_utf8();
            }
        }
    }

    flush!();
    out
}

/// §4.3's literal flanking rule: under the `Space < Punct < Other` total
/// order, a run is left-flanking iff `last_char_type < next_char_type` and
/// right-flanking iff `last_char_type > next_char_type` — a strict
/// comparison, not CommonMark's punctuation-aware formula.
fn left_flanking(before: CharClass, after: CharClass) -> bool {
    before < after
}

fn right_flanking(before: CharClass, after: CharClass) -> bool {
    before > after
}

/// Attempt to match the delimiter run starting at `pos` (length `run_len`,
/// character `delim`) against a same-length closing run later in `text`.
/// Equal-length matching only: a run of mismatched length than its closer
/// is left as literal text rather than being partially split, a documented
/// simplification of the full CommonMark delimiter-stack algorithm (see
/// DESIGN.md).
#[allow(clippy::too_many_arguments)]
fn try_delimited_span(
    text: &str,
    pos: usize,
    run_len: usize,
    delim: char,
    base_offset: usize,
    references: &ReferenceTable,
    errors: &mut Vec<ParseError>,
    links_disallowed: bool,
    images_disallowed: bool,
) -> Option<(Inline, usize)> {
    let needed = match delim {
        '*' | '_' if (1..=3).contains(&run_len) => run_len,
        '*' | '_' => return None,
        '~' => {
            if run_len == 1 || run_len == 2 {
                run_len
            } else {
                return None;
            }
        }
        '^' => {
            if run_len == 1 {
                1
            } else {
                return None;
            }
        }
        _ => return None,
    };

    let before = classify(text[..pos].chars().next_back());
    let run_end = pos + needed;
    let after_opener = classify(text[run_end..].chars().next());
    if !left_flanking(before, after_opener) {
        errors.push(ParseError::new(
            base_offset + pos,
            MMarkErr::NonFlankingDelimiterRun(delim.to_string().repeat(needed)),
        ));
        return None;
    }

    let close_start = find_closing_run(text, run_end, delim, needed)?;
    let close_end = close_start + needed;
    let before_closer = classify(text[..close_start].chars().next_back());
    let after_closer = classify(text[close_end..].chars().next());
    if !right_flanking(before_closer, after_closer) {
        errors.push(ParseError::new(
            base_offset + close_start,
            MMarkErr::NonFlankingDelimiterRun(delim.to_string().repeat(needed)),
        ));
        return None;
    }

    let inner_text = &text[run_end..close_start];
    if inner_text.is_empty() {
        return None;
    }
    let inner = parse_run(inner_text, base_offset + run_end, references, errors, links_disallowed, images_disallowed);
    if inner.is_empty() {
        return None;
    }

    let node = match delim {
        '*' | '_' => match needed {
            1 => Inline::Emphasis(inner),
            2 => Inline::Strong(inner),
            _ => Inline::Strong(vec![Inline::Emphasis(inner)]),
        },
        '~' => {
            if needed == 2 {
                Inline::Strikeout(inner)
            } else {
                Inline::Subscript(inner)
            }
        }
        '^' => Inline::Superscript(inner),
        _ => unreachable!(),
    };
    Some((node, close_end))
}

/// The next run of exactly `len` copies of `delim` at or after `from`,
/// skipping over any run of a different length (those are left for a later
/// call to reinterpret, or to fall through as literal text).
fn find_closing_run(text: &str, from: usize, delim: char, len: usize) -> Option<usize> {
    let mut idx = from;
    let bytes = text.as_bytes();
    while idx < bytes.len() {
        if bytes[idx] == delim as u8 {
            let run_len = text[idx..].chars().take_while(|&c| c == delim).count();
            if run_len == len {
                return Some(idx);
            }
            idx += run_len;
        } else {
            idx += text[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<Inline> {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        parse_run(text, 0, &refs, &mut errors, false, false)
    }

    #[test]
    fn parses_plain_text() {
        assert_eq!(run("hello"), vec![Inline::Plain("hello".into())]);
    }

    #[test]
    fn parses_emphasis_and_strong() {
        assert_eq!(run("*a*"), vec![Inline::Emphasis(vec![Inline::Plain("a".into())])]);
        assert_eq!(run("**a**"), vec![Inline::Strong(vec![Inline::Plain("a".into())])]);
    }

    #[test]
    fn parses_strikeout_and_subscript() {
        assert_eq!(run("~~a~~"), vec![Inline::Strikeout(vec![Inline::Plain("a".into())])]);
        assert_eq!(run("~a~"), vec![Inline::Subscript(vec![Inline::Plain("a".into())])]);
    }

    #[test]
    fn parses_code_span_collapsing_whitespace() {
        assert_eq!(run("`a  b`"), vec![Inline::CodeSpan("a  b".into())]);
    }

    #[test]
    fn hard_break_on_two_trailing_spaces() {
        let inlines = run("a  \nb");
        assert_eq!(inlines, vec![Inline::Plain("a".into()), Inline::LineBreak, Inline::Plain("b".into())]);
    }

    #[test]
    fn soft_break_becomes_single_space() {
        assert_eq!(run("a\nb"), vec![Inline::Plain("a b".into())]);
    }

    #[test]
    fn unmatched_emphasis_delimiter_is_literal() {
        assert_eq!(run("a * b"), vec![Inline::Plain("a * b".into())]);
    }

    #[test]
    fn intraword_underscore_run_does_not_close() {
        // The closing `_` sits between two `Other`-class characters, so it is
        // neither left- nor right-flanking under the strict total order and
        // the whole span falls back to literal text (§8, DESIGN.md open
        // question #10).
        assert_eq!(run("_foo_bar"), vec![Inline::Plain("_foo_bar".into())]);
    }

    #[test]
    fn non_flanking_run_reports_error() {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        parse_run("_foo_bar", 0, &refs, &mut errors, false, false);
        assert!(errors.iter().any(|e| matches!(&e.kind, MMarkErr::NonFlankingDelimiterRun(chars) if chars == "_")));
    }

    #[test]
    fn nested_link_inside_link_text_is_not_resolved() {
        // §4.3: a link's own text is parsed with links_disallowed = true, so
        // the inner `[b](c)` is literal brackets, not a nested <a>.
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let inlines = parse_run("[a [b](c) d](https://e.example)", 0, &refs, &mut errors, false, false);
        assert_eq!(inlines.len(), 1);
        match &inlines[0] {
            Inline::Link { inner, dest, .. } => {
                assert_eq!(dest.as_str(), "https://e.example/");
                assert_eq!(inner, &vec![Inline::Plain("a [b](c) d".into())]);
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_reference_definition_and_falls_back_to_literal_text() {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let inlines = parse_run("[foo][bar]", 0, &refs, &mut errors, false, false);
        assert_eq!(inlines, vec![Inline::Plain("[foo][bar]".into())]);
        assert!(errors
            .iter()
            .any(|e| matches!(&e.kind, MMarkErr::CouldNotFindReferenceDefinition { label, .. } if label == "bar")));
    }
}
