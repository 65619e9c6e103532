// Links, images, autolinks, and code spans: the inline constructs that are
// delimited by a fixed pair of markers rather than by flanking delimiter
// runs.

use crate::ast::Inline;
use crate::error::{MMarkErr, ParseError};
use crate::lexical::collapse_whitespace;
use crate::parser::reference::ReferenceTable;
use url::Url;

use super::parse_run;

/// `<scheme:...>` or `<user@host>`. `rest` starts at `<`. Returns the
/// resolved inline and the number of bytes consumed (including both angle
/// brackets).
pub fn try_autolink(rest: &str) -> Option<(Inline, usize)> {
    let close = rest.find('>')?;
    let inner = &rest[1..close];
    if inner.is_empty() || inner.contains(char::is_whitespace) || inner.contains('<') {
        return None;
    }
    if let Some(colon) = inner.find(':') {
        let scheme = &inner[..colon];
        if is_valid_scheme(scheme) {
            if let Ok(url) = Url::parse(inner) {
                return Some((
                    Inline::Link { inner: vec![Inline::Plain(inner.to_string())], dest: url, title: None },
                    close + 1,
                ));
            }
        }
    }
    if looks_like_email(inner) {
        let dest = Url::parse(&format!("mailto:{inner}")).ok()?;
        return Some((
            Inline::Link { inner: vec![Inline::Plain(inner.to_string())], dest, title: None },
            close + 1,
        ));
    }
    None
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    scheme.len() >= 2 && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn looks_like_email(s: &str) -> bool {
    let Some(at) = s.find('@') else { return false };
    let (local, domain) = (&s[..at], &s[at + 1..]);
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && s.chars().all(|c| !c.is_whitespace() && c != '<' && c != '>')
}

/// A run of backticks starting at `text[start..]` (already known to be all
/// backticks of length `open_len`). Finds the next run of exactly
/// `open_len` backticks and returns the raw content between them plus the
/// absolute end offset (exclusive) of the closing run.
pub fn find_code_span_close(text: &str, content_start: usize, open_len: usize) -> Option<(String, usize)> {
    let mut search_from = content_start;
    loop {
        let rel = text[search_from..].find('`')?;
        let run_start = search_from + rel;
        let run_len = text[run_start..].chars().take_while(|&c| c == '`').count();
        if run_len == open_len {
            let content = &text[content_start..run_start];
            return Some((normalize_code_span(content), run_start + run_len));
        }
        search_from = run_start + run_len;
        if search_from >= text.len() {
            return None;
        }
    }
}

/// Per §4.3: collapse internal whitespace runs to single spaces, and strip
/// exactly one leading and one trailing space if the content both starts
/// and ends with a space and is not all spaces.
pub fn normalize_code_span(content: &str) -> String {
    let collapsed: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if collapsed.starts_with(' ') && collapsed.ends_with(' ') && collapsed.trim() != "" {
        collapsed[1..collapsed.len() - 1].to_string()
    } else {
        collapsed
    }
}

/// `[text](dest "title")`, `[text][label]`, `[text][]`, or `[text]`
/// (shortcut reference). `is_image` selects `!`-prefixed image syntax —
/// the caller has already consumed the `!`. `text` is the full inline
/// source; `bracket_pos` is the byte offset of the opening `[`. Returns the
/// resolved node and the end byte offset (exclusive) of the whole
/// construct. `links_disallowed`/`images_disallowed` are the disallow-state
/// inherited from the enclosing context, propagated into the inner text per
/// §4.3: a link's own text disallows nested links, an image's alt text
/// disallows nested images.
#[allow(clippy::too_many_arguments)]
pub fn try_link_or_image(
    text: &str,
    bracket_pos: usize,
    base_offset: usize,
    references: &ReferenceTable,
    errors: &mut Vec<ParseError>,
    is_image: bool,
    links_disallowed: bool,
    images_disallowed: bool,
) -> Option<(Inline, usize)> {
    let (label_text, after_bracket) = find_matching_bracket(text, bracket_pos)?;
    let inner_links_disallowed = if is_image { links_disallowed } else { true };
    let inner_images_disallowed = if is_image { true } else { images_disallowed };

    let rest = &text[after_bracket..];
    if let Some(paren_rest) = rest.strip_prefix('(') {
        if let Some((dest, title, consumed)) = parse_inline_destination(paren_rest) {
            let url = Url::parse(&dest).ok()?;
            let inner = resolve_inner(
                is_image,
                label_text,
                base_offset + bracket_pos + 1,
                references,
                errors,
                inner_links_disallowed,
                inner_images_disallowed,
            );
            let end = after_bracket + 1 + consumed;
            return Some((build_node(is_image, inner, url, title), end));
        }
    }

    // Full reference: [text][label]
    if let Some(after_lb) = rest.strip_prefix('[') {
        if let Some(close_rel) = after_lb.find(']') {
            let label = &after_lb[..close_rel];
            let lookup_label = if label.is_empty() { label_text } else { label };
            let end = after_bracket + 2 + close_rel;
            return resolve_reference(
                lookup_label,
                label_text,
                bracket_pos,
                base_offset,
                references,
                errors,
                is_image,
                inner_links_disallowed,
                inner_images_disallowed,
                end,
            );
        }
    }

    // Shortcut reference: [text]. A bare `![]` (empty alt, nothing else
    // following) has no destination to resolve and is not an error per
    // §4.3 — it falls back to literal text rather than failing the
    // reference lookup for label "".
    if is_image && label_text.is_empty() {
        return None;
    }

    resolve_reference(
        label_text,
        label_text,
        bracket_pos,
        base_offset,
        references,
        errors,
        is_image,
        inner_links_disallowed,
        inner_images_disallowed,
        after_bracket,
    )
}

#[allow(clippy::too_many_arguments)]
fn resolve_reference(
    lookup_label: &str,
    display_text: &str,
    bracket_pos: usize,
    base_offset: usize,
    references: &ReferenceTable,
    errors: &mut Vec<ParseError>,
    is_image: bool,
    links_disallowed: bool,
    images_disallowed: bool,
    end: usize,
) -> Option<(Inline, usize)> {
    match references.get(lookup_label) {
        Some((url, title)) => {
            let inner = resolve_inner(
                is_image,
                display_text,
                base_offset + bracket_pos + 1,
                references,
                errors,
                links_disallowed,
                images_disallowed,
            );
            Some((build_node(is_image, inner, url.clone(), title.clone()), end))
        }
        None => {
            let nearest = references.nearest_labels(lookup_label, 3);
            errors.push(ParseError::new(
                base_offset + bracket_pos,
                MMarkErr::CouldNotFindReferenceDefinition {
                    label: collapse_whitespace(lookup_label),
                    nearest,
                },
            ));
            None
        }
    }
}

/// Parses a link's/image's inner text, substituting the dedicated
/// `[Plain("")]` carve-out for an empty image alt (§4.3) instead of the
/// ordinary empty `Vec`.
#[allow(clippy::too_many_arguments)]
fn resolve_inner(
    is_image: bool,
    text: &str,
    base_offset: usize,
    references: &ReferenceTable,
    errors: &mut Vec<ParseError>,
    links_disallowed: bool,
    images_disallowed: bool,
) -> Vec<Inline> {
    let inner = parse_run(text, base_offset, references, errors, links_disallowed, images_disallowed);
    if is_image && inner.is_empty() {
        vec![Inline::Plain(String::new())]
    } else {
        inner
    }
}

fn build_node(is_image: bool, inner: Vec<Inline>, dest: Url, title: Option<String>) -> Inline {
    if is_image {
        Inline::Image { alt: inner, src: dest, title }
    } else {
        Inline::Link { inner, dest, title }
    }
}

/// Find the `]` matching the `[` at `open_pos`, honoring nested brackets.
/// Returns the text strictly between the brackets and the byte offset just
/// past the closing `]`.
fn find_matching_bracket(text: &str, open_pos: usize) -> Option<(&str, usize)> {
    let mut depth = 0i32;
    let mut idx = open_pos;
    let bytes = text.as_bytes();
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' if idx + 1 < bytes.len() => idx += 2,
            b'[' => {
                depth += 1;
                idx += 1;
            }
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[open_pos + 1..idx], idx + 1));
                }
                idx += 1;
            }
            _ => idx += 1,
        }
    }
    None
}

/// `(dest "title")` or `(<dest> "title")`, starting just past the `(`.
/// Returns `(dest, title, bytes_consumed_including_closing_paren)`.
fn parse_inline_destination(s: &str) -> Option<(String, Option<String>, usize)> {
    let s_trimmed_start = s.trim_start();
    let leading_ws = s.len() - s_trimmed_start.len();

    let (dest, after_dest_rel) = if let Some(rest) = s_trimmed_start.strip_prefix('<') {
        let end = rest.find('>')?;
        (rest[..end].to_string(), end + 1)
    } else {
        let end = s_trimmed_start
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(s_trimmed_start.len());
        if end == 0 {
            return None;
        }
        (s_trimmed_start[..end].to_string(), end)
    };

    let after_dest = &s_trimmed_start[after_dest_rel..];
    let after_dest_trimmed = after_dest.trim_start();
    let ws_before_title = after_dest.len() - after_dest_trimmed.len();

    if let Some(rest) = after_dest_trimmed.strip_prefix(')') {
        let _ = rest;
        return Some((dest, None, leading_ws + after_dest_rel + 1));
    }

    let (open, close) = match after_dest_trimmed.chars().next()? {
        '"' => ('"', '"'),
        '\'' => ('\'', '\''),
        '(' => ('(', ')'),
        _ => return None,
    };
    let title_body = &after_dest_trimmed[open.len_utf8()..];
    let title_end = title_body.find(close)?;
    let title = title_body[..title_end].to_string();
    let after_title = &title_body[title_end + close.len_utf8()..];
    let after_title_trimmed = after_title.trim_start();
    if !after_title_trimmed.starts_with(')') {
        return None;
    }
    let consumed = leading_ws
        + after_dest_rel
        + ws_before_title
        + open.len_utf8()
        + title_end
        + close.len_utf8()
        + (after_title.len() - after_title_trimmed.len())
        + 1;
    Some((dest, Some(title), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_http_autolink() {
        let (inline, consumed) = try_autolink("<https://example.com>rest").unwrap();
        assert_eq!(consumed, "<https://example.com>".len());
        match inline {
            Inline::Link { dest, .. } => assert_eq!(dest.as_str(), "https://example.com/"),
            _ => panic!("expected link"),
        }
    }

    #[test]
    fn parses_email_autolink_as_mailto() {
        let (inline, _) = try_autolink("<a@b.com>").unwrap();
        match inline {
            Inline::Link { dest, .. } => assert_eq!(dest.as_str(), "mailto:a@b.com"),
            _ => panic!("expected link"),
        }
    }

    #[test]
    fn code_span_strips_one_surrounding_space() {
        assert_eq!(normalize_code_span(" foo "), "foo");
        assert_eq!(normalize_code_span("  "), "  ".trim().to_string());
    }

    #[test]
    fn image_with_empty_alt_yields_single_empty_plain_node() {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let text = "![](https://example.com/a.png)";
        let (inline, _) = try_link_or_image(text, 1, 0, &refs, &mut errors, true, false, false).unwrap();
        match inline {
            Inline::Image { alt, .. } => assert_eq!(alt, vec![Inline::Plain(String::new())]),
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn bare_empty_image_shortcut_falls_back_to_literal_without_erroring() {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let text = "![]";
        assert!(try_link_or_image(text, 1, 0, &refs, &mut errors, true, false, false).is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn inline_link_parses_destination_and_title() {
        let refs = ReferenceTable::new();
        let mut errors = Vec::new();
        let text = "[hi](/url \"t\") after";
        let (inline, end) = try_link_or_image(text, 0, 0, &refs, &mut errors, false, false, false).unwrap();
        assert_eq!(&text[..end], "[hi](/url \"t\")");
        match inline {
            Inline::Link { dest, title, .. } => {
                assert_eq!(dest.as_str(), "/url");
                assert_eq!(title.as_deref(), Some("t"));
            }
            _ => panic!("expected link"),
        }
    }
}
