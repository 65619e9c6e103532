// Default HTML rendering rules (§4.5). Each block/inline is rendered to its
// base HTML here, then folded through the document's extension render
// layers (see `extension::Extension::render_block`/`render_inline`).

use crate::ast::{plain_text, Block, CellAlign, Inline, NonEmptyVec};
use crate::extension::{Extension, MMark};
use std::fmt::Write as _;

use super::RenderOptions;

/// Render a full document to an HTML string.
pub fn render(doc: &MMark, options: &RenderOptions) -> String {
    log::info!("rendering {} top-level blocks", doc.blocks.len());
    let mut html = String::new();
    for block in &doc.blocks {
        render_block_into(block, &doc.extension, options, &mut html);
    }
    log::debug!("generated {} bytes of HTML", html.len());
    html
}

fn render_block_into(block: &Block<NonEmptyVec<Inline>>, ext: &Extension, options: &RenderOptions, out: &mut String) {
    let base = default_block_html(block, ext, options);
    out.push_str(&ext.render_block(block, base));
}

fn default_block_html(block: &Block<NonEmptyVec<Inline>>, ext: &Extension, options: &RenderOptions) -> String {
    match block {
        Block::ThematicBreak => {
            if options.self_closing_tags {
                "<hr />\n".to_string()
            } else {
                "<hr>\n".to_string()
            }
        }
        Block::Heading { level, content } => {
            log::trace!("rendering heading level {level}");
            let inner = render_inlines(content.as_slice(), ext, options);
            if options.heading_ids {
                let id = header_id(content.as_slice());
                format!("<h{level} id=\"{id}\">{inner}</h{level}>\n")
            } else {
                format!("<h{level}>{inner}</h{level}>\n")
            }
        }
        Block::CodeBlock { info, content } => {
            let escaped = escape_html(content);
            match info.as_deref().and_then(|i| i.split_whitespace().next()) {
                Some(lang) => format!(
                    "<pre><code class=\"language-{}\">{escaped}</code></pre>\n",
                    escape_attribute(lang)
                ),
                None => format!("<pre><code>{escaped}</code></pre>\n"),
            }
        }
        Block::Naked(content) => format!("{}\n", render_inlines(content.as_slice(), ext, options)),
        Block::Paragraph(content) => format!("<p>{}</p>\n", render_inlines(content.as_slice(), ext, options)),
        Block::Blockquote(children) => {
            let mut inner = String::new();
            for b in children {
                render_block_into(b, ext, options, &mut inner);
            }
            format!("<blockquote>\n{}</blockquote>\n", pretty_indent(&inner, options))
        }
        Block::OrderedList { start, items } => {
            let mut inner = String::new();
            for item in items {
                write_list_item(item, ext, options, &mut inner);
            }
            let inner = pretty_indent(&inner, options);
            if *start == 1 {
                format!("<ol>\n{inner}</ol>\n")
            } else {
                format!("<ol start=\"{start}\">\n{inner}</ol>\n")
            }
        }
        Block::UnorderedList { items } => {
            let mut inner = String::new();
            for item in items {
                write_list_item(item, ext, options, &mut inner);
            }
            format!("<ul>\n{}</ul>\n", pretty_indent(&inner, options))
        }
        Block::Table { aligns, rows } => render_table(aligns, rows, ext, options),
    }
}

fn write_list_item(item: &[Block<NonEmptyVec<Inline>>], ext: &Extension, options: &RenderOptions, out: &mut String) {
    out.push_str("<li>");
    let mut inner = String::new();
    for b in item {
        render_block_into(b, ext, options, &mut inner);
    }
    // Tight items (a single `Naked` block) render inline, without the
    // trailing newline that would otherwise separate `<li>` from its text.
    if let [Block::Naked(_)] = item {
        out.push_str(inner.trim_end_matches('\n'));
        out.push_str("</li>\n");
    } else {
        out.push('\n');
        out.push_str(&pretty_indent(&inner, options));
        out.push_str("</li>\n");
    }
}

/// When `options.pretty_print` is on, indent every non-blank line of `s` by
/// one level (two spaces). A no-op otherwise, so compact output is
/// byte-for-byte unchanged.
fn pretty_indent(s: &str, options: &RenderOptions) -> String {
    if !options.pretty_print || s.is_empty() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    for line in s.split_inclusive('\n') {
        if line == "\n" {
            out.push('\n');
        } else {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    out
}

fn render_table(
    aligns: &NonEmptyVec<CellAlign>,
    rows: &NonEmptyVec<NonEmptyVec<NonEmptyVec<Inline>>>,
    ext: &Extension,
    options: &RenderOptions,
) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr>\n");
    let header = rows.first();
    for (cell, align) in header.iter().zip(aligns.iter()) {
        let _ = write!(out, "<th{}>{}</th>\n", align_attr(*align), render_inlines(cell.as_slice(), ext, options));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows.iter().skip(1) {
        out.push_str("<tr>\n");
        for (cell, align) in row.iter().zip(aligns.iter()) {
            let _ = write!(out, "<td{}>{}</td>\n", align_attr(*align), render_inlines(cell.as_slice(), ext, options));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn align_attr(align: CellAlign) -> &'static str {
    match align {
        CellAlign::Default => "",
        CellAlign::Left => " style=\"text-align: left\"",
        CellAlign::Right => " style=\"text-align: right\"",
        CellAlign::Center => " style=\"text-align: center\"",
    }
}

fn render_inlines(inlines: &[Inline], ext: &Extension, options: &RenderOptions) -> String {
    let mut out = String::new();
    for inline in inlines {
        let base = default_inline_html(inline, ext, options);
        out.push_str(&ext.render_inline(inline, base));
    }
    out
}

fn default_inline_html(inline: &Inline, ext: &Extension, options: &RenderOptions) -> String {
    match inline {
        Inline::Plain(s) => escape_html(s),
        Inline::LineBreak => "<br />\n".to_string(),
        Inline::Emphasis(children) => format!("<em>{}</em>", render_inlines(children, ext, options)),
        Inline::Strong(children) => format!("<strong>{}</strong>", render_inlines(children, ext, options)),
        Inline::Strikeout(children) => format!("<del>{}</del>", render_inlines(children, ext, options)),
        Inline::Subscript(children) => format!("<sub>{}</sub>", render_inlines(children, ext, options)),
        Inline::Superscript(children) => format!("<sup>{}</sup>", render_inlines(children, ext, options)),
        Inline::CodeSpan(code) => format!("<code>{}</code>", escape_html(code)),
        Inline::Link { inner, dest, title } => {
            let title_attr = title.as_deref().map(|t| format!(" title=\"{}\"", escape_attribute(t))).unwrap_or_default();
            format!(
                "<a href=\"{}\"{title_attr}>{}</a>",
                escape_attribute(dest.as_str()),
                render_inlines(inner, ext, options)
            )
        }
        Inline::Image { alt, src, title } => {
            let title_attr = title.as_deref().map(|t| format!(" title=\"{}\"", escape_attribute(t))).unwrap_or_default();
            format!(
                "<img src=\"{}\" alt=\"{}\"{title_attr} />",
                escape_attribute(src.as_str()),
                escape_attribute(&plain_text(alt))
            )
        }
    }
}

/// GitHub-style heading slug (§4.5): lowercase, replace runs of whitespace
/// with a single `-`, drop characters outside `[a-z0-9\-_]`. Unlike GitHub's
/// own slugger, `_` is preserved verbatim rather than folded into `-`.
pub fn header_id(content: &[Inline]) -> String {
    let text = plain_text(content).to_lowercase();
    let mut slug = String::with_capacity(text.len());
    let mut last_was_dash = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_dash {
                slug.push('-');
                last_was_dash = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            slug.push(c);
            last_was_dash = c == '-';
        }
    }
    slug.trim_matches('-').to_string()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(s: &str) -> String {
    let mut out = escape_html(s);
    out = out.replace('"', "&quot;");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NonEmptyVec;

    fn doc(blocks: Vec<Block<NonEmptyVec<Inline>>>) -> MMark {
        MMark { yaml: None, blocks, extension: Extension::empty() }
    }

    #[test]
    fn renders_heading_with_slug_id() {
        let block = Block::heading(1, NonEmptyVec::new(Inline::Plain("Hi There".into())));
        let html = render(&doc(vec![block]), &RenderOptions::default());
        assert_eq!(html, "<h1 id=\"hi-there\">Hi There</h1>\n");
    }

    #[test]
    fn heading_slug_preserves_underscores() {
        assert_eq!(header_id(&[Inline::Plain("a_b".into())]), "a_b");
    }

    #[test]
    fn thematic_break_without_self_closing_tags() {
        let options = RenderOptions { self_closing_tags: false, ..RenderOptions::default() };
        let html = render(&doc(vec![Block::ThematicBreak]), &options);
        assert_eq!(html, "<hr>\n");
    }

    #[test]
    fn pretty_print_indents_blockquote_content() {
        let inner = Block::Paragraph(NonEmptyVec::new(Inline::Plain("hi".into())));
        let block = Block::Blockquote(vec![inner]);
        let options = RenderOptions { pretty_print: true, ..RenderOptions::default() };
        let html = render(&doc(vec![block]), &options);
        assert_eq!(html, "<blockquote>\n  <p>hi</p>\n</blockquote>\n");
    }

    #[test]
    fn renders_paragraph_with_emphasis() {
        let block = Block::Paragraph(NonEmptyVec::from_vec(vec![
            Inline::Plain("a ".into()),
            Inline::Emphasis(vec![Inline::Plain("b".into())]),
            Inline::Plain(" c".into()),
        ]).unwrap());
        let html = render(&doc(vec![block]), &RenderOptions::default());
        assert_eq!(html, "<p>a <em>b</em> c</p>\n");
    }

    #[test]
    fn escapes_html_special_characters_in_plain_text() {
        let block = Block::Paragraph(NonEmptyVec::new(Inline::Plain("<script>&".into())));
        let html = render(&doc(vec![block]), &RenderOptions::default());
        assert_eq!(html, "<p>&lt;script&gt;&amp;</p>\n");
    }

    #[test]
    fn tight_list_items_render_without_wrapping_paragraph() {
        let item = vec![Block::Naked(NonEmptyVec::new(Inline::Plain("one".into())))];
        let block = Block::UnorderedList { items: NonEmptyVec::new(item) };
        let html = render(&doc(vec![block]), &RenderOptions::default());
        assert_eq!(html, "<ul>\n<li>one</li>\n</ul>\n");
    }

    #[test]
    fn extension_block_render_hook_wraps_output() {
        let ext = Extension::block_render(|_, h| format!("<div class=\"x\">{h}</div>"));
        let block = Block::heading(2, NonEmptyVec::new(Inline::Plain("t".into())));
        let document = MMark { yaml: None, blocks: vec![block], extension: ext };
        let html = render(&document, &RenderOptions::default());
        assert!(html.starts_with("<div class=\"x\"><h2"));
    }
}
