// Inline-level AST, plus the Inline-Span Placeholder (ISP) carried from the
// block parser to the inline parser.

use crate::error::ParseError;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Plain(String),
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Subscript(Vec<Inline>),
    Superscript(Vec<Inline>),
    CodeSpan(String),
    Link {
        inner: Vec<Inline>,
        dest: Url,
        title: Option<String>,
    },
    Image {
        alt: Vec<Inline>,
        src: Url,
        title: Option<String>,
    },
}

/// Inline-Span Placeholder: either raw text awaiting inline resolution
/// (tagged with the byte offset of its first character in the original
/// document, so inline-phase errors can be reported against the source),
/// or a block-level parse failure captured in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Isp {
    Span { offset: usize, text: String },
    Error(ParseError),
}

impl Isp {
    pub fn span(offset: usize, text: impl Into<String>) -> Self {
        Isp::Span { offset, text: text.into() }
    }
}

/// Depth-first plain-text projection of an inline sequence, e.g. for
/// computing heading `id`s or image `alt` text.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    plain_text_into(inlines, &mut out);
    out
}

fn plain_text_into(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Plain(s) => out.push_str(s),
            Inline::LineBreak => out.push(' '),
            Inline::CodeSpan(s) => out.push_str(s),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikeout(children)
            | Inline::Subscript(children)
            | Inline::Superscript(children) => plain_text_into(children, out),
            Inline::Link { inner, .. } => plain_text_into(inner, out),
            Inline::Image { alt, .. } => plain_text_into(alt, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_flattens_nested_inlines() {
        let inlines = vec![
            Inline::Plain("a ".into()),
            Inline::Strong(vec![Inline::Plain("b".into())]),
            Inline::Plain(" c".into()),
        ];
        assert_eq!(plain_text(&inlines), "a b c");
    }
}
