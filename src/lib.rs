// inkmark - a strict two-phase Markdown parser, AST, extension model, and
// HTML renderer.
//
// `parse` runs the block phase, then the inline phase, against a single
// document. `render` walks the resulting tree to HTML. `Extension` lets a
// caller layer additional block/inline transforms and render hooks onto a
// parsed `MMark` without forking the parser or renderer.

pub mod ast;
pub mod error;
pub mod extension;
pub mod lexical;
pub mod logging;
pub mod parser;
pub mod position;
pub mod render;
pub mod scanner;

pub use ast::{Block, CellAlign, Inline, NonEmptyVec};
pub use error::{MMarkErr, ParseError, ParseErrorBundle};
pub use extension::{use_extension, use_extensions, Extension, MMark};
pub use logging::safe_preview;
pub use position::{Position, Span};
pub use render::{render, RenderOptions};
pub use scanner::run_scanner;

/// Parse `input` into an `MMark`. `file_name` is used only for error
/// messages. On success the document carries no extension yet — layer one
/// on with `use_extension`/`use_extensions` before rendering.
pub fn parse(file_name: &str, input: &str) -> Result<MMark, ParseErrorBundle> {
    log::debug!("parsing {file_name} ({} bytes)", input.len());
    let parsed = parser::parse(input);
    if let Some(bundle) = parser::into_bundle(file_name, input, parsed.errors) {
        log::warn!("{file_name}: {} parse error(s)", bundle.len());
        return Err(bundle);
    }
    Ok(MMark { yaml: parsed.yaml, blocks: parsed.blocks, extension: Extension::empty() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_a_heading() {
        let doc = parse("doc.md", "# Hi\n").unwrap();
        assert_eq!(render(&doc, &RenderOptions::default()), "<h1 id=\"hi\">Hi</h1>\n");
    }

    #[test]
    fn parses_and_renders_emphasis_in_a_paragraph() {
        let doc = parse("doc.md", "a *b* c\n").unwrap();
        assert_eq!(render(&doc, &RenderOptions::default()), "<p>a <em>b</em> c</p>\n");
    }

    #[test]
    fn reports_a_missing_reference_definition() {
        let err = parse("doc.md", "See [the link][missing].\n").unwrap_err();
        assert!(err.to_string().contains("could not find reference definition"));
    }

    #[test]
    fn resolves_a_reference_link_defined_elsewhere() {
        let doc = parse("doc.md", "[text][ref]\n\n[ref]: /dest \"Title\"\n").unwrap();
        let html = render(&doc, &RenderOptions::default());
        assert!(html.contains("<a href=\"/dest\" title=\"Title\">text</a>"));
    }

    #[test]
    fn front_matter_is_exposed_on_the_document() {
        let doc = parse("doc.md", "---\ntitle: Hello\n---\n# Body\n").unwrap();
        assert_eq!(doc.yaml.as_ref().unwrap()["title"], "Hello");
    }

    #[test]
    fn extension_layers_an_inline_render_hook() {
        let doc = parse("doc.md", "*x*\n").unwrap();
        let doc = use_extension(
            doc,
            Extension::inline_render(|inline, html| match inline {
                Inline::Emphasis(_) => format!("<em class=\"hl\">{}</em>", html.trim_start_matches("<em>").trim_end_matches("</em>")),
                _ => html,
            }),
        );
        let html = render(&doc, &RenderOptions::default());
        assert!(html.contains("<em class=\"hl\">x</em>"));
    }
}
