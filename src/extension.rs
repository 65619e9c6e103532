// The extension model: `Extension` is a 4-field monoid of transform/render
// layers, composed by list concatenation and applied by left fold. Given
// extensions `f` and `g`, `use_extension` builds `f ⊕ g` such that for any
// block/inline value `t` and any running render `h`:
//
//     (f ⊕ g)(t, h) = g(t, f(t, h))
//
// i.e. `f`'s layers run first, `g`'s see `f`'s output. Block/inline
// *transforms* are pure `T -> T` rewrites applied bottom-up once per node;
// *render hooks* see the in-progress HTML string and may wrap or rewrite it.

use crate::ast::{Block, Inline, NonEmptyVec};
use serde_json::Value as JsonValue;
use std::rc::Rc;

pub type BlockTransform = Rc<dyn Fn(Block<NonEmptyVec<Inline>>) -> Block<NonEmptyVec<Inline>>>;
pub type InlineTransform = Rc<dyn Fn(Inline) -> Inline>;
pub type BlockRenderHook = Rc<dyn Fn(&Block<NonEmptyVec<Inline>>, String) -> String>;
pub type InlineRenderHook = Rc<dyn Fn(&Inline, String) -> String>;

#[derive(Clone, Default)]
pub struct Extension {
    block_trans: Vec<BlockTransform>,
    inline_trans: Vec<InlineTransform>,
    block_render: Vec<BlockRenderHook>,
    inline_render: Vec<InlineRenderHook>,
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("block_trans", &self.block_trans.len())
            .field("inline_trans", &self.inline_trans.len())
            .field("block_render", &self.block_render.len())
            .field("inline_render", &self.inline_render.len())
            .finish()
    }
}

impl Extension {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn block_trans(f: impl Fn(Block<NonEmptyVec<Inline>>) -> Block<NonEmptyVec<Inline>> + 'static) -> Self {
        Self { block_trans: vec![Rc::new(f)], ..Default::default() }
    }

    pub fn inline_trans(f: impl Fn(Inline) -> Inline + 'static) -> Self {
        Self { inline_trans: vec![Rc::new(f)], ..Default::default() }
    }

    pub fn block_render(h: impl Fn(&Block<NonEmptyVec<Inline>>, String) -> String + 'static) -> Self {
        Self { block_render: vec![Rc::new(h)], ..Default::default() }
    }

    pub fn inline_render(h: impl Fn(&Inline, String) -> String + 'static) -> Self {
        Self { inline_render: vec![Rc::new(h)], ..Default::default() }
    }

    fn combine(mut self, other: Extension) -> Self {
        self.block_trans.extend(other.block_trans);
        self.inline_trans.extend(other.inline_trans);
        self.block_render.extend(other.block_render);
        self.inline_render.extend(other.inline_render);
        self
    }

    pub(crate) fn apply_block_trans(&self, block: Block<NonEmptyVec<Inline>>) -> Block<NonEmptyVec<Inline>> {
        let transformed = transform_block_tree(block, &self.inline_trans);
        self.block_trans.iter().fold(transformed, |b, layer| layer(b))
    }

    pub(crate) fn render_block(&self, block: &Block<NonEmptyVec<Inline>>, default: String) -> String {
        self.block_render.iter().fold(default, |html, layer| layer(block, html))
    }

    pub(crate) fn render_inline(&self, inline: &Inline, default: String) -> String {
        self.inline_render.iter().fold(default, |html, layer| layer(inline, html))
    }
}

/// Apply every inline transform, bottom-up, to every inline node reachable
/// from `block`, then recurse into container children.
fn transform_block_tree(block: Block<NonEmptyVec<Inline>>, layers: &[InlineTransform]) -> Block<NonEmptyVec<Inline>> {
    match block {
        Block::ThematicBreak => Block::ThematicBreak,
        Block::CodeBlock { info, content } => Block::CodeBlock { info, content },
        Block::Heading { level, content } => Block::Heading { level, content: transform_inlines(content, layers) },
        Block::Naked(content) => Block::Naked(transform_inlines(content, layers)),
        Block::Paragraph(content) => Block::Paragraph(transform_inlines(content, layers)),
        Block::Blockquote(children) => {
            Block::Blockquote(children.into_iter().map(|b| transform_block_tree(b, layers)).collect())
        }
        Block::OrderedList { start, items } => Block::OrderedList {
            start,
            items: items.map(|item| item.into_iter().map(|b| transform_block_tree(b, layers)).collect()),
        },
        Block::UnorderedList { items } => Block::UnorderedList {
            items: items.map(|item| item.into_iter().map(|b| transform_block_tree(b, layers)).collect()),
        },
        Block::Table { aligns, rows } => Block::Table {
            aligns,
            rows: rows.map(|row| row.map(|cell| transform_inlines(cell, layers))),
        },
    }
}

fn transform_inlines(content: NonEmptyVec<Inline>, layers: &[InlineTransform]) -> NonEmptyVec<Inline> {
    content.map(|inline| transform_inline(inline, layers))
}

fn transform_inline(inline: Inline, layers: &[InlineTransform]) -> Inline {
    let with_transformed_children = match inline {
        Inline::Emphasis(children) => Inline::Emphasis(transform_children(children, layers)),
        Inline::Strong(children) => Inline::Strong(transform_children(children, layers)),
        Inline::Strikeout(children) => Inline::Strikeout(transform_children(children, layers)),
        Inline::Subscript(children) => Inline::Subscript(transform_children(children, layers)),
        Inline::Superscript(children) => Inline::Superscript(transform_children(children, layers)),
        Inline::Link { inner, dest, title } => Inline::Link { inner: transform_children(inner, layers), dest, title },
        Inline::Image { alt, src, title } => Inline::Image { alt: transform_children(alt, layers), src, title },
        other => other,
    };
    layers.iter().fold(with_transformed_children, |node, layer| layer(node))
}

fn transform_children(children: Vec<Inline>, layers: &[InlineTransform]) -> Vec<Inline> {
    children.into_iter().map(|c| transform_inline(c, layers)).collect()
}

/// A fully parsed document: optional YAML front matter, the block tree
/// (inline content already resolved), and the accumulated extension.
#[derive(Clone, Debug)]
pub struct MMark {
    pub yaml: Option<JsonValue>,
    pub blocks: Vec<Block<NonEmptyVec<Inline>>>,
    pub extension: Extension,
}

impl MMark {
    pub fn project_yaml(&self) -> Option<&JsonValue> {
        self.yaml.as_ref()
    }
}

/// Layer `extension` onto `doc.extension`, running `doc`'s existing layers
/// first. Also applies `extension`'s block/inline transforms to `doc`'s
/// existing block tree immediately, so later `render` calls only need to
/// apply render hooks.
pub fn use_extension(mut doc: MMark, extension: Extension) -> MMark {
    let transform_only = Extension {
        block_trans: extension.block_trans.clone(),
        inline_trans: extension.inline_trans.clone(),
        ..Default::default()
    };
    doc.blocks = doc
        .blocks
        .into_iter()
        .map(|b| transform_only.apply_block_trans(b))
        .collect();
    doc.extension = doc.extension.combine(extension);
    doc
}

pub fn use_extensions(doc: MMark, extensions: impl IntoIterator<Item = Extension>) -> MMark {
    extensions.into_iter().fold(doc, use_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naked(text: &str) -> Block<NonEmptyVec<Inline>> {
        Block::Naked(NonEmptyVec::new(Inline::Plain(text.to_string())))
    }

    #[test]
    fn block_render_layers_compose_left_to_right() {
        let ext = Extension::block_render(|_, h| format!("[{h}]")).combine(Extension::block_render(|_, h| format!("<{h}>")));
        let block = naked("x");
        let out = ext.render_block(&block, "base".to_string());
        assert_eq!(out, "<[base]>");
    }

    #[test]
    fn inline_transform_runs_bottom_up() {
        let ext = Extension::inline_trans(|i| match i {
            Inline::Plain(s) => Inline::Plain(s.to_uppercase()),
            other => other,
        });
        let block = Block::Paragraph(NonEmptyVec::new(Inline::Emphasis(vec![Inline::Plain("hi".into())])));
        let transformed = ext.apply_block_trans(block);
        match transformed {
            Block::Paragraph(content) => match content.first() {
                Inline::Emphasis(children) => assert_eq!(children[0], Inline::Plain("HI".into())),
                _ => panic!("expected emphasis"),
            },
            _ => panic!("expected paragraph"),
        }
    }
}
