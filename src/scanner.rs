// `run_scanner`: a left-fold over a document's blocks in document order,
// recursing into blockquote and list-item children before moving on to the
// next sibling. Mirrors the grounding codebase's `traversal.rs` walk, but
// folds into caller-supplied state instead of collecting nodes.

use crate::ast::{Block, Inline, NonEmptyVec};

/// Fold `step` over every block reachable from `blocks`, in document order
/// (container children are visited before the container's later siblings).
pub fn run_scanner<S>(
    blocks: &[Block<NonEmptyVec<Inline>>],
    init: S,
    step: impl Fn(S, &Block<NonEmptyVec<Inline>>) -> S + Copy,
) -> S {
    blocks.iter().fold(init, |acc, block| scan_one(block, acc, step))
}

fn scan_one<S>(
    block: &Block<NonEmptyVec<Inline>>,
    acc: S,
    step: impl Fn(S, &Block<NonEmptyVec<Inline>>) -> S + Copy,
) -> S {
    let acc = step(acc, block);
    match block {
        Block::Blockquote(children) => children.iter().fold(acc, |a, b| scan_one(b, a, step)),
        Block::OrderedList { items, .. } => items
            .iter()
            .fold(acc, |a, item| item.iter().fold(a, |a, b| scan_one(b, a, step))),
        Block::UnorderedList { items } => items
            .iter()
            .fold(acc, |a, item| item.iter().fold(a, |a, b| scan_one(b, a, step))),
        _ => acc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NonEmptyVec;

    #[test]
    fn counts_headings_including_nested_ones() {
        let nested = Block::heading(2, NonEmptyVec::new(Inline::Plain("inner".into())));
        let blocks = vec![
            Block::heading(1, NonEmptyVec::new(Inline::Plain("outer".into()))),
            Block::Blockquote(vec![nested]),
            Block::ThematicBreak,
        ];
        let count = run_scanner(&blocks, 0, |acc, block| {
            acc + if matches!(block, Block::Heading { .. }) { 1 } else { 0 }
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn visits_list_item_children() {
        let item = vec![Block::Naked(NonEmptyVec::new(Inline::Plain("x".into())))];
        let blocks = vec![Block::UnorderedList { items: NonEmptyVec::new(item) }];
        let count = run_scanner(&blocks, 0, |acc, _| acc + 1);
        assert_eq!(count, 2); // the list itself, plus its one Naked child
    }
}
