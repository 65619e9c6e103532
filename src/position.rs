// Source position tracking, shared by the block parser, inline parser, and
// the diagnostic formatter in `error`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Tab-aware 1-indexed line/column for a byte offset into `input`.
    /// Tabs advance to the next multiple of 4 columns, matching the
    /// indentation-width rule used throughout the block parser.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut line = 1usize;
        let mut column = 1usize;
        let bound = offset.min(input.len());
        for ch in input[..bound].chars() {
            match ch {
                '\n' => {
                    line += 1;
                    column = 1;
                }
                '\t' => {
                    column += 4 - ((column - 1) % 4);
                }
                _ => column += 1,
            }
        }
        Position::new(line, column, bound)
    }
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}
