// Error taxonomy (`MMarkErr`) and the bundle returned by `parse` on failure.
//
// Every variant below is constructed at a known parse-time failure and
// reaches the caller wrapped in a `ParseError` carrying the byte offset at
// which it was raised.

use crate::position::Position;
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MMarkErr {
    #[error("could not parse YAML front matter: {0}")]
    YamlParseError(String),

    #[error("list start index {0} is too big")]
    ListStartIndexTooBig(u64),

    #[error("list item index out of order: got {actual}, expected {expected}")]
    ListIndexOutOfOrder { actual: u64, expected: u64 },

    #[error("duplicate reference definition for label \"{0}\"")]
    DuplicateReferenceDefinition(String),

    #[error("could not find reference definition for label \"{label}\"{}", nearest_suffix(.nearest))]
    CouldNotFindReferenceDefinition { label: String, nearest: Vec<String> },

    #[error("non-flanking delimiter run: {0:?}")]
    NonFlankingDelimiterRun(String),

    #[error("invalid numeric character reference: {0}")]
    InvalidNumericCharacter(u32),

    #[error("unknown HTML entity name: {0}")]
    UnknownHtmlEntityName(String),

    #[error("unexpected input: {0}")]
    Unexpected(String),

    #[error("expected {0}")]
    Expected(String),
}

fn nearest_suffix(nearest: &[String]) -> String {
    if nearest.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", nearest.join(", "))
    }
}

/// One error, located at a byte offset into the original document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub offset: usize,
    pub kind: MMarkErr,
}

impl ParseError {
    pub fn new(offset: usize, kind: MMarkErr) -> Self {
        Self { offset, kind }
    }
}

/// A non-empty collection of `ParseError`s plus enough context (file name,
/// original input) to render tab-aware, 1-indexed line/column diagnostics.
#[derive(Debug, Clone)]
pub struct ParseErrorBundle {
    pub file_name: String,
    pub input: String,
    pub errors: Vec<ParseError>,
}

impl ParseErrorBundle {
    /// Panics if `errors` is empty: a bundle is only ever constructed once
    /// at least one error has been collected.
    pub fn new(file_name: impl Into<String>, input: impl Into<String>, errors: Vec<ParseError>) -> Self {
        assert!(!errors.is_empty(), "ParseErrorBundle must carry at least one error");
        Self {
            file_name: file_name.into(),
            input: input.into(),
            errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ParseErrorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            let pos = Position::from_offset(&self.input, err.offset);
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}:{}:{}: {}",
                self.file_name, pos.line, pos.column, err.kind
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrorBundle {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_error_with_1_indexed_tab_aware_position() {
        let input = "line one\n\tline two";
        let err = ParseError::new(10, MMarkErr::Unexpected("x".into()));
        let bundle = ParseErrorBundle::new("doc.md", input, vec![err]);
        let rendered = bundle.to_string();
        assert!(rendered.starts_with("doc.md:2:2:"), "{rendered}");
    }

    #[test]
    fn suggests_nearest_labels_on_lookup_failure() {
        let err = MMarkErr::CouldNotFindReferenceDefinition {
            label: "fob".into(),
            nearest: vec!["foo".into(), "bar".into()],
        };
        assert!(err.to_string().contains("did you mean: foo, bar"));
    }
}
