// Line splitting and indentation-width helpers shared by every block
// recognizer. Tab = 4 columns, space = 1, per §4.2.

/// One physical line of the source document: its text (line terminator
/// stripped) and the absolute byte offset of its first character in the
/// *original* document. Container blocks (blockquote, list item) rebuild a
/// `Vec<SourceLine>` of dedented content with offsets still pointing at the
/// original document, so ISPs built downstream keep reporting correct
/// positions even though the lines are no longer contiguous in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> SourceLine<'a> {
    pub fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Indentation width in columns (tab = 4, space = 1) before the first
    /// non-space-or-tab character.
    pub fn indent_width(&self) -> usize {
        indent_width(self.text)
    }

    /// Strip up to `columns` of leading indentation and return the
    /// remaining line, re-based so `offset` still points into the original
    /// document. If the line has less indentation than `columns`, the whole
    /// leading whitespace run is stripped (the caller is expected to have
    /// already checked `indent_width() >= columns`).
    pub fn dedent(&self, columns: usize) -> SourceLine<'a> {
        let (consumed_bytes, _consumed_width) = leading_columns(self.text, columns);
        SourceLine::new(&self.text[consumed_bytes..], self.offset + consumed_bytes)
    }
}

pub fn indent_width(text: &str) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - (width % 4),
            _ => break,
        }
    }
    width
}

/// Byte length and column width of the leading whitespace run needed to
/// reach (but not exceed) `target_columns` of indentation. Consumes whole
/// characters only: a tab that would overshoot the target is still consumed
/// in full rather than split into partial columns, which only matters for
/// mixed tab/space indentation at an exact boundary (a documented
/// approximation; see DESIGN.md).
fn leading_columns(text: &str, target_columns: usize) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for c in text.chars() {
        if width >= target_columns {
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
    (bytes, width)
}

/// Split `input` into lines, accepting `\n`, `\r\n`, and `\r` as a single
/// newline (§4.1), with each line's absolute byte offset.
pub fn split_lines(input: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let bytes = input.as_bytes();
    let mut line_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(SourceLine::new(&input[line_start..i], line_start));
                i += 1;
                line_start = i;
            }
            b'\r' => {
                lines.push(SourceLine::new(&input[line_start..i], line_start));
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                line_start = i;
            }
            _ => i += 1,
        }
    }
    if line_start <= input.len() {
        lines.push(SourceLine::new(&input[line_start..], line_start));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_mixed_line_endings() {
        let lines = split_lines("a\nb\r\nc\rd");
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn indent_width_counts_tabs_as_4() {
        assert_eq!(indent_width("\tfoo"), 4);
        assert_eq!(indent_width("  \tfoo"), 4);
        assert_eq!(indent_width("   foo"), 3);
    }

    #[test]
    fn dedent_preserves_absolute_offset() {
        let doc = "> hello";
        let line = SourceLine::new(doc, 0);
        let deq = line.dedent(2);
        assert_eq!(deq.text, "hello");
        assert_eq!(deq.offset, 2);
    }
}
