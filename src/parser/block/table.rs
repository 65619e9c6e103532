// Pipe tables: a header row, a delimiter row of `---`/`:--`/`--:`/`:-:`
// cells, then zero or more data rows. Rows with fewer cells than the header
// are padded with empty cells; rows with more are truncated, per §4.2.

use crate::ast::{Block, CellAlign, Isp, NonEmptyVec};
use crate::parser::line::SourceLine;

pub fn try_pipe_table<'a>(
    lines: &'a [SourceLine<'a>],
    ref_level: usize,
) -> Option<(Block<Isp>, &'a [SourceLine<'a>])> {
    let header_line = lines.first()?;
    if header_line.indent_width() >= ref_level + 4 {
        return None;
    }
    let delim_line = lines.get(1)?;
    let aligns = parse_delimiter_row(delim_line.text)?;

    let header_cells = split_row(header_line.text, header_line.offset);
    if header_cells.is_empty() {
        return None;
    }

    let mut rows: Vec<NonEmptyVec<Isp>> = vec![pad_row(header_cells, aligns.len())];
    let mut idx = 2usize;
    while idx < lines.len() {
        let line = &lines[idx];
        if line.is_blank() || !line.text.contains('|') {
            break;
        }
        let cells = split_row(line.text, line.offset);
        rows.push(pad_row(cells, aligns.len()));
        idx += 1;
    }

    Some((
        Block::Table {
            aligns: NonEmptyVec::from_vec(aligns)?,
            rows: NonEmptyVec::from_vec(rows)?,
        },
        &lines[idx..],
    ))
}

fn parse_delimiter_row(text: &str) -> Option<Vec<CellAlign>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cells: Vec<&str> = trimmed
        .trim_matches('|')
        .split('|')
        .map(|c| c.trim())
        .collect();
    if cells.is_empty() {
        return None;
    }
    let mut aligns = Vec::with_capacity(cells.len());
    for cell in cells {
        if cell.is_empty() || !cell.chars().all(|c| matches!(c, '-' | ':')) {
            return None;
        }
        if !cell.contains('-') {
            return None;
        }
        let left = cell.starts_with(':');
        let right = cell.ends_with(':');
        aligns.push(match (left, right) {
            (true, true) => CellAlign::Center,
            (true, false) => CellAlign::Left,
            (false, true) => CellAlign::Right,
            (false, false) => CellAlign::Default,
        });
    }
    Some(aligns)
}

/// Split a row on unescaped `|`, returning each cell as an `Isp` located at
/// its offset within the original line.
fn split_row(text: &str, line_offset: usize) -> Vec<Isp> {
    let trimmed = text.trim();
    let leading_trim = text.len() - text.trim_start().len();
    let inner = trimmed.trim_start_matches('|');
    let start_trim = text.trim_start();
    let after_leading_pipe_bytes = start_trim.len() - inner.len();
    let base_offset = line_offset + leading_trim + after_leading_pipe_bytes;

    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut cell_start = 0usize;
    let bytes = inner.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
            continue;
        }
        if bytes[i] == b'|' {
            cells.push((cell_start, i));
            cell_start = i + 1;
        }
        i += 1;
    }
    cells.push((cell_start, inner.len()));

    cells
        .into_iter()
        .map(|(start, end)| {
            let raw = &inner[start..end];
            let cell_trimmed = raw.trim();
            let leading = raw.len() - raw.trim_start().len();
            Isp::span(base_offset + start + leading, cell_trimmed.replace("\\|", "|"))
        })
        .collect()
}

fn pad_row(mut cells: Vec<Isp>, width: usize) -> NonEmptyVec<Isp> {
    while cells.len() < width {
        cells.push(Isp::span(0, String::new()));
    }
    cells.truncate(width.max(1));
    NonEmptyVec::from_vec(cells).expect("width is at least 1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line::split_lines;

    #[test]
    fn parses_header_and_alignment_row() {
        let lines = split_lines("a | b\n---|:---:\nc | d\n");
        let (block, rest) = try_pipe_table(&lines, 0).unwrap();
        match block {
            Block::Table { aligns, rows } => {
                assert_eq!(aligns.len(), 2);
                assert_eq!(*aligns.first(), CellAlign::Default);
                assert_eq!(rows.len(), 2);
            }
            _ => panic!("expected table"),
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn pads_short_rows_with_empty_cells() {
        let lines = split_lines("a | b | c\n---|---|---\nonly-one\n");
        let (block, _) = try_pipe_table(&lines, 0).unwrap();
        match block {
            Block::Table { rows, .. } => {
                let data_row = rows.iter().nth(1).unwrap();
                assert_eq!(data_row.len(), 3);
            }
            _ => panic!("expected table"),
        }
    }
}
