use std::ops::Range;

use crate::models::Word;

/// Cell that always holds the fixation character.
pub const ORP_CELL: usize = 3;

pub const PARAGRAPH_VISIBLE_LINES: usize = 5;

/// A word laid out into fixed-width cells with its ORP pinned to `ORP_CELL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub cells: Vec<Option<char>>,
    pub orp_cell: usize,
    /// Suffix characters that did not fit in the row.
    pub overflow: String,
}

impl CellRow {
    pub fn prefix(&self) -> String {
        self.cells[..self.orp_cell]
            .iter()
            .map(|c| c.unwrap_or(' '))
            .collect()
    }

    pub fn pivot(&self) -> Option<char> {
        self.cells.get(self.orp_cell).copied().flatten()
    }

    pub fn suffix(&self) -> String {
        self.cells
            .get(self.orp_cell + 1..)
            .unwrap_or_default()
            .iter()
            .map(|c| c.unwrap_or(' '))
            .collect()
    }
}

pub fn layout_word(word: &Word, total_cells: usize) -> CellRow {
    let total_cells = total_cells.max(ORP_CELL + 1);
    let mut cells = vec![None; total_cells];
    let (prefix, pivot, suffix) = word.split_at_orp();

    // The ORP is capped at ORP_CELL, so the prefix never runs off the left edge.
    let prefix_chars: Vec<char> = prefix.chars().collect();
    let start = ORP_CELL - prefix_chars.len().min(ORP_CELL);
    for (offset, ch) in prefix_chars.iter().take(ORP_CELL).enumerate() {
        cells[start + offset] = Some(*ch);
    }
    cells[ORP_CELL] = pivot;

    let mut overflow = String::new();
    for (offset, ch) in suffix.chars().enumerate() {
        match cells.get_mut(ORP_CELL + 1 + offset) {
            Some(cell) => *cell = Some(ch),
            None => overflow.push(ch),
        }
    }

    CellRow {
        cells,
        orp_cell: ORP_CELL,
        overflow,
    }
}

/// Lines of the paragraph view around the current word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphWindow {
    pub lines: Vec<Range<usize>>,
    /// Index into `lines` of the line holding the current word.
    pub current_line: usize,
    pub more_before: bool,
    pub more_after: bool,
}

pub fn words_per_line(width: u16) -> usize {
    // Rough average word width including the separating space.
    ((width as usize) / 7).max(5)
}

pub fn paragraph_window(
    len: usize,
    current: usize,
    words_per_line: usize,
    visible_lines: usize,
) -> ParagraphWindow {
    let words_per_line = words_per_line.max(1);
    let visible_lines = visible_lines.max(1);
    if len == 0 {
        return ParagraphWindow {
            lines: Vec::new(),
            current_line: 0,
            more_before: false,
            more_after: false,
        };
    }

    let total_lines = len.div_ceil(words_per_line);
    let current = current.min(len - 1);
    let current_line = current / words_per_line;
    let first = current_line.saturating_sub(visible_lines / 2);
    let last = (first + visible_lines).min(total_lines);

    let lines = (first..last)
        .map(|line| {
            let start = line * words_per_line;
            start..(start + words_per_line).min(len)
        })
        .collect();

    ParagraphWindow {
        lines,
        current_line: current_line - first,
        more_before: first > 0,
        more_after: last < total_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn single(text: &str) -> Word {
        tokenize(text).remove(0)
    }

    #[test]
    fn test_layout_pins_orp_to_fixed_cell() {
        let row = layout_word(&single("quick"), 13);
        assert_eq!(row.cells.len(), 13);
        assert_eq!(row.pivot(), Some('i'));
        assert_eq!(row.prefix(), " qu");
        assert!(row.suffix().starts_with("ck"));
        assert!(row.overflow.is_empty());
    }

    #[test]
    fn test_layout_short_word() {
        let row = layout_word(&single("a"), 10);
        assert_eq!(row.pivot(), Some('a'));
        assert_eq!(row.prefix(), "   ");
    }

    #[test]
    fn test_layout_overflow_when_word_exceeds_cells() {
        // orp 3, suffix has 11 chars, only 6 fit in 10 cells
        let row = layout_word(&single("internationally"), 10);
        assert_eq!(row.prefix(), "int");
        assert_eq!(row.pivot(), Some('e'));
        assert_eq!(row.suffix(), "rnatio");
        assert_eq!(row.overflow, "nally");
    }

    #[test]
    fn test_paragraph_window_centers_current_line() {
        let window = paragraph_window(100, 55, 10, 5);
        assert_eq!(window.lines.first(), Some(&(30..40)));
        assert_eq!(window.lines.len(), 5);
        assert_eq!(window.lines[window.current_line], 50..60);
        assert!(window.more_before);
        assert!(window.more_after);
    }

    #[test]
    fn test_paragraph_window_at_edges() {
        let start = paragraph_window(23, 0, 10, 5);
        assert_eq!(start.lines, vec![0..10, 10..20, 20..23]);
        assert_eq!(start.current_line, 0);
        assert!(!start.more_before);
        assert!(!start.more_after);

        let empty = paragraph_window(0, 0, 10, 5);
        assert!(empty.lines.is_empty());
    }

    #[test]
    fn test_words_per_line_has_floor() {
        assert_eq!(words_per_line(10), 5);
        assert_eq!(words_per_line(140), 20);
    }
}
