//! Byte offset ⇄ line/column conversion.
//!
//! [`LineIndex`] owns a text snapshot immutably and is built once by a
//! single forward scan. There is no incremental update: callers rebuild
//! the index (by re-parsing the document) whenever the text changes.

use std::sync::Arc;

use text_size::TextSize;

use super::position::Position;

/// Immutable line table over one text snapshot.
///
/// Recognizes `\r`, `\n` and `\r\n` line terminators. Line starts and
/// ends are parallel, monotonically increasing byte offsets; the end of a
/// line excludes its terminator.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: Arc<str>,
    line_starts: Vec<u32>,
    line_ends: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let bytes = text.as_bytes();

        let mut line_starts = Vec::with_capacity(16);
        let mut line_ends = Vec::with_capacity(16);
        let mut start = 0u32;

        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push(start);
                    line_ends.push(i as u32);
                    start = (i + 1) as u32;
                }
                b'\r' => {
                    line_starts.push(start);
                    line_ends.push(i as u32);
                    // \r\n counts as one terminator
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    start = (i + 1) as u32;
                }
                _ => {}
            }
            i += 1;
        }
        line_starts.push(start);
        line_ends.push(bytes.len() as u32);

        Self {
            text,
            line_starts,
            line_ends,
        }
    }

    /// The indexed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the indexed text.
    pub fn text_arc(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Total length of the text in bytes.
    pub fn len(&self) -> TextSize {
        TextSize::from(self.text.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines. At least 1, even for empty text.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset into a line/column position.
    ///
    /// Total function: offsets past the end of the text are clamped to the
    /// last line, never panics. O(log n) binary search.
    pub fn position_at(&self, offset: TextSize) -> Position {
        let offset = u32::from(offset).min(self.text.len() as u32);

        // Greatest line start <= offset
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };

        Position {
            line: line as u32,
            column: offset - self.line_starts[line],
        }
    }

    /// Convert a line/column position back into a byte offset.
    ///
    /// The line is clamped to the last line and the column to that line's
    /// length, so the result is always a valid offset.
    pub fn offset_at(&self, position: Position) -> TextSize {
        let line = (position.line as usize).min(self.line_starts.len() - 1);
        let end = if line + 1 < self.line_starts.len() {
            self.line_ends[line]
        } else {
            self.text.len() as u32
        };
        TextSize::from((self.line_starts[line] + position.column).min(end))
    }

    /// The text of one line, without its terminator. `None` out of range.
    pub fn line_at(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        Some(&self.text[self.line_starts[line] as usize..self.line_ends[line] as usize])
    }

    /// Length of one line in bytes, without its terminator. 0 out of range.
    pub fn line_len(&self, line: u32) -> u32 {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return 0;
        }
        self.line_ends[line] - self.line_starts[line]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_at(0), Some(""));
        assert_eq!(index.position_at(TextSize::from(0)), Position::new(0, 0));
    }

    #[test]
    fn test_line_terminators() {
        let index = LineIndex::new("a\nbb\r\nccc\rd");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_at(0), Some("a"));
        assert_eq!(index.line_at(1), Some("bb"));
        assert_eq!(index.line_at(2), Some("ccc"));
        assert_eq!(index.line_at(3), Some("d"));
        assert_eq!(index.line_at(4), None);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_at(1), Some(""));
    }

    #[test]
    fn test_position_at() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.position_at(TextSize::from(0)), Position::new(0, 0));
        assert_eq!(index.position_at(TextSize::from(2)), Position::new(0, 2));
        assert_eq!(index.position_at(TextSize::from(3)), Position::new(1, 0));
        assert_eq!(index.position_at(TextSize::from(5)), Position::new(1, 2));
    }

    #[test]
    fn test_position_at_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position_at(TextSize::from(99)), Position::new(0, 2));
    }

    #[test]
    fn test_round_trip_every_offset() {
        let text = "first\r\nsecond\nthird\rlast line";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() as u32 {
            let pos = index.position_at(TextSize::from(offset));
            // line start + column must reconstruct the offset
            let line_start = u32::from(index.offset_at(Position::new(pos.line, 0)));
            assert_eq!(line_start + pos.column, offset, "offset {offset}");
        }
    }

    #[test]
    fn test_offset_at_clamps_column() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset_at(Position::new(0, 99)), TextSize::from(2));
        assert_eq!(index.offset_at(Position::new(9, 0)), TextSize::from(5));
    }
}
