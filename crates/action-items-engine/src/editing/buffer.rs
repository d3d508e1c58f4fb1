use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Rope, RopeInfo};

use crate::editing::{Editor, EditorError, Position, ScrollOffset};

/// In-memory document implementing the [`Editor`] surface.
///
/// The text lives in a single `xi_rope::Rope`, so reading the content back
/// returns exactly the bytes that were loaded or written: line endings and a
/// trailing newline survive untouched. Lines follow `split('\n')` semantics,
/// which means an empty buffer has one empty line and `"a\n"` has two.
///
/// Besides the capability surface the synchronizer consumes, the buffer
/// carries the handful of caret-relative edits a terminal host needs
/// (insert, newline, backspace, delete, motions). Every mutation bumps the
/// version counter so callers can detect change without diffing text.
///
/// ```rust
/// # use action_items_engine::editing::{Editor, Position, TextBuffer};
/// let mut buffer = TextBuffer::from_text("note\n// call bob");
/// buffer.set_cursor(Position::new(1, 2));
/// buffer.insert_char(' ');
/// assert_eq!(buffer.line(1).as_deref(), Some("//  call bob"));
/// assert_eq!(buffer.version(), 1);
/// ```
#[derive(Clone)]
pub struct TextBuffer {
    /// Whole document as UTF-8; the source of truth for every read
    pub(crate) buffer: Rope,
    pub(crate) cursor: Position,
    pub(crate) scroll: ScrollOffset,
    /// Incremented on each mutation (enables change detection)
    pub(crate) version: u64,
    read_only: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            cursor: Position::default(),
            scroll: ScrollOffset::default(),
            version: 0,
            read_only: false,
        }
    }

    /// Create a buffer from raw bytes, rejecting anything that is not UTF-8
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        Self::from_text(&joined.join("\n"))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer.to_string().split('\n').map(str::to_string).collect()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// A read-only buffer refuses `replace_text` but still allows caret moves
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Insert a character at the caret and advance past it
    pub fn insert_char(&mut self, ch: char) {
        let at = self.offset_of(self.cursor);
        let mut encoded = [0u8; 4];
        self.apply_edit(at..at, ch.encode_utf8(&mut encoded));
        self.cursor.column += 1;
    }

    /// Split the current line at the caret
    pub fn insert_newline(&mut self) {
        let at = self.offset_of(self.cursor);
        self.apply_edit(at..at, "\n");
        self.cursor = Position::new(self.cursor.line + 1, 0);
    }

    /// Delete the char before the caret, joining lines at column 0.
    /// Returns false when there was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        let Position { line, column } = self.cursor;
        if column > 0 {
            let start = self.offset_of(Position::new(line, column - 1));
            let end = self.offset_of(self.cursor);
            self.apply_edit(start..end, "");
            self.cursor.column -= 1;
            true
        } else if line > 0 {
            let joined_column = self.line_len(line - 1);
            let end = self.offset_of(self.cursor);
            self.apply_edit(end - 1..end, "");
            self.cursor = Position::new(line - 1, joined_column);
            true
        } else {
            false
        }
    }

    /// Delete the char under the caret, joining with the next line at the
    /// end of a line. Returns false at the end of the document.
    pub fn delete_forward(&mut self) -> bool {
        let Position { line, column } = self.cursor;
        let start = self.offset_of(self.cursor);
        if column < self.line_len(line) {
            let end = self.offset_of(Position::new(line, column + 1));
            self.apply_edit(start..end, "");
            true
        } else if line + 1 < self.line_count() {
            self.apply_edit(start..start + 1, "");
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        let Position { line, column } = self.cursor;
        if column > 0 {
            self.cursor.column = column - 1;
        } else if line > 0 {
            self.cursor = Position::new(line - 1, self.line_len(line - 1));
        }
    }

    pub fn move_right(&mut self) {
        let Position { line, column } = self.cursor;
        if column < self.line_len(line) {
            self.cursor.column = column + 1;
        } else if line + 1 < self.line_count() {
            self.cursor = Position::new(line + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.set_cursor(Position::new(self.cursor.line - 1, self.cursor.column));
        }
    }

    pub fn move_down(&mut self) {
        self.set_cursor(Position::new(self.cursor.line + 1, self.cursor.column));
    }

    pub fn move_line_start(&mut self) {
        self.cursor.column = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor.column = self.line_len(self.cursor.line);
    }

    /// Length of line `index` in chars (0 past the end)
    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).map_or(0, |text| text.chars().count())
    }

    /// Byte range of line `index`, excluding its newline
    fn line_span(&self, index: usize) -> Option<Range<usize>> {
        let count = self.line_count();
        if index >= count {
            return None;
        }
        let start = self.buffer.offset_of_line(index);
        let end = if index + 1 < count {
            self.buffer.offset_of_line(index + 1) - 1
        } else {
            self.buffer.len()
        };
        Some(start..end)
    }

    /// Byte offset of a position, clamped into the document
    fn offset_of(&self, position: Position) -> usize {
        let last = self.line_count().saturating_sub(1);
        let Some(span) = self.line_span(position.line.min(last)) else {
            return self.buffer.len();
        };
        let text = self.buffer.slice_to_cow(span.clone());
        let within = text
            .char_indices()
            .nth(position.column)
            .map_or(text.len(), |(byte, _)| byte);
        span.start + within
    }

    fn apply_edit(&mut self, range: Range<usize>, text: &str) {
        let mut builder: Builder<RopeInfo> = Builder::new(self.buffer.len());
        if text.is_empty() {
            builder.delete(range);
        } else {
            builder.replace(range, Rope::from(text));
        }
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);
        self.version += 1;
    }

    fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.line_count().saturating_sub(1));
        Position::new(line, position.column.min(self.line_len(line)))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for TextBuffer {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, position: Position) {
        self.cursor = self.clamp(position);
    }

    fn line(&self, index: usize) -> Option<String> {
        self.line_span(index)
            .map(|span| self.buffer.slice_to_cow(span).into_owned())
    }

    fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn replace_text(&mut self, text: &str) -> Result<(), EditorError> {
        if self.read_only {
            return Err(EditorError::ReadOnly);
        }
        self.buffer = Rope::from(text);
        self.version += 1;
        self.cursor = self.clamp(self.cursor);
        Ok(())
    }

    fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = scroll;
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("text", &self.buffer.to_string())
            .field("cursor", &self.cursor)
            .field("scroll", &self.scroll)
            .field("version", &self.version)
            .finish()
    }
}
