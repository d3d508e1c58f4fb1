use thiserror::Error;

/// Caret location. Both coordinates are 0-based; `column` counts chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Viewport offset in lines (`top`) and columns (`left`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub left: usize,
    pub top: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum EditorError {
    #[error("Editor is read-only")]
    ReadOnly,
    #[error("Editor rejected the edit: {0}")]
    Rejected(String),
}

/// The slice of a host editor the synchronizer needs.
///
/// Lines are separated by `\n` and never include the separator. A document
/// always has at least one (possibly empty) line from the host's point of
/// view, but implementations may report zero for a detached view and the
/// synchronizer copes with either.
pub trait Editor {
    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, position: Position);

    /// Text of line `index`, or `None` past the end of the document.
    fn line(&self, index: usize) -> Option<String>;

    fn line_count(&self) -> usize;

    fn text(&self) -> String;

    /// Replace the whole document in one operation.
    fn replace_text(&mut self, text: &str) -> Result<(), EditorError>;

    fn scroll(&self) -> ScrollOffset;

    fn set_scroll(&mut self, scroll: ScrollOffset);
}
