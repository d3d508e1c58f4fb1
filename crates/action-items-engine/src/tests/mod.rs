use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::editing::{Editor, Position, TextBuffer};

/// Create a temporary directory for document files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test document with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Buffer built from `lines` with the caret placed at `cursor`
pub fn buffer_at(lines: &[&str], cursor: Position) -> TextBuffer {
    let mut buffer = TextBuffer::from_lines(lines);
    buffer.set_cursor(cursor);
    buffer
}

pub fn lines_of(editor: &dyn Editor) -> Vec<String> {
    (0..editor.line_count())
        .filter_map(|index| editor.line(index))
        .collect()
}
