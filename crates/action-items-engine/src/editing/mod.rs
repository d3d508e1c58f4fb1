/*!
 * # Editing Surface
 *
 * The synchronizer never owns a document. It talks to whatever editor the
 * host provides through the [`Editor`] trait: read the caret, read lines,
 * read the whole text, replace the whole text, and read/restore the scroll
 * offset. Nothing else is assumed, so any host with a line/caret API can
 * drive it.
 *
 * ## Module Structure
 *
 * - **`editor`**: the `Editor` capability trait plus `Position`,
 *   `ScrollOffset` and `EditorError`
 * - **`buffer`**: `TextBuffer`, a rope-backed in-memory implementation used
 *   by the terminal host and by tests
 *
 * ## Usage Pattern
 *
 * ```rust
 * use action_items_engine::editing::{Editor, Position, TextBuffer};
 *
 * let mut buffer = TextBuffer::from_text("// buy milk\nnote");
 * buffer.set_cursor(Position::new(1, 4));
 * assert_eq!(buffer.line(0).as_deref(), Some("// buy milk"));
 * assert_eq!(buffer.line_count(), 2);
 * ```
 */

pub mod buffer;
pub mod editor;

pub use buffer::TextBuffer;
pub use editor::{Editor, EditorError, Position, ScrollOffset};
