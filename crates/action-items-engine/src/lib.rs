pub mod editing;
pub mod io;
pub mod settings;
pub mod sync;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Editor, EditorError, Position, ScrollOffset, TextBuffer};
pub use settings::{SettingsError, SyncSettings};
pub use sync::{CollectOutcome, Dispatched, EditOutcome, HostEvent, Synchronizer, is_marker_line};
