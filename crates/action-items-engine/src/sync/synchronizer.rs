use std::cell::{Cell, RefCell};
use std::time::Instant;

use thiserror::Error;

use crate::editing::{Editor, EditorError, Position, ScrollOffset};
use crate::settings::SyncSettings;
use crate::sync::cursor::{clamp_position, remap_after_merge, remap_after_removal};
use crate::sync::gate::{Route, Throttle, route};
use crate::sync::marker::MarkerClassifier;
use crate::sync::section::{
    body_matches, find_section, format_bullets, merge_section, remove_section_lines, scan_items,
};
use crate::sync::tracker::MarkerTracker;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to rewrite document: {0}")]
    Rewrite(#[from] EditorError),
}

/// Host notifications the synchronizer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The document changed
    Edit,
    /// A view gained focus; its editor may be absent
    Activate,
    /// The user ran "Collect Action Items"
    Command,
}

/// What a collector or remover run did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// A new section was prepended
    Inserted,
    /// An existing section body was rewritten
    Updated,
    /// The section already matched; the document was not touched
    Unchanged,
    /// No action items remain and the section was deleted
    Removed,
    /// No action items and no section
    NothingToDo,
    /// A run was already in progress
    Skipped,
    /// The rewrite failed; the error was logged
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Fired from inside our own rewrite
    Reentrant,
    /// The caret line is a half-typed marker prefix
    PartialMarker,
}

/// What the change gate decided for one edit notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Collected { route: Route, outcome: CollectOutcome },
    /// Unrelated edit inside the throttle window
    Deferred,
    Suppressed(SuppressReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Edit(EditOutcome),
    Activated,
    Collected(CollectOutcome),
    /// Edit or command arrived without an editor
    NoEditor,
}

/// Clears the processing flag on every exit path
struct ProcessingGuard<'a>(&'a Cell<bool>);

impl<'a> ProcessingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps the managed "Action Items" section in step with the marker lines
/// of one editor session.
///
/// Create one per open view and drop it when the view closes. Entry points
/// take `&self` so a host whose `replace_text` synchronously fires another
/// edit notification can call straight back in; that nested call sees the
/// processing flag and returns without touching the document.
///
/// ```rust
/// use action_items_engine::editing::{Editor, TextBuffer};
/// use action_items_engine::sync::{CollectOutcome, Synchronizer};
///
/// let mut buffer = TextBuffer::from_text("// buy milk\nnote");
/// let sync = Synchronizer::default();
///
/// assert_eq!(sync.collect(&mut buffer), CollectOutcome::Inserted);
/// assert_eq!(buffer.text(), "# Action Items\n- buy milk\n\n// buy milk\nnote");
///
/// // Collecting again without edits leaves the text as it is
/// let once = buffer.text();
/// sync.collect(&mut buffer);
/// assert_eq!(buffer.text(), once);
/// ```
#[derive(Debug)]
pub struct Synchronizer {
    settings: SyncSettings,
    classifier: MarkerClassifier,
    tracker: RefCell<MarkerTracker>,
    throttle: Throttle,
    processing: Cell<bool>,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(SyncSettings::default())
    }
}

impl Synchronizer {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            classifier: MarkerClassifier::new(settings.marker_prefix.clone()),
            throttle: Throttle::new(settings.throttle_window()),
            tracker: RefCell::new(MarkerTracker::new()),
            processing: Cell::new(false),
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Snapshot of the tracked marker line indices
    pub fn tracked_lines(&self) -> Vec<usize> {
        self.tracker.borrow().iter().collect()
    }

    /// Route a host notification to its handler
    pub fn dispatch(&self, event: HostEvent, editor: Option<&mut dyn Editor>) -> Dispatched {
        match (event, editor) {
            (HostEvent::Activate, editor) => {
                self.on_activate(editor.as_deref());
                Dispatched::Activated
            }
            (_, None) => {
                log::warn!("{event:?} notification without an active editor");
                Dispatched::NoEditor
            }
            (HostEvent::Edit, Some(editor)) => Dispatched::Edit(self.on_edit(editor)),
            (HostEvent::Command, Some(editor)) => Dispatched::Collected(self.collect(editor)),
        }
    }

    /// Rebuild tracking for the newly focused editor
    pub fn on_activate(&self, editor: Option<&dyn Editor>) {
        match editor {
            Some(editor) => self.refresh_tracking(editor),
            None => self.tracker.borrow_mut().clear(),
        }
    }

    pub fn on_edit(&self, editor: &mut dyn Editor) -> EditOutcome {
        self.on_edit_at(editor, Instant::now())
    }

    /// Change gate with an explicit clock
    pub fn on_edit_at(&self, editor: &mut dyn Editor, now: Instant) -> EditOutcome {
        if self.processing.get() {
            return EditOutcome::Suppressed(SuppressReason::Reentrant);
        }

        let cursor = editor.cursor();
        let line = editor.line(cursor.line);
        let is_marker = self.classifier.is_marker(line.as_deref());
        let tracked = self.tracker.borrow().contains(cursor.line);
        let route = route(
            is_marker,
            tracked,
            cursor.column,
            self.settings.line_start_columns,
        );

        if route == Route::Immediate {
            self.tracker.borrow_mut().update(cursor.line, is_marker);
        }

        if line
            .as_deref()
            .is_some_and(|text| self.classifier.is_partial_marker(text))
        {
            log::debug!("Line {} holds a partial marker, waiting", cursor.line);
            return EditOutcome::Suppressed(SuppressReason::PartialMarker);
        }

        match route {
            Route::Immediate => {}
            Route::LineStart => {
                self.throttle.restart(now);
                self.refresh_tracking(editor);
            }
            Route::Throttled => {
                if !self.throttle.try_acquire(now) {
                    return EditOutcome::Deferred;
                }
                self.refresh_tracking(editor);
            }
        }

        log::debug!("Edit at {cursor:?} routed {route:?}");
        let outcome = self.collect(editor);
        EditOutcome::Collected { route, outcome }
    }

    /// Rebuild the tracked marker lines from the whole document
    pub fn refresh_tracking(&self, editor: &dyn Editor) {
        self.tracker.borrow_mut().refresh(editor, &self.classifier);
    }

    /// Scan the document and bring the managed section up to date.
    ///
    /// Never fails from the host's point of view: errors are logged and
    /// reported as [`CollectOutcome::Failed`], leaving the document as the
    /// last successful write left it.
    pub fn collect(&self, editor: &mut dyn Editor) -> CollectOutcome {
        let Some(_guard) = ProcessingGuard::enter(&self.processing) else {
            return CollectOutcome::Skipped;
        };
        self.report("collect action items", self.try_collect(editor))
    }

    /// Delete the managed section if there is one
    pub fn remove_section(&self, editor: &mut dyn Editor) -> CollectOutcome {
        let Some(_guard) = ProcessingGuard::enter(&self.processing) else {
            return CollectOutcome::Skipped;
        };
        let cursor = editor.cursor();
        let scroll = editor.scroll();
        let text = editor.text();
        let lines: Vec<&str> = text.split('\n').collect();
        self.report(
            "remove action items section",
            self.remove_from(editor, &lines, cursor, scroll),
        )
    }

    fn report(&self, action: &str, result: Result<CollectOutcome, SyncError>) -> CollectOutcome {
        match result {
            Ok(outcome) => {
                log::debug!("{action}: {outcome:?}");
                outcome
            }
            Err(e) => {
                log::error!("Failed to {action}: {e}");
                CollectOutcome::Failed
            }
        }
    }

    fn try_collect(&self, editor: &mut dyn Editor) -> Result<CollectOutcome, SyncError> {
        let cursor = editor.cursor();
        let scroll = editor.scroll();
        let cursor_on_action_item = self.classifier.is_marker(editor.line(cursor.line).as_deref());

        let text = editor.text();
        let lines: Vec<&str> = text.split('\n').collect();
        let items = scan_items(&lines, &self.classifier);
        if items.is_empty() {
            return self.remove_from(editor, &lines, cursor, scroll);
        }

        let SyncSettings {
            heading,
            bullet_prefix,
            ..
        } = &self.settings;
        let bullets = format_bullets(&items, bullet_prefix);
        let existing = find_section(&lines, heading, bullet_prefix);

        if let Some(span) = existing
            && !cursor_on_action_item
            && body_matches(&lines, span, &bullets)
        {
            return Ok(CollectOutcome::Unchanged);
        }

        let merge = merge_section(&lines, existing, heading, &bullets);
        editor.replace_text(&merge.lines.join("\n"))?;

        let target = remap_after_merge(cursor, existing, merge.delta);
        self.restore_view(editor, clamp_position(target, &merge.lines), scroll);

        Ok(match existing {
            Some(_) => CollectOutcome::Updated,
            None => CollectOutcome::Inserted,
        })
    }

    fn remove_from(
        &self,
        editor: &mut dyn Editor,
        lines: &[&str],
        cursor: Position,
        scroll: ScrollOffset,
    ) -> Result<CollectOutcome, SyncError> {
        let Some(span) = find_section(lines, &self.settings.heading, &self.settings.bullet_prefix)
        else {
            return Ok(CollectOutcome::NothingToDo);
        };

        let remaining = remove_section_lines(lines, span);
        editor.replace_text(&remaining.join("\n"))?;

        let target = remap_after_removal(cursor, span);
        self.restore_view(editor, clamp_position(target, &remaining), scroll);
        Ok(CollectOutcome::Removed)
    }

    fn restore_view(&self, editor: &mut dyn Editor, cursor: Position, scroll: ScrollOffset) {
        editor.set_cursor(cursor);
        editor.set_scroll(scroll);
        self.refresh_tracking(editor);
    }
}
