use std::collections::BTreeSet;

use crate::editing::Editor;
use crate::sync::marker::MarkerClassifier;

/// Line indices currently believed to hold marker lines.
///
/// Derived state only: a rebuild from the document is always authoritative.
/// The change gate uses it to tell an edit on (or just off) a marker line
/// apart from an edit elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MarkerTracker {
    lines: BTreeSet<usize>,
}

impl MarkerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and rebuild from every line of the editor
    pub fn refresh(&mut self, editor: &dyn Editor, classifier: &MarkerClassifier) {
        self.lines.clear();
        for index in 0..editor.line_count() {
            if classifier.is_marker(editor.line(index).as_deref()) {
                self.lines.insert(index);
            }
        }
    }

    /// Record whether `index` is a marker line now
    pub fn update(&mut self, index: usize, is_marker: bool) {
        if is_marker {
            self.lines.insert(index);
        } else {
            self.lines.remove(&index);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.lines.contains(&index)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }
}
