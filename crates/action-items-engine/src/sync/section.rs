//! Line-level algorithms behind the managed section.
//!
//! Everything here is pure over `&[String]`; the synchronizer owns the
//! editor round-trip.

use std::ops::Range;

use crate::sync::marker::MarkerClassifier;

/// Location of the managed section: `start` is the heading line, `end` is
/// exclusive and points at the first line after the bullet/blank run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    /// Lines between the heading and the end of the section
    pub fn body(&self) -> Range<usize> {
        self.start + 1..self.end
    }

    /// Number of lines including the heading
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..self.end).contains(&line)
    }
}

/// Result of merging fresh bullets into a document
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub lines: Vec<String>,
    /// Net change in line count for content after the section
    pub delta: isize,
}

/// Payloads of every marker line with a non-empty payload, top to bottom
pub fn scan_items<'a, S: AsRef<str>>(lines: &'a [S], classifier: &MarkerClassifier) -> Vec<&'a str> {
    lines
        .iter()
        .filter_map(|line| classifier.action_item(line.as_ref()))
        .collect()
}

pub fn format_bullets(items: &[&str], bullet_prefix: &str) -> Vec<String> {
    items
        .iter()
        .map(|item| format!("{bullet_prefix}{item}"))
        .collect()
}

/// Find the first line equal to `heading` and extend over the bullets and
/// blank lines that follow it.
///
/// The run does not distinguish our bullets from the user's: bullet lines
/// that directly follow the section (for instance a document that began
/// with a list before the section was prepended) become part of it and are
/// replaced on the next merge.
pub fn find_section<S: AsRef<str>>(
    lines: &[S],
    heading: &str,
    bullet_prefix: &str,
) -> Option<SectionSpan> {
    let start = lines.iter().position(|line| line.as_ref() == heading)?;
    let run = lines[start + 1..]
        .iter()
        .take_while(|line| {
            let line = line.as_ref();
            line.starts_with(bullet_prefix) || line.trim().is_empty()
        })
        .count();
    Some(SectionSpan {
        start,
        end: start + 1 + run,
    })
}

/// Compare the existing section body against freshly formatted bullets,
/// ignoring surrounding whitespace.
pub fn body_matches<S: AsRef<str>>(lines: &[S], span: SectionSpan, bullets: &[String]) -> bool {
    let existing: Vec<&str> = lines[span.body()].iter().map(AsRef::as_ref).collect();
    existing.join("\n").trim() == bullets.join("\n").trim()
}

/// Splice `bullets` into the document.
///
/// With an existing section the body is replaced in place (heading line
/// untouched). Without one, heading, bullets and a blank line are
/// prepended, and `delta` is exactly that many lines (`bullets + 2`) so a
/// caret below keeps pointing at the same content line.
pub fn merge_section<S: AsRef<str>>(
    lines: &[S],
    existing: Option<SectionSpan>,
    heading: &str,
    bullets: &[String],
) -> Merge {
    let owned = |slice: &[S]| slice.iter().map(|line| line.as_ref().to_string()).collect::<Vec<_>>();

    match existing {
        Some(span) => {
            let mut merged = owned(&lines[..=span.start]);
            merged.extend(bullets.iter().cloned());
            merged.push(String::new());
            merged.extend(owned(&lines[span.end..]));
            let old_body = span.body().len() as isize;
            Merge {
                lines: merged,
                delta: bullets.len() as isize + 1 - old_body,
            }
        }
        None => {
            let mut merged = Vec::with_capacity(lines.len() + bullets.len() + 2);
            merged.push(heading.to_string());
            merged.extend(bullets.iter().cloned());
            merged.push(String::new());
            merged.extend(owned(lines));
            Merge {
                lines: merged,
                delta: bullets.len() as isize + 2,
            }
        }
    }
}

/// Document without the heading and its bullet/blank run
pub fn remove_section_lines<S: AsRef<str>>(lines: &[S], span: SectionSpan) -> Vec<String> {
    lines[..span.start]
        .iter()
        .chain(&lines[span.end..])
        .map(|line| line.as_ref().to_string())
        .collect()
}
