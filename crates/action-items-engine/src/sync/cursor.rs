use crate::editing::Position;
use crate::sync::section::SectionSpan;

/// Shift a caret after the section body changed size.
///
/// Lines at or below the section start move by `delta`; lines above it are
/// untouched. With no prior section everything moved down from the top.
pub fn remap_after_merge(cursor: Position, section: Option<SectionSpan>, delta: isize) -> Position {
    let shifts = section.is_none_or(|span| cursor.line >= span.start);
    if !shifts {
        return cursor;
    }
    Position::new(cursor.line.saturating_add_signed(delta), cursor.column)
}

/// Shift a caret after `span` was deleted. A caret inside the removed
/// lines lands on the line that now occupies the former heading slot.
pub fn remap_after_removal(cursor: Position, span: SectionSpan) -> Position {
    if cursor.line >= span.end {
        Position::new(cursor.line - span.len(), cursor.column)
    } else if span.contains(cursor.line) {
        Position::new(span.start, cursor.column)
    } else {
        cursor
    }
}

/// Clamp into `[0, lines - 1]` and the chosen line's length in chars
pub fn clamp_position<S: AsRef<str>>(position: Position, lines: &[S]) -> Position {
    let line = position.line.min(lines.len().saturating_sub(1));
    let width = lines
        .get(line)
        .map_or(0, |text| text.as_ref().chars().count());
    Position::new(line, position.column.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SPAN: SectionSpan = SectionSpan { start: 2, end: 5 };

    #[rstest]
    #[case(Position::new(0, 4), Some(SPAN), 2, Position::new(0, 4))]
    #[case(Position::new(2, 0), Some(SPAN), 2, Position::new(4, 0))]
    #[case(Position::new(3, 1), Some(SPAN), 2, Position::new(5, 1))]
    #[case(Position::new(7, 3), Some(SPAN), -1, Position::new(6, 3))]
    #[case(Position::new(0, 2), None, 4, Position::new(4, 2))]
    fn test_remap_after_merge(
        #[case] cursor: Position,
        #[case] section: Option<SectionSpan>,
        #[case] delta: isize,
        #[case] expected: Position,
    ) {
        assert_eq!(remap_after_merge(cursor, section, delta), expected);
    }

    #[rstest]
    #[case(Position::new(1, 3), Position::new(1, 3))]
    #[case(Position::new(2, 3), Position::new(2, 3))]
    #[case(Position::new(4, 9), Position::new(2, 9))]
    #[case(Position::new(5, 1), Position::new(2, 1))]
    #[case(Position::new(8, 0), Position::new(5, 0))]
    fn test_remap_after_removal(#[case] cursor: Position, #[case] expected: Position) {
        assert_eq!(remap_after_removal(cursor, SPAN), expected);
    }

    #[test]
    fn test_clamp_position() {
        let lines = ["short", "café"];
        assert_eq!(clamp_position(Position::new(9, 9), &lines), Position::new(1, 4));
        assert_eq!(clamp_position(Position::new(0, 2), &lines), Position::new(0, 2));
    }

    #[test]
    fn test_clamp_position_on_empty_document() {
        let lines: [&str; 0] = [];
        assert_eq!(clamp_position(Position::new(3, 3), &lines), Position::new(0, 0));
    }
}
