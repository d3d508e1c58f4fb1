use crate::settings::DEFAULT_MARKER_PREFIX;

/// True when the trimmed line starts with the default `//` prefix.
///
/// Total over its input: `None` and empty lines are simply not markers.
pub fn is_marker_line(line: Option<&str>) -> bool {
    MarkerClassifier::default().is_marker(line)
}

/// Classifies lines against a configurable marker prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerClassifier {
    prefix: String,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PREFIX)
    }
}

impl MarkerClassifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_marker(&self, line: Option<&str>) -> bool {
        match line {
            Some(text) if !text.is_empty() => text.trim().starts_with(self.prefix.as_str()),
            _ => false,
        }
    }

    /// Trimmed text after the prefix for marker lines. The payload may be
    /// empty, in which case the line is a marker without an action item.
    pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.trim()
            .strip_prefix(self.prefix.as_str())
            .map(str::trim)
    }

    /// The action item carried by `line`, if any
    pub fn action_item<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.payload(line).filter(|item| !item.is_empty())
    }

    /// True while the user is partway through typing the prefix itself:
    /// `/`, `//` or `// ` for the default prefix.
    pub fn is_partial_marker(&self, line: &str) -> bool {
        let trimmed = line.trim();
        !trimmed.is_empty() && self.prefix.starts_with(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("// buy milk"), true)]
    #[case(Some("   //indented"), true)]
    #[case(Some("//"), true)]
    #[case(Some("\t// tabbed  "), true)]
    #[case(Some("/ single slash"), false)]
    #[case(Some("note // trailing"), false)]
    #[case(Some("- // bullet"), false)]
    #[case(Some(""), false)]
    #[case(Some("   "), false)]
    #[case(None, false)]
    fn test_is_marker_line(#[case] line: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_marker_line(line), expected);
    }

    #[rstest]
    #[case("// buy milk", Some("buy milk"))]
    #[case("  //   call bob  ", Some("call bob"))]
    #[case("//", Some(""))]
    #[case("note", None)]
    fn test_payload(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(MarkerClassifier::default().payload(line), expected);
    }

    #[test]
    fn test_empty_payload_is_marker_but_not_item() {
        let classifier = MarkerClassifier::default();
        assert!(classifier.is_marker(Some("//   ")));
        assert_eq!(classifier.action_item("//   "), None);
    }

    #[rstest]
    #[case("/", true)]
    #[case("//", true)]
    #[case("// ", true)]
    #[case("  / ", true)]
    #[case("// x", false)]
    #[case("", false)]
    #[case("x", false)]
    fn test_is_partial_marker(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(MarkerClassifier::default().is_partial_marker(line), expected);
    }

    #[test]
    fn test_custom_prefix() {
        let classifier = MarkerClassifier::new("TODO:");
        assert!(classifier.is_marker(Some("  TODO: ship it")));
        assert_eq!(classifier.action_item("TODO: ship it"), Some("ship it"));
        assert!(classifier.is_partial_marker("TO"));
        assert!(!is_marker_line(Some("TODO: ship it")));
    }
}
