use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::sync::MarkerClassifier;

/// Settings that would make the collector disagree with its own output
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("{0} must fit on one line")]
    MultiLine(&'static str),
    #[error("heading {heading:?} would be read as a marker line for prefix {prefix:?}")]
    MarkerMatchesHeading { heading: String, prefix: String },
    #[error("bullet prefix {bullet:?} would be read as a marker line for prefix {prefix:?}")]
    MarkerMatchesBullet { bullet: String, prefix: String },
}

/// Tunables for the synchronizer.
///
/// Every field has a default so a partial `[sync]` table in the config file
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Prefix that turns a line into a marker line once trimmed.
    pub marker_prefix: String,
    /// Sentinel heading that opens the managed section.
    pub heading: String,
    /// Prefix written before each summary entry.
    pub bullet_prefix: String,
    /// Minimum spacing between full rescans triggered by unrelated edits.
    pub throttle_ms: u64,
    /// Edits at or left of this column get a rescan without waiting for the
    /// throttle window. Catches the first keystrokes of a new marker.
    pub line_start_columns: usize,
}

pub const DEFAULT_MARKER_PREFIX: &str = "//";
pub const DEFAULT_HEADING: &str = "# Action Items";
pub const DEFAULT_BULLET_PREFIX: &str = "- ";

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            heading: DEFAULT_HEADING.to_string(),
            bullet_prefix: DEFAULT_BULLET_PREFIX.to_string(),
            throttle_ms: 500,
            line_start_columns: 10,
        }
    }
}

impl SyncSettings {
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Reject settings under which a collect is not a fixed point: the
    /// heading or a written bullet counting as a marker, or a bullet prefix
    /// that swallows ordinary lines into the section.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("marker_prefix", &self.marker_prefix),
            ("heading", &self.heading),
            ("bullet_prefix", &self.bullet_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::Blank(name));
            }
            if value.contains('\n') || value.contains('\r') {
                return Err(SettingsError::MultiLine(name));
            }
        }

        if MarkerClassifier::new(self.marker_prefix.as_str()).is_marker(Some(&self.heading)) {
            return Err(SettingsError::MarkerMatchesHeading {
                heading: self.heading.clone(),
                prefix: self.marker_prefix.clone(),
            });
        }

        // A bullet trims to `bullet_prefix.trim_start()` followed by the item,
        // so the marker matches some bullet when either is a prefix of the other.
        let bullet = self.bullet_prefix.trim_start();
        if bullet.starts_with(self.marker_prefix.as_str()) || self.marker_prefix.starts_with(bullet) {
            return Err(SettingsError::MarkerMatchesBullet {
                bullet: self.bullet_prefix.clone(),
                prefix: self.marker_prefix.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_document_format() {
        let settings = SyncSettings::default();
        assert_eq!(settings.marker_prefix, "//");
        assert_eq!(settings.heading, "# Action Items");
        assert_eq!(settings.bullet_prefix, "- ");
        assert_eq!(settings.throttle_window(), Duration::from_millis(500));
        assert_eq!(settings.line_start_columns, 10);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SyncSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_custom_settings_are_valid() {
        let settings = SyncSettings {
            marker_prefix: "TODO:".to_string(),
            heading: "## Todo".to_string(),
            bullet_prefix: "* ".to_string(),
            ..SyncSettings::default()
        };
        assert_eq!(settings.validate(), Ok(()));
    }

    fn with(marker_prefix: &str, heading: &str, bullet_prefix: &str) -> SyncSettings {
        SyncSettings {
            marker_prefix: marker_prefix.to_string(),
            heading: heading.to_string(),
            bullet_prefix: bullet_prefix.to_string(),
            ..SyncSettings::default()
        }
    }

    #[rstest]
    #[case(with("", "# Action Items", "- "), SettingsError::Blank("marker_prefix"))]
    #[case(with("  ", "# Action Items", "- "), SettingsError::Blank("marker_prefix"))]
    #[case(with("//", "", "- "), SettingsError::Blank("heading"))]
    #[case(with("//", "# Action Items", ""), SettingsError::Blank("bullet_prefix"))]
    #[case(with("//", "# Action Items", " "), SettingsError::Blank("bullet_prefix"))]
    #[case(with("//", "# Action\nItems", "- "), SettingsError::MultiLine("heading"))]
    #[case(with("/\n/", "# Action Items", "- "), SettingsError::MultiLine("marker_prefix"))]
    fn test_validate_rejects_malformed_fields(
        #[case] settings: SyncSettings,
        #[case] expected: SettingsError,
    ) {
        assert_eq!(settings.validate(), Err(expected));
    }

    #[rstest]
    #[case("#")]
    #[case("# Action")]
    fn test_validate_rejects_marker_matching_heading(#[case] prefix: &str) {
        let result = with(prefix, "# Action Items", "- ").validate();
        assert!(matches!(result, Err(SettingsError::MarkerMatchesHeading { .. })));
    }

    #[rstest]
    #[case("-", "- ")]
    #[case("- ", "- ")]
    #[case("-", "  - ")]
    #[case("* x", "*")]
    fn test_validate_rejects_marker_matching_bullets(#[case] prefix: &str, #[case] bullet: &str) {
        let result = with(prefix, "# Action Items", bullet).validate();
        assert!(matches!(result, Err(SettingsError::MarkerMatchesBullet { .. })));
    }
}
