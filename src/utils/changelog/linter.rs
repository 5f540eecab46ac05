// line-oriented changelog state machine

use super::classifier::{self, LineKind, UNRELEASED, VERSION_PREFIX, VersionHeader};
use super::types::{ChangeType, Changelog, Entry, Version};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, trace, warn};

/// section used for prose found before any section header
pub const DEFAULT_SECTION: &str = "Added";

/// how forgiving the parser is with off-grammar input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// recover from malformed headers, aliased sections and stray prose
    #[default]
    Lint,
    /// reject anything outside the keep-a-changelog grammar
    Strict,
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lint" => Ok(ParseMode::Lint),
            "strict" => Ok(ParseMode::Strict),
            _ => Err(format!("invalid parse mode: {}, use 'lint' or 'strict'", s)),
        }
    }
}

/// accumulates a changelog one line at a time
///
/// the current version holds an empty version string until a header has been
/// read, and the current section is empty until a section header (or, when
/// linting, a line of prose) opens one.
#[derive(Debug)]
pub struct ChangelogLinter {
    mode: ParseMode,
    changelog: Changelog,
    current_version: Version,
    current_section: String,
    line_number: usize,
}

impl ChangelogLinter {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            changelog: Changelog::new(),
            current_version: Version::empty(),
            current_section: String::new(),
            line_number: 0,
        }
    }

    fn recovering(&self) -> bool {
        self.mode == ParseMode::Lint
    }

    /// feed the next line of the document
    pub fn process_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;

        let kind = classifier::classify(line);
        trace!(line = self.line_number, ?kind, "classified line");

        if let LineKind::Title(title) = kind {
            self.changelog.title = Some(title);
            return Ok(());
        }

        if line.starts_with(VERSION_PREFIX) {
            return self.open_version(line, kind);
        }

        match kind {
            LineKind::Section(name) => self.open_section(line, name),
            LineKind::Entry(description) => self.add_entry(line, description),
            LineKind::Plain(text) if self.recovering() => {
                self.add_prose(text);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn open_version(&mut self, line: &str, kind: LineKind) -> Result<()> {
        if !self.current_version.version.is_empty() {
            let finished = std::mem::replace(&mut self.current_version, Version::empty());
            debug!(version = %finished.version, "closing version");
            self.changelog.push_version(finished);
            self.current_section.clear();
        }

        let header = match kind {
            LineKind::Version(header) => Some(header),
            _ => self.recover_version(line)?,
        };

        let header = header.ok_or_else(|| {
            Error::parse(self.line_number, line, "invalid version line")
        })?;

        debug!(
            version = %header.version,
            release_date = ?header.release_date,
            "opening version"
        );
        self.current_version.version = header.version;
        self.current_version.release_date = header.release_date;
        Ok(())
    }

    fn recover_version(&self, line: &str) -> Result<Option<VersionHeader>> {
        if !self.recovering() {
            let reason = match classifier::parse_version_line(line) {
                Err(classifier::VersionLineError::InvalidDate(date)) => {
                    format!("invalid release date '{}'", date)
                }
                _ => "invalid version line".to_string(),
            };
            return Err(Error::parse(self.line_number, line, reason));
        }

        if let Some(header) = classifier::parse_loose_version_line(line) {
            warn!(
                line = self.line_number,
                version = %header.version,
                "recovered malformed version header"
            );
            return Ok(Some(header));
        }

        // a broken first header still gets a bucket to collect entries into
        if classifier::is_loose_unreleased_line(line) || self.changelog.versions.is_empty() {
            warn!(
                line = self.line_number,
                "treating malformed version header as {}", UNRELEASED
            );
            return Ok(Some(VersionHeader {
                version: UNRELEASED.to_string(),
                release_date: None,
            }));
        }

        Ok(None)
    }

    fn open_section(&mut self, line: &str, name: String) -> Result<()> {
        let name = if self.recovering() && ChangeType::from_name(&name).is_none() {
            match ChangeType::from_alias(&name) {
                Some(change_type) => {
                    debug!(from = %name, to = %change_type, "mapped section alias");
                    change_type.name().to_string()
                }
                None => name,
            }
        } else {
            name
        };

        if self.current_version.version.is_empty() {
            return Err(Error::parse(
                self.line_number,
                line,
                "invalid changelog section (no version found)",
            ));
        }

        self.current_version.ensure_section(&name);
        self.current_section = name;
        Ok(())
    }

    fn add_entry(&mut self, line: &str, description: String) -> Result<()> {
        let description = if self.recovering() {
            normalize_description(description)
        } else {
            description
        };

        if self.current_section.is_empty() {
            return Err(Error::parse(
                self.line_number,
                line,
                "invalid changelog entry (no section found)",
            ));
        }

        self.current_version
            .push_entry(&self.current_section, Entry::new(description));
        Ok(())
    }

    fn add_prose(&mut self, text: String) {
        if self.current_section.is_empty() {
            debug!(
                line = self.line_number,
                "prose outside a section, defaulting to {}", DEFAULT_SECTION
            );
            self.current_section = DEFAULT_SECTION.to_string();
        }

        self.current_version.ensure_section(&self.current_section);
        self.current_version
            .push_entry(&self.current_section, Entry::new(normalize_description(text)));
    }

    /// close the document and return what was collected
    pub fn finish(mut self) -> Result<Changelog> {
        // a trailing version is only kept once a section was opened in it
        if !self.current_section.is_empty() && !self.current_version.version.is_empty() {
            debug!(version = %self.current_version.version, "closing final version");
            self.changelog.push_version(self.current_version);
        }

        if self.changelog.versions.is_empty() {
            return Err(Error::NoVersions);
        }

        Ok(self.changelog)
    }
}

/// terminate a description with a period
pub fn normalize_description(description: String) -> String {
    if description.ends_with('.') {
        description
    } else {
        format!("{}.", description)
    }
}

/// run the state machine over every line of `reader`
pub fn lint_lines<R: BufRead>(reader: R, mode: ParseMode) -> Result<Changelog> {
    let mut linter = ChangelogLinter::new(mode);
    for line in reader.lines() {
        linter.process_line(&line?)?;
    }
    linter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lint(text: &str) -> Result<Changelog> {
        lint_lines(text.as_bytes(), ParseMode::Lint)
    }

    fn strict(text: &str) -> Result<Changelog> {
        lint_lines(text.as_bytes(), ParseMode::Strict)
    }

    fn descriptions(version: &Version, section: &str) -> Vec<String> {
        version
            .section_entries(section)
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.description)
            .collect()
    }

    #[test]
    fn test_single_version_gets_trailing_period() {
        let changelog = lint("## [1.0.0] - 2025-01-15\n### Added\n- Thing").unwrap();

        assert_eq!(changelog.versions.len(), 1);
        let version = &changelog.versions[0];
        assert_eq!(version.version, "1.0.0");
        assert_eq!(version.release_date, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(version.sections(), vec!["Added"]);
        assert_eq!(descriptions(version, "Added"), vec!["Thing."]);
    }

    #[test]
    fn test_unreleased_version() {
        let changelog = lint("## [Unreleased]\n### Fixed\n- Bug fixed").unwrap();
        let version = &changelog.versions[0];

        assert_eq!(version.version, "Unreleased");
        assert_eq!(version.release_date, None);
        assert_eq!(descriptions(version, "Fixed"), vec!["Bug fixed."]);
    }

    #[test]
    fn test_title_and_multiple_versions() {
        let text = "# Changelog\n\n## [Unreleased]\n### Added\n- Next.\n\n## [0.2.0] - 2024-05-01\n### Changed\n- Moved.\n### Fixed\n- Crash.\n\n## [0.1.0] - 2024-01-01\n### Added\n- First.\n";
        let changelog = lint(text).unwrap();

        assert_eq!(changelog.title.as_deref(), Some("Changelog"));
        let versions: Vec<_> = changelog.versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["Unreleased", "0.2.0", "0.1.0"]);
        assert_eq!(changelog.versions[1].sections(), vec!["Changed", "Fixed"]);
        assert_eq!(descriptions(&changelog.versions[1], "Fixed"), vec!["Crash."]);
    }

    #[test]
    fn test_last_title_wins() {
        let changelog = lint("# First\n# Second\n## [Unreleased]\n### Added\n- x").unwrap();
        assert_eq!(changelog.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_section_before_version_fails() {
        let err = lint("### Added\n- Thing").unwrap_err();
        match err {
            Error::ParseError {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 1);
                assert_eq!(line, "### Added");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entry_before_section_fails() {
        let err = lint("## [1.0.0] - 2025-01-15\n- Thing").unwrap_err();
        assert!(matches!(err, Error::ParseError { line_number: 2, .. }));
    }

    #[test]
    fn test_prose_before_section_defaults_to_added() {
        let changelog = lint("## [1.0.0] - 2025-01-15\nDid a thing\n### Fixed\n- Bug").unwrap();
        let version = &changelog.versions[0];

        assert_eq!(version.sections(), vec!["Added", "Fixed"]);
        assert_eq!(descriptions(version, "Added"), vec!["Did a thing."]);
    }

    #[test]
    fn test_prose_inside_section_joins_it() {
        let changelog = lint("## [1.0.0] - 2025-01-15\n### Fixed\n- Bug\nAnother bug.").unwrap();
        assert_eq!(
            descriptions(&changelog.versions[0], "Fixed"),
            vec!["Bug.", "Another bug."]
        );
    }

    #[test]
    fn test_indented_entries() {
        let changelog = lint("## [1.0.0] - 2025-01-15\n### Added\n  - Nested\n\t- Tabbed").unwrap();
        assert_eq!(
            descriptions(&changelog.versions[0], "Added"),
            vec!["Nested.", "Tabbed."]
        );
    }

    #[test]
    fn test_section_aliases() {
        let changelog =
            lint("## [1.0.0] - 2025-01-15\n### new\n- a\n### CHANGE\n- b\n### Fix\n- c\n### Notes\n- d")
                .unwrap();
        assert_eq!(
            changelog.versions[0].sections(),
            vec!["Added", "Changed", "Fixed", "Notes"]
        );
    }

    #[test]
    fn test_repeated_section_appends() {
        let changelog = lint("## [1.0.0] - 2025-01-15\n### Added\n- a\n### Fixed\n- b\n### Added\n- c").unwrap();
        let version = &changelog.versions[0];
        assert_eq!(version.sections(), vec!["Added", "Fixed"]);
        assert_eq!(descriptions(version, "Added"), vec!["a.", "c."]);
    }

    #[test]
    fn test_recovers_missing_brackets() {
        let changelog = lint("## [Unreleased]\n### Added\n- a\n## 1.0.0 - 2025-01-15\n### Added\n- b").unwrap();
        let version = &changelog.versions[1];
        assert_eq!(version.version, "1.0.0");
        assert_eq!(version.release_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn test_recovers_invalid_date() {
        let changelog = lint("## [1.0.0] - 2025-02-30\n### Added\n- b").unwrap();
        let version = &changelog.versions[0];
        assert_eq!(version.version, "1.0.0");
        assert_eq!(version.release_date, None);
    }

    #[test]
    fn test_malformed_first_header_becomes_unreleased() {
        let changelog = lint("## Upcoming changes\n### Added\n- a").unwrap();
        assert_eq!(changelog.versions[0].version, "Unreleased");
    }

    #[test]
    fn test_loose_unreleased_marker() {
        let changelog = lint("## [0.1.0] - 2024-01-01\n### Added\n- a\n## Unreleased\n### Added\n- b").unwrap();
        assert_eq!(changelog.versions[1].version, "Unreleased");
    }

    #[test]
    fn test_malformed_later_header_fails() {
        let err = lint("## [0.1.0] - 2024-01-01\n### Added\n- a\n## Next release\n### Added\n- b")
            .unwrap_err();
        assert!(matches!(err, Error::ParseError { line_number: 4, .. }));
    }

    #[test]
    fn test_trailing_version_without_sections_is_dropped() {
        let changelog = lint("## [1.0.0] - 2025-01-15\n### Added\n- a\n## [0.9.0] - 2024-01-01\n").unwrap();
        assert_eq!(changelog.versions.len(), 1);
    }

    #[test]
    fn test_no_versions() {
        assert!(matches!(lint("# Changelog\n\n"), Err(Error::NoVersions)));
        assert!(matches!(lint(""), Err(Error::NoVersions)));
    }

    #[test]
    fn test_strict_mode_rejects_recovery() {
        assert!(strict("## 1.0.0 - 2025-01-15\n### Added\n- a").is_err());
        assert!(strict("## [1.0.0] - 2025-02-30\n### Added\n- a").is_err());

        let changelog = strict("## [1.0.0] - 2025-01-15\n### fix\n- a\nstray prose").unwrap();
        let version = &changelog.versions[0];
        assert_eq!(version.sections(), vec!["fix"]);
        assert_eq!(descriptions(version, "fix"), vec!["a"]);
    }

    #[test]
    fn test_parse_mode_from_str() {
        assert_eq!("STRICT".parse::<ParseMode>(), Ok(ParseMode::Strict));
        assert_eq!("lint".parse::<ParseMode>(), Ok(ParseMode::Lint));
        assert!("loose".parse::<ParseMode>().is_err());
    }
}
