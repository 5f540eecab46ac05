// line classification for keep-a-changelog documents

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// literal used for the not-yet-released bucket
pub const UNRELEASED: &str = "Unreleased";

/// prefix shared by every version header, well-formed or not
pub const VERSION_PREFIX: &str = "## ";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (.*)$").expect("invalid title pattern"));

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[([0-9][0-9A-Za-z.+\-]*)\] ?-? ?([0-9]{4}-[0-9]{2}-[0-9]{2})?$")
        .expect("invalid version pattern")
});

static UNRELEASED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## \[Unreleased\]$").expect("invalid unreleased pattern"));

// recovery patterns: brackets optional
static LOOSE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[?([0-9][0-9A-Za-z.+\-]*)\]? ?-? ?([0-9]{4}-[0-9]{2}-[0-9]{2})?$")
        .expect("invalid loose version pattern")
});

static LOOSE_UNRELEASED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[?Unreleased\]?$").expect("invalid loose unreleased pattern")
});

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^### (.*)$").expect("invalid section pattern"));

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*- (.*)$").expect("invalid entry pattern"));

/// the kind of a single changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Title(String),
    Version(VersionHeader),
    Section(String),
    Entry(String),
    Plain(String),
    Blank,
}

/// version and optional release date extracted from a `## [...]` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHeader {
    pub version: String,
    pub release_date: Option<NaiveDate>,
}

/// why a `## ` header could not be read strictly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLineError {
    /// the line does not follow `## [x.y.z] - YYYY-MM-DD` or `## [Unreleased]`
    Malformed,
    /// the line has the right shape but the date is not a calendar date
    InvalidDate(String),
}

pub fn is_title_line(line: &str) -> bool {
    TITLE_RE.is_match(line)
}

pub fn parse_title_line(line: &str) -> Option<String> {
    TITLE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn is_version_line(line: &str) -> bool {
    VERSION_RE.is_match(line) || UNRELEASED_RE.is_match(line)
}

/// strictly parse a version header
pub fn parse_version_line(line: &str) -> Result<VersionHeader, VersionLineError> {
    if UNRELEASED_RE.is_match(line) {
        return Ok(VersionHeader {
            version: UNRELEASED.to_string(),
            release_date: None,
        });
    }

    let caps = VERSION_RE
        .captures(line)
        .ok_or(VersionLineError::Malformed)?;
    let version = caps[1].to_string();
    let release_date = match caps.get(2) {
        Some(date) => Some(
            NaiveDate::parse_from_str(date.as_str(), DATE_FORMAT)
                .map_err(|_| VersionLineError::InvalidDate(date.as_str().to_string()))?,
        ),
        None => None,
    };

    Ok(VersionHeader {
        version,
        release_date,
    })
}

/// parse a version header with optional brackets
///
/// an unparseable date is dropped instead of rejecting the header
pub fn parse_loose_version_line(line: &str) -> Option<VersionHeader> {
    let caps = LOOSE_VERSION_RE.captures(line)?;
    let release_date = caps
        .get(2)
        .and_then(|date| NaiveDate::parse_from_str(date.as_str(), DATE_FORMAT).ok());

    Some(VersionHeader {
        version: caps[1].to_string(),
        release_date,
    })
}

pub fn is_loose_unreleased_line(line: &str) -> bool {
    LOOSE_UNRELEASED_RE.is_match(line)
}

pub fn is_section_line(line: &str) -> bool {
    SECTION_RE.is_match(line)
}

pub fn parse_section_line(line: &str) -> Option<String> {
    SECTION_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn is_entry_line(line: &str) -> bool {
    ENTRY_RE.is_match(line)
}

pub fn parse_entry_line(line: &str) -> Option<String> {
    ENTRY_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// classify a line, first match wins: title, version, section, entry, plain
///
/// a `## ` header that is not a valid version line classifies as plain here;
/// the linter looks at the prefix itself to decide on recovery
pub fn classify(line: &str) -> LineKind {
    if let Some(title) = parse_title_line(line) {
        return LineKind::Title(title);
    }
    if let Ok(header) = parse_version_line(line) {
        return LineKind::Version(header);
    }
    if let Some(section) = parse_section_line(line) {
        return LineKind::Section(section);
    }
    if let Some(entry) = parse_entry_line(line) {
        return LineKind::Entry(entry);
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    LineKind::Plain(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_title_line() {
        assert!(is_title_line("# 0.1.0"));
        assert!(!is_title_line("## [Unreleased]"));
        assert!(!is_title_line("test"));
        assert_eq!(parse_title_line("# Changelog  "), Some("Changelog".to_string()));
        assert_eq!(parse_title_line("## [0.1.0]"), None);
    }

    #[test]
    fn test_version_line_variants() {
        assert!(is_version_line("## [Unreleased]"));
        assert!(is_version_line("## [0.1.0]"));
        assert!(is_version_line("## [0.1.0] - 2025-10-28"));
        assert!(is_version_line("## [1.0.0-rc.1] - 2025-10-28"));
        assert!(!is_version_line("## 0.1.0 - 2025-10-28"));
        assert!(!is_version_line("## [unreleased]"));
        assert!(!is_version_line("### Added"));
    }

    #[test]
    fn test_parse_version_line() {
        let header = parse_version_line("## [1.2.3] - 2025-01-15").unwrap();
        assert_eq!(header.version, "1.2.3");
        assert_eq!(header.release_date, Some(date(2025, 1, 15)));

        let header = parse_version_line("## [Unreleased]").unwrap();
        assert_eq!(header.version, UNRELEASED);
        assert_eq!(header.release_date, None);

        let header = parse_version_line("## [0.1.0]").unwrap();
        assert_eq!(header.release_date, None);
    }

    #[test]
    fn test_parse_version_line_invalid_date() {
        assert_eq!(
            parse_version_line("## [1.0.0] - 2025-13-45"),
            Err(VersionLineError::InvalidDate("2025-13-45".to_string()))
        );
        assert_eq!(
            parse_version_line("## 1.0.0"),
            Err(VersionLineError::Malformed)
        );
    }

    #[test]
    fn test_loose_version_line() {
        let header = parse_loose_version_line("## 1.0.0 - 2025-01-15").unwrap();
        assert_eq!(header.version, "1.0.0");
        assert_eq!(header.release_date, Some(date(2025, 1, 15)));

        let header = parse_loose_version_line("## [1.0.0 2025-02-30").unwrap();
        assert_eq!(header.version, "1.0.0");
        assert_eq!(header.release_date, None);

        assert!(parse_loose_version_line("## Next release").is_none());
        assert!(is_loose_unreleased_line("## Unreleased"));
        assert!(is_loose_unreleased_line("## [Unreleased"));
        assert!(!is_loose_unreleased_line("## Upcoming"));
    }

    #[test]
    fn test_section_and_entry_lines() {
        assert_eq!(parse_section_line("### Added "), Some("Added".to_string()));
        assert_eq!(parse_section_line("#### Added"), None);
        assert_eq!(parse_entry_line("- new thing"), Some("new thing".to_string()));
        assert_eq!(parse_entry_line("  \t- nested thing "), Some("nested thing".to_string()));
        assert!(!is_entry_line("-missing space"));
        assert!(is_section_line("### fix"));
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("# Changelog"), LineKind::Title("Changelog".to_string()));
        assert!(matches!(classify("## [1.0.0]"), LineKind::Version(_)));
        assert_eq!(classify("### Fixed"), LineKind::Section("Fixed".to_string()));
        assert_eq!(classify("- a change"), LineKind::Entry("a change".to_string()));
        assert_eq!(classify("some prose"), LineKind::Plain("some prose".to_string()));
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify(""), LineKind::Blank);
    }
}
