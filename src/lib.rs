pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    ChangeType, Changelog, ChangelogLinter, Entry, LineKind, ParseMode, UNRELEASED,
    ValidationOptions, Version, VersionHeader, check_changelog, classify, compare_versions,
    is_valid_semver, lint_changelog, lint_reader, parse_changelog, parse_file_with_mode,
    parse_reader, parse_with_mode, render_markdown, validate_changelog,
};
pub use utils::config::{CONFIG_FILE_NAME, LintConfig};
pub use utils::issue::{IssueType, ValidationError, ValidationIssue};
pub use utils::ordered_map::OrderedMap;
