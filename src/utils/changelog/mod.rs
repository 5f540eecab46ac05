// keep-a-changelog parsing, rendering and validation

pub mod classifier;
pub mod config;
pub mod linter;
pub mod parser;
pub mod render;
pub mod types;
pub mod validator;

pub use classifier::{LineKind, UNRELEASED, VersionHeader, classify};
pub use config::ValidationOptions;
pub use linter::{ChangelogLinter, ParseMode};
pub use parser::{
    lint_changelog, lint_reader, parse_changelog, parse_file_with_mode, parse_reader,
    parse_with_mode,
};
pub use render::render_markdown;
pub use types::{ChangeType, Changelog, Entry, Version};
pub use validator::{check_changelog, compare_versions, is_valid_semver, validate_changelog};
