// changelog entry points over files and streams

use super::linter::{ParseMode, lint_lines};
use super::types::Changelog;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// parse a changelog from any reader using the given mode
pub fn parse_with_mode<R: Read>(reader: R, mode: ParseMode) -> Result<Changelog> {
    lint_lines(BufReader::new(reader), mode)
}

/// parse a changelog stream, rejecting anything off-grammar
pub fn parse_reader<R: Read>(reader: R) -> Result<Changelog> {
    parse_with_mode(reader, ParseMode::Strict)
}

/// parse a changelog stream, recovering from malformed lines where possible
pub fn lint_reader<R: Read>(reader: R) -> Result<Changelog> {
    parse_with_mode(reader, ParseMode::Lint)
}

/// parse a changelog file with the given mode
///
/// the file handle is dropped on every return path
pub fn parse_file_with_mode<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Changelog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let changelog = parse_with_mode(file, mode)?;
    info!(
        path = %path.display(),
        ?mode,
        versions = changelog.versions.len(),
        "parsed changelog"
    );
    Ok(changelog)
}

/// parse a changelog file strictly
pub fn parse_changelog<P: AsRef<Path>>(path: P) -> Result<Changelog> {
    parse_file_with_mode(path, ParseMode::Strict)
}

/// parse a changelog file, recovering from malformed lines where possible
pub fn lint_changelog<P: AsRef<Path>>(path: P) -> Result<Changelog> {
    parse_file_with_mode(path, ParseMode::Lint)
}
