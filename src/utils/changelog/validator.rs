// changelog validator

use super::classifier::UNRELEASED;
use super::config::ValidationOptions;
use super::types::{ChangeType, Changelog, Version};
use crate::utils::issue::{IssueType, ValidationError, ValidationIssue};
use std::cmp::Ordering;
use tracing::{debug, info};

/// version that `Unreleased` stands in for when ordering versions
pub const UNRELEASED_SORT_VERSION: &str = "99.99.99";

/// check a changelog against the rules enabled in `options`
///
/// every version is checked even after problems are found; the error carries
/// all of them
pub fn validate_changelog(
    changelog: &Changelog,
    options: &ValidationOptions,
) -> std::result::Result<(), ValidationError> {
    let mut err = ValidationError::new();
    for issue in check_changelog(changelog, options) {
        err.push_issue(issue);
    }
    info!(
        versions = changelog.versions.len(),
        issues = err.issues.len(),
        "validated changelog"
    );

    if err.has_issues() { Err(err) } else { Ok(()) }
}

/// collect every issue in a changelog
pub fn check_changelog(changelog: &Changelog, options: &ValidationOptions) -> Vec<ValidationIssue> {
    if changelog.versions.is_empty() {
        return vec![ValidationIssue::new(
            IssueType::EmptyChangelog,
            "",
            "",
            "no versions found in the changelog",
        )];
    }

    let mut issues = Vec::new();
    let mut previous: Option<&Version> = None;

    for version in &changelog.versions {
        check_version(version, options, &mut issues);

        if let Some(previous) = previous
            && compare_versions(&previous.version, &version.version) != Ordering::Greater
        {
            issues.push(ValidationIssue::new(
                IssueType::VersionOrder,
                &version.version,
                "",
                "version is not in the right order",
            ));
        }

        previous = Some(version);
    }

    issues
}

fn check_version(version: &Version, options: &ValidationOptions, issues: &mut Vec<ValidationIssue>) {
    let name = version.version.as_str();
    let unreleased = version.is_unreleased();
    debug!(version = name, "checking version");

    if !unreleased && !is_valid_semver(name) {
        issues.push(ValidationIssue::new(
            IssueType::InvalidVersion,
            name,
            "",
            "invalid version",
        ));
    }

    if !unreleased && version.release_date.is_none() && !options.allow_missing_release_date {
        issues.push(ValidationIssue::new(
            IssueType::MissingReleaseDate,
            name,
            "",
            "missing release date in changelog entry",
        ));
    }

    if !unreleased && version.entries.is_empty() && !options.allow_empty_version {
        issues.push(ValidationIssue::new(
            IssueType::EmptyVersion,
            name,
            "",
            "no sections found in changelog entry",
        ));
    }

    let sections = version.sections();

    if !options.allow_invalid_change_type {
        for section in sections
            .iter()
            .filter(|s| ChangeType::from_name(s).is_none())
        {
            issues.push(ValidationIssue::new(
                IssueType::InvalidChangeType,
                name,
                section,
                format!(
                    "invalid section `{}` in changelog entry (available values: [{}])",
                    section,
                    ChangeType::names().join(" ")
                ),
            ));
        }
    }

    if !options.allow_invalid_change_type_order {
        for pair in sections.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if ChangeType::weight_of(prev) > ChangeType::weight_of(current) {
                issues.push(ValidationIssue::new(
                    IssueType::ChangeTypeOrder,
                    name,
                    current,
                    format!(
                        "unsorted change type in changelog entry ({} > {})",
                        current, prev
                    ),
                ));
            }
        }
    }
}

/// check a version string against the semantic versioning grammar
pub fn is_valid_semver(version: &str) -> bool {
    semver::Version::parse(version).is_ok()
}

// partial versions such as `1.2` are read as `1.2.0`
fn precedence_key(version: &str) -> Option<semver::Version> {
    let version = if version == UNRELEASED {
        UNRELEASED_SORT_VERSION
    } else {
        version
    };

    if let Ok(parsed) = semver::Version::parse(version) {
        return Some(parsed);
    }

    let parts = version
        .split('.')
        .map(|p| {
            if p.len() > 1 && p.starts_with('0') {
                None
            } else {
                p.parse::<u64>().ok()
            }
        })
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [major] => Some(semver::Version::new(*major, 0, 0)),
        [major, minor] => Some(semver::Version::new(*major, *minor, 0)),
        _ => None,
    }
}

/// compare two version strings by semantic-version precedence
///
/// `Unreleased` ranks above every concrete version; strings that are not
/// versions rank below every valid version and equal to each other
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (precedence_key(a), precedence_key(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
