use serde::Serialize;
use std::fmt;

/// which validation rule produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// the changelog has no versions at all
    EmptyChangelog,
    /// version string is not a semantic version
    InvalidVersion,
    /// released version without a date
    MissingReleaseDate,
    /// released version without any section
    EmptyVersion,
    /// section name outside the standard taxonomy
    InvalidChangeType,
    /// versions are not newest-first
    VersionOrder,
    /// sections are not in taxonomy order
    ChangeTypeOrder,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::EmptyChangelog => write!(f, "empty_changelog"),
            IssueType::InvalidVersion => write!(f, "invalid_version"),
            IssueType::MissingReleaseDate => write!(f, "missing_release_date"),
            IssueType::EmptyVersion => write!(f, "empty_version"),
            IssueType::InvalidChangeType => write!(f, "invalid_change_type"),
            IssueType::VersionOrder => write!(f, "version_order"),
            IssueType::ChangeTypeOrder => write!(f, "change_type_order"),
        }
    }
}

/// a single problem found while validating a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// version the issue belongs to, empty when not applicable
    pub version: String,
    /// section the issue belongs to, empty when not applicable
    pub section: String,
    /// human-readable message
    pub error: String,
    /// rule that produced the issue, not part of the serialized form
    #[serde(skip)]
    pub kind: IssueType,
}

impl ValidationIssue {
    pub fn new(
        kind: IssueType,
        version: impl Into<String>,
        section: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            section: section.into(),
            error: error.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = if self.version.is_empty() {
            "n/a"
        } else {
            self.version.as_str()
        };
        let section = if self.section.is_empty() {
            "n/a"
        } else {
            self.section.as_str()
        };
        write!(
            f,
            "[version: {}, section: {}]: {}",
            version, section, self.error
        )
    }
}

/// every issue found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueType) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
