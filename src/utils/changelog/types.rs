// changelog data structures

use super::classifier::UNRELEASED;
use crate::utils::ordered_map::OrderedMap;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// weight given to section names outside the standard taxonomy
pub const UNKNOWN_CHANGE_TYPE_WEIGHT: u32 = 999;

/// standard keep-a-changelog change types, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl ChangeType {
    pub const ALL: [ChangeType; 6] = [
        ChangeType::Added,
        ChangeType::Changed,
        ChangeType::Deprecated,
        ChangeType::Removed,
        ChangeType::Fixed,
        ChangeType::Security,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChangeType::Added => "Added",
            ChangeType::Changed => "Changed",
            ChangeType::Deprecated => "Deprecated",
            ChangeType::Removed => "Removed",
            ChangeType::Fixed => "Fixed",
            ChangeType::Security => "Security",
        }
    }

    pub fn weight(self) -> u32 {
        self as u32
    }

    /// exact, case-sensitive lookup of a section name
    pub fn from_name(name: &str) -> Option<ChangeType> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// map common non-standard spellings onto a standard type
    pub fn from_alias(name: &str) -> Option<ChangeType> {
        match name.to_lowercase().as_str() {
            "fix" => Some(ChangeType::Fixed),
            "change" => Some(ChangeType::Changed),
            "new" => Some(ChangeType::Added),
            _ => None,
        }
    }

    /// weight of an arbitrary section name, unknown names sort last
    pub fn weight_of(name: &str) -> u32 {
        Self::from_name(name)
            .map(ChangeType::weight)
            .unwrap_or(UNKNOWN_CHANGE_TYPE_WEIGHT)
    }

    /// names of the standard types, in canonical order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.name()).collect()
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// represents a single changelog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub description: String,
}

impl Entry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// represents a version section in the changelog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    pub release_date: Option<NaiveDate>,
    pub entries: OrderedMap<String, Vec<Entry>>,
}

impl Version {
    pub fn new(version: impl Into<String>, release_date: Option<NaiveDate>) -> Self {
        Self {
            version: version.into(),
            release_date,
            entries: OrderedMap::new(),
        }
    }

    /// placeholder used by the parser before a header has been read
    pub(crate) fn empty() -> Self {
        Self::new(String::new(), None)
    }

    pub fn is_unreleased(&self) -> bool {
        self.version == UNRELEASED
    }

    pub fn set_entries(&self, section: impl Into<String>, entries: Vec<Entry>) {
        self.entries.set(section.into(), entries);
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.entries.has(&section.to_string())
    }

    pub fn section_entries(&self, section: &str) -> Option<Vec<Entry>> {
        self.entries.get(&section.to_string())
    }

    /// create the section if missing, keeping existing entries
    pub fn ensure_section(&self, section: &str) {
        if !self.has_section(section) {
            self.set_entries(section, Vec::new());
        }
    }

    pub fn push_entry(&self, section: &str, entry: Entry) {
        self.entries
            .update(section.to_string(), |entries| entries.push(entry));
    }

    /// section names in the order they appeared in the document
    pub fn sections(&self) -> Vec<String> {
        self.entries.keys()
    }
}

/// represents a complete changelog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    /// written as an empty string when the document has no title
    #[serde(
        default,
        serialize_with = "serialize_title",
        deserialize_with = "deserialize_title"
    )]
    pub title: Option<String>,
    pub versions: Vec<Version>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_version(&mut self, version: Version) {
        self.versions.push(version);
    }
}

fn serialize_title<S: Serializer>(title: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(title.as_deref().unwrap_or_default())
}

fn deserialize_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let title = Option::<String>::deserialize(deserializer)?;
    Ok(title.filter(|t| !t.is_empty()))
}
