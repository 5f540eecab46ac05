// validation options

use serde::{Deserialize, Serialize};

/// toggles relaxing individual validation rules, all strict by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationOptions {
    /// allow a released version without any section
    pub allow_empty_version: bool,

    /// allow a released version without a release date
    pub allow_missing_release_date: bool,

    /// allow section names outside the standard change types
    pub allow_invalid_change_type: bool,

    /// allow sections in any order within a version
    pub allow_invalid_change_type_order: bool,
}

impl ValidationOptions {
    /// create strict options
    pub fn new() -> Self {
        Self::default()
    }

    /// options with every rule relaxed
    pub fn permissive() -> Self {
        Self {
            allow_empty_version: true,
            allow_missing_release_date: true,
            allow_invalid_change_type: true,
            allow_invalid_change_type_order: true,
        }
    }

    pub fn allow_empty_version(mut self, allow: bool) -> Self {
        self.allow_empty_version = allow;
        self
    }

    pub fn allow_missing_release_date(mut self, allow: bool) -> Self {
        self.allow_missing_release_date = allow;
        self
    }

    pub fn allow_invalid_change_type(mut self, allow: bool) -> Self {
        self.allow_invalid_change_type = allow;
        self
    }

    pub fn allow_invalid_change_type_order(mut self, allow: bool) -> Self {
        self.allow_invalid_change_type_order = allow;
        self
    }

    /// relax every rule relaxed in `other` as well
    pub fn merge(self, other: ValidationOptions) -> Self {
        Self {
            allow_empty_version: self.allow_empty_version || other.allow_empty_version,
            allow_missing_release_date: self.allow_missing_release_date
                || other.allow_missing_release_date,
            allow_invalid_change_type: self.allow_invalid_change_type
                || other.allow_invalid_change_type,
            allow_invalid_change_type_order: self.allow_invalid_change_type_order
                || other.allow_invalid_change_type_order,
        }
    }
}
