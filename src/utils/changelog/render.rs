// markdown reconstruction of a parsed changelog

use super::classifier::DATE_FORMAT;
use super::types::{ChangeType, Changelog, Entry, Version};
use std::fmt;

/// render a changelog back to keep-a-changelog markdown
///
/// standard sections are emitted in canonical order, any other section
/// follows in the order it was first seen
pub fn render_markdown(changelog: &Changelog) -> String {
    changelog.to_string()
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "# {}\n", title)?;
        }

        for version in &self.versions {
            render_version(f, version)?;
        }

        Ok(())
    }
}

fn render_version(f: &mut fmt::Formatter<'_>, version: &Version) -> fmt::Result {
    write!(f, "## [{}]", version.version)?;
    if let Some(date) = version.release_date {
        write!(f, " - {}", date.format(DATE_FORMAT))?;
    }
    f.write_str("\n\n")?;

    let sections = version.entries.entries();

    for change_type in ChangeType::ALL {
        if let Some((name, entries)) = sections.iter().find(|(name, _)| name == change_type.name())
        {
            render_section(f, name, entries)?;
        }
    }

    for (name, entries) in &sections {
        if ChangeType::from_name(name).is_none() {
            render_section(f, name, entries)?;
        }
    }

    Ok(())
}

fn render_section(f: &mut fmt::Formatter<'_>, name: &str, entries: &[Entry]) -> fmt::Result {
    writeln!(f, "### {}\n", name)?;
    for entry in entries {
        writeln!(f, "- {}", entry.description)?;
    }
    f.write_str("\n")
}
