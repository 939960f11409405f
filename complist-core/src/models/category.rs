//! Category types.
//!
//! A [`Category`] is one of the four component kinds the platform exposes.
//! The order of [`Category::all`] is the processing order of a run and the
//! entry order of the archive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Category
// ============================================================================

/// Exportable component categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Single-form components.
    SingleForm,
    /// Multi-form setups.
    MultiForm,
    /// Data-manager records, scoped by table group.
    DataManager,
    /// Automation definitions.
    Automations,
}

impl Category {
    /// Returns all categories in processing order.
    pub fn all() -> &'static [Category] {
        &[
            Self::SingleForm,
            Self::MultiForm,
            Self::DataManager,
            Self::Automations,
        ]
    }

    /// Returns the stable identifier (config keys, CLI values, file names).
    pub fn id(&self) -> &'static str {
        match self {
            Self::SingleForm => "single_form",
            Self::MultiForm => "multi_form",
            Self::DataManager => "data_manager",
            Self::Automations => "automations",
        }
    }

    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SingleForm => "Single Form",
            Self::MultiForm => "Multi Form",
            Self::DataManager => "Data Manager",
            Self::Automations => "Automations",
        }
    }

    /// Returns the archive entry name for this category.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.id())
    }

    /// Returns the position of this category in [`Category::all`].
    pub fn to_index(self) -> usize {
        Self::all().iter().position(|&c| c == self).unwrap_or(0)
    }

    /// Parses a comma-separated selection such as `"single_form,automations"`
    /// or `"all"`.
    ///
    /// The result is deduplicated and sorted into processing order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] for any unrecognized name.
    pub fn parse_selection(input: &str) -> Result<Vec<Category>, CoreError> {
        let mut selected = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") {
                return Ok(Self::all().to_vec());
            }
            selected.push(part.parse::<Category>()?);
        }
        selected.sort();
        selected.dedup();
        Ok(selected)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "single_form" | "single" => Ok(Self::SingleForm),
            "multi_form" | "multi" => Ok(Self::MultiForm),
            "data_manager" | "dm" => Ok(Self::DataManager),
            "automations" | "automation" => Ok(Self::Automations),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_processing_order() {
        let ids: Vec<&str> = Category::all().iter().map(Category::id).collect();
        assert_eq!(ids, ["single_form", "multi_form", "data_manager", "automations"]);
        assert_eq!(Category::Automations.to_index(), 3);
    }

    #[test]
    fn test_file_names_are_unique() {
        let names: HashSet<String> = Category::all().iter().map(Category::file_name).collect();
        assert_eq!(names.len(), Category::all().len());
        assert_eq!(Category::DataManager.file_name(), "data_manager.csv");
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("single-form".parse::<Category>().unwrap(), Category::SingleForm);
        assert_eq!("DM".parse::<Category>().unwrap(), Category::DataManager);
        assert_eq!("automation".parse::<Category>().unwrap(), Category::Automations);
        assert!("reports".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_selection_sorts_and_dedups() {
        let selected = Category::parse_selection("automations, single_form,automations").unwrap();
        assert_eq!(selected, vec![Category::SingleForm, Category::Automations]);
    }

    #[test]
    fn test_parse_selection_all() {
        assert_eq!(Category::parse_selection("all").unwrap(), Category::all());
        assert!(Category::parse_selection("single_form,bogus").is_err());
    }
}
