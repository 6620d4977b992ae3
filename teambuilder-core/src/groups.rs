//! Group label catalog: display names and icons for the known factions.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

const DEFAULT_GROUPS: &str = include_str!("../data/groups.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub display: String,
    pub icon: String,
    /// Lower-cased spellings that refer to this group.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct GroupCatalog(pub Vec<GroupEntry>);

impl GroupCatalog {
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of group entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<GroupCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self::from_json(DEFAULT_GROUPS).unwrap_or_default())
    }

    #[must_use]
    pub fn lookup(&self, group: &str) -> Option<&GroupEntry> {
        let key = group.trim().to_lowercase();
        self.0
            .iter()
            .find(|entry| entry.aliases.iter().any(|alias| *alias == key))
    }

    /// Catalog spelling, or title case for unknown groups.
    #[must_use]
    pub fn display_name(&self, group: &str) -> String {
        self.lookup(group)
            .map_or_else(|| title_case(group.trim()), |entry| entry.display.clone())
    }

    #[must_use]
    pub fn icon(&self, group: &str) -> Option<&str> {
        self.lookup(group).map(|entry| entry.icon.as_str())
    }
}

/// Display name through the embedded catalog.
#[must_use]
pub fn display_name(group: &str) -> String {
    GroupCatalog::default_catalog().display_name(group)
}

#[must_use]
pub fn group_icon(group: &str) -> Option<&'static str> {
    GroupCatalog::default_catalog().icon(group)
}

fn title_case(raw: &str) -> String {
    raw.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
