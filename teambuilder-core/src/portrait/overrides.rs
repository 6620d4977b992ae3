//! Special-case table for characters whose portrait files break the naming convention.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::name::{NameParts, contains_in_order, fold, significant_words, strip_parens, words};
use crate::constants::TOKEN_SEPARATOR;

const DEFAULT_OVERRIDES: &str = include_str!("../../data/portrait_overrides.json");

/// One override: a canonical name key and the only filenames it may resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub key: String,
    pub files: Vec<String>,
}

impl OverrideEntry {
    fn folded_key(&self) -> String {
        strip_parens(&fold(&self.key))
    }

    /// Exact match, prefix match on a word boundary, or every significant key
    /// word present in order with the same leading word.
    #[must_use]
    pub fn matches(&self, parts: &NameParts) -> bool {
        let key = self.folded_key();
        if key.is_empty() {
            return false;
        }
        let name = parts.search_key();
        if name == key || name.starts_with(&format!("{key}{TOKEN_SEPARATOR}")) {
            return true;
        }

        let key_words = words(&key);
        let name_words = words(&name);
        let key_significant = significant_words(&key_words);
        let name_significant = significant_words(&name_words);
        key_significant.len() <= name_significant.len()
            && name_significant.first() == key_significant.first()
            && contains_in_order(&name_significant, &key_significant)
    }
}

/// Ordered override table. The first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PortraitOverrides(pub Vec<OverrideEntry>);

impl PortraitOverrides {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Load the override table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of `{ key, files }` entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_OVERRIDES).unwrap_or_default()
    }

    #[must_use]
    pub fn default_table() -> &'static Self {
        static TABLE: OnceLock<PortraitOverrides> = OnceLock::new();
        TABLE.get_or_init(Self::load_from_static)
    }

    #[must_use]
    pub fn lookup(&self, parts: &NameParts) -> Option<&OverrideEntry> {
        self.0.iter().find(|entry| entry.matches(parts))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OverrideEntry> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
