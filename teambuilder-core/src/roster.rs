//! The loaded character list: id lookup, filter facets and a content fingerprint.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::character::{Character, StatKind};
use crate::groups;

/// Immutable roster. Built once per load and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<Character>,
    by_id: HashMap<String, usize>,
    fingerprint: u64,
}

/// Values for building filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub sets: Vec<String>,
    pub groups: Vec<GroupFacet>,
    pub stat_max: BTreeMap<StatKind, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFacet {
    /// Spelling as it appears in the sheet; this is what filters match on.
    pub name: String,
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Roster {
    #[must_use]
    pub fn new(characters: Vec<Character>) -> Self {
        let mut by_id = HashMap::with_capacity(characters.len());
        for (idx, character) in characters.iter().enumerate() {
            if by_id.insert(character.id.clone(), idx).is_some() {
                log::warn!("duplicate character id {}", character.id);
            }
        }
        let fingerprint = fingerprint_of(&characters);
        Self {
            characters,
            by_id,
            fingerprint,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Character> {
        self.by_id.get(id).and_then(|idx| self.characters.get(*idx))
    }

    /// Index of the character in roster order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.characters.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// XxHash64 of the serialized characters.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Fingerprint as a quoted HTTP entity tag.
    #[must_use]
    pub fn etag(&self) -> String {
        format!("\"{:016x}\"", self.fingerprint)
    }

    #[must_use]
    pub fn facets(&self) -> Facets {
        let sets: BTreeSet<&str> = self
            .characters
            .iter()
            .filter_map(|c| c.set.as_deref())
            .collect();

        // Case-insensitive dedupe; the first spelling seen wins.
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for group in self.characters.iter().flat_map(|c| c.groups.iter()) {
            seen.entry(group.to_lowercase()).or_insert(group.as_str());
        }
        let groups = seen
            .into_values()
            .map(|name| GroupFacet {
                name: name.to_string(),
                display: groups::display_name(name),
                icon: groups::group_icon(name).map(str::to_string),
            })
            .collect();

        let stat_max = StatKind::ALL
            .into_iter()
            .map(|kind| {
                let max = self
                    .characters
                    .iter()
                    .map(|c| c.stat(kind))
                    .max()
                    .unwrap_or(0);
                (kind, max)
            })
            .collect();

        Facets {
            sets: sets.into_iter().map(str::to_string).collect(),
            groups,
            stat_max,
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Character;
    type IntoIter = std::slice::Iter<'a, Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn fingerprint_of(characters: &[Character]) -> u64 {
    let bytes = serde_json::to_vec(characters).unwrap_or_default();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterType, StatBlock};

    fn character(id: &str, set: Option<&str>, groups: &[&str], stats: StatBlock) -> Character {
        Character {
            id: id.to_string(),
            name: id.to_uppercase(),
            variant: None,
            kind: CharacterType::Hero,
            set: set.map(str::to_string),
            groups: groups.iter().map(ToString::to_string).collect(),
            image_url: String::new(),
            stats,
        }
    }

    fn sample() -> Roster {
        Roster::new(vec![
            character("storm-0", Some("Set 2"), &["xmen"], StatBlock::new(1, 2, 3, 4)),
            character("hulk-1", Some("Set 1"), &["Avengers", "X-Men"], StatBlock::new(5, 0, 7, 1)),
            character("loki-2", None, &["avengers"], StatBlock::default()),
        ])
    }

    #[test]
    fn lookup_by_id() {
        let roster = sample();
        assert_eq!(roster.len(), 3);
        assert!(roster.contains("hulk-1"));
        assert_eq!(roster.get("loki-2").map(|c| c.name.as_str()), Some("LOKI-2"));
        assert!(roster.get("thor-9").is_none());
        assert_eq!((&roster).into_iter().count(), 3);
    }

    #[test]
    fn facets_are_sorted_and_deduplicated() {
        let facets = sample().facets();
        assert_eq!(facets.sets, vec!["Set 1", "Set 2"]);
        let names: Vec<&str> = facets.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Avengers", "X-Men", "xmen"]);
        assert_eq!(facets.groups[2].display, "X-men");
        assert_eq!(facets.stat_max[&StatKind::Wild], 5);
        assert_eq!(facets.stat_max[&StatKind::Movement], 4);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.etag().len(), 18);
        let changed = Roster::new(a.characters()[..2].to_vec());
        assert_ne!(a.fingerprint(), changed.fingerprint());
        assert!(Roster::empty().facets().sets.is_empty());
    }
}
