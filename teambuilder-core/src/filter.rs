//! Filtered, sorted views over a roster.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{Character, StatKind};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    None,
    Alphabetical,
    Stat(StatKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Every active criterion must hold for a character to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Inclusive minimum per stat, indexed like [`StatKind::ALL`].
    pub min_stats: [u32; 4],
    pub set: Option<String>,
    /// Any-of match; empty means no group filter.
    pub groups: Vec<String>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl FilterCriteria {
    #[must_use]
    pub const fn min_stat(&self, kind: StatKind) -> u32 {
        self.min_stats[kind.index()]
    }

    pub const fn set_min_stat(&mut self, kind: StatKind, value: u32) {
        self.min_stats[kind.index()] = value;
    }

    #[must_use]
    pub fn with_min_stat(mut self, kind: StatKind, value: u32) -> Self {
        self.set_min_stat(kind, value);
        self
    }

    #[must_use]
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortKey, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    #[must_use]
    pub fn matches(&self, character: &Character) -> bool {
        StatKind::ALL
            .iter()
            .all(|kind| character.stat(*kind) >= self.min_stat(*kind))
            && self
                .set
                .as_deref()
                .is_none_or(|set| character.set.as_deref() == Some(set))
            && (self.groups.is_empty() || self.groups.iter().any(|g| character.in_group(g)))
    }
}

/// Apply criteria to the roster. The sort is stable, so ties keep roster order.
#[must_use]
pub fn apply_filters<'a>(roster: &'a Roster, criteria: &FilterCriteria) -> Vec<&'a Character> {
    let mut view: Vec<&Character> = roster.iter().filter(|c| criteria.matches(c)).collect();
    match criteria.sort {
        SortKey::None => {}
        SortKey::Alphabetical => view.sort_by(|a, b| {
            directed(
                a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                criteria.order,
            )
        }),
        SortKey::Stat(kind) => {
            view.sort_by(|a, b| directed(a.stat(kind).cmp(&b.stat(kind)), criteria.order));
        }
    }
    view
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Error for an unrecognised sort key or order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognised sort option `{0}`")]
pub struct ParseSortError(String);

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "alphabetical" | "alpha" | "name" => Ok(Self::Alphabetical),
            other => StatKind::parse(other)
                .map(Self::Stat)
                .ok_or_else(|| ParseSortError(s.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterType, StatBlock};

    fn character(name: &str, set: &str, groups: &[&str], stats: StatBlock) -> Character {
        Character {
            id: name.to_lowercase(),
            name: name.to_string(),
            variant: None,
            kind: CharacterType::Hero,
            set: Some(set.to_string()),
            groups: groups.iter().map(ToString::to_string).collect(),
            image_url: String::new(),
            stats,
        }
    }

    fn roster() -> Roster {
        Roster::new(vec![
            character("Storm", "Set 2", &["X-Men"], StatBlock::new(2, 3, 1, 4)),
            character("Hulk", "Set 1", &["Avengers"], StatBlock::new(1, 1, 5, 2)),
            character("beast", "Set 2", &["x-men", "Avengers"], StatBlock::new(3, 1, 2, 2)),
            character("Loki", "Set 1", &[], StatBlock::new(2, 2, 2, 2)),
        ])
    }

    fn names(view: &[&Character]) -> Vec<String> {
        view.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn empty_criteria_keep_roster_order() {
        let roster = roster();
        let view = apply_filters(&roster, &FilterCriteria::default());
        assert_eq!(names(&view), vec!["Storm", "Hulk", "beast", "Loki"]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let roster = roster();
        let criteria = FilterCriteria::default().with_min_stat(StatKind::Wild, 2);
        assert_eq!(names(&apply_filters(&roster, &criteria)), vec!["Storm", "beast", "Loki"]);
    }

    #[test]
    fn set_and_group_compose_with_and() {
        let roster = roster();
        let criteria = FilterCriteria::default()
            .with_set("Set 2")
            .with_group("avengers");
        assert_eq!(names(&apply_filters(&roster, &criteria)), vec!["beast"]);
        let criteria = FilterCriteria::default().with_group("X-MEN").with_group("Avengers");
        assert_eq!(names(&apply_filters(&roster, &criteria)), vec!["Storm", "Hulk", "beast"]);
    }

    #[test]
    fn alphabetical_sort_ignores_case() {
        let roster = roster();
        let criteria =
            FilterCriteria::default().with_sort(SortKey::Alphabetical, SortOrder::Asc);
        assert_eq!(
            names(&apply_filters(&roster, &criteria)),
            vec!["beast", "Hulk", "Loki", "Storm"]
        );
    }

    #[test]
    fn stat_sort_is_stable_in_both_directions() {
        let roster = roster();
        let asc = FilterCriteria::default()
            .with_sort(SortKey::Stat(StatKind::Movement), SortOrder::Asc);
        assert_eq!(
            names(&apply_filters(&roster, &asc)),
            vec!["Hulk", "beast", "Loki", "Storm"]
        );
        let desc = asc.with_sort(SortKey::Stat(StatKind::Movement), SortOrder::Desc);
        assert_eq!(
            names(&apply_filters(&roster, &desc)),
            vec!["Storm", "Hulk", "beast", "Loki"]
        );
    }

    #[test]
    fn sort_options_parse() {
        assert_eq!("Alphabetical".parse::<SortKey>(), Ok(SortKey::Alphabetical));
        assert_eq!("attacks".parse::<SortKey>(), Ok(SortKey::Stat(StatKind::Attack)));
        assert_eq!("".parse::<SortKey>(), Ok(SortKey::None));
        assert!("sideways".parse::<SortKey>().is_err());
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn sort_errors_name_the_rejected_option() {
        let err = "sideways".parse::<SortKey>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognised sort option `sideways`");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
