use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::character::{Character, StatKind};
use crate::numbers::average_to_tenth;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StatTotals {
    pub total: u64,
    pub count: usize,
    /// Mean rounded to one decimal; 0 for an empty team.
    pub average: f64,
}

/// Per-stat totals for an assembled team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub size: usize,
    pub stats: BTreeMap<StatKind, StatTotals>,
}

impl TeamSummary {
    #[must_use]
    pub fn from_characters<'a, I>(team: I) -> Self
    where
        I: IntoIterator<Item = &'a Character>,
    {
        let mut totals = [0_u64; 4];
        let mut size = 0_usize;
        for character in team {
            size += 1;
            for kind in StatKind::ALL {
                totals[kind.index()] += u64::from(character.stat(kind));
            }
        }
        let stats = StatKind::ALL
            .into_iter()
            .map(|kind| {
                let total = totals[kind.index()];
                (
                    kind,
                    StatTotals {
                        total,
                        count: size,
                        average: average_to_tenth(total, size),
                    },
                )
            })
            .collect();
        Self { size, stats }
    }

    #[must_use]
    pub fn get(&self, kind: StatKind) -> StatTotals {
        self.stats.get(&kind).copied().unwrap_or_default()
    }
}
