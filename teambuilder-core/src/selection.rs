//! Selection state and the selector session that ties roster, criteria and view together.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::filter::{FilterCriteria, apply_filters};
use crate::roster::Roster;
use crate::team::TeamSummary;
use crate::team_code::{self, TeamCodeError};

/// Ordered set of selected ids: insertion order, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<String>,
}

/// What applying a team code did to the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCodeOutcome {
    pub applied: Vec<String>,
    /// Decoded ids that are not in the roster.
    pub discarded: Vec<String>,
}

impl TeamCodeOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !self.applied.is_empty()
    }
}

impl SelectionSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Add the id if absent, otherwise remove it. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Returns `false` when the id was already selected.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`TeamCodeError::TooLong`] when the selection is too large to share.
    pub fn team_code(&self) -> Result<String, TeamCodeError> {
        team_code::encode(&self.ids)
    }

    /// Replace the selection with the roster ids found in `code`.
    ///
    /// The selection is untouched when decoding fails or no decoded id is in the roster.
    ///
    /// # Errors
    ///
    /// Returns the decode error; the prior selection is kept.
    pub fn apply_team_code(
        &mut self,
        roster: &Roster,
        code: &str,
    ) -> Result<TeamCodeOutcome, TeamCodeError> {
        let decoded = team_code::decode(code)?;
        let outcome = partition_ids(roster, decoded);
        if outcome.is_applied() {
            self.ids.clone_from(&outcome.applied);
        } else {
            log::info!("team code carried no roster ids; selection kept");
        }
        Ok(outcome)
    }

    /// Selected characters in selection order, skipping ids missing from the roster.
    #[must_use]
    pub fn characters<'a>(&self, roster: &'a Roster) -> Vec<&'a Character> {
        self.ids.iter().filter_map(|id| roster.get(id)).collect()
    }
}

/// Split decoded ids into roster members (deduplicated, in order) and strangers.
#[must_use]
pub fn partition_ids(roster: &Roster, ids: Vec<String>) -> TeamCodeOutcome {
    let mut applied: Vec<String> = Vec::with_capacity(ids.len());
    let mut discarded = Vec::new();
    for id in ids {
        if !roster.contains(&id) {
            discarded.push(id);
        } else if !applied.contains(&id) {
            applied.push(id);
        }
    }
    TeamCodeOutcome { applied, discarded }
}

/// One user's view of a shared roster. Every criteria change recomputes the view.
#[derive(Debug, Clone)]
pub struct SelectorSession {
    roster: Arc<Roster>,
    criteria: FilterCriteria,
    view: Vec<usize>,
    selection: SelectionSet,
}

impl SelectorSession {
    #[must_use]
    pub fn new(roster: Arc<Roster>) -> Self {
        let mut session = Self {
            roster,
            criteria: FilterCriteria::default(),
            view: Vec::new(),
            selection: SelectionSet::new(),
        };
        session.recompute();
        session
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    /// Edit the criteria in place, then recompute the view.
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) {
        edit(&mut self.criteria);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    #[must_use]
    pub fn view(&self) -> Vec<&Character> {
        self.view
            .iter()
            .filter_map(|idx| self.roster.characters().get(*idx))
            .collect()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Toggle a roster character. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.roster.contains(id) {
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn team(&self) -> Vec<&Character> {
        self.selection.characters(&self.roster)
    }

    #[must_use]
    pub fn summary(&self) -> TeamSummary {
        TeamSummary::from_characters(self.team())
    }

    /// # Errors
    ///
    /// Returns [`TeamCodeError::TooLong`] when the team is too large to share.
    pub fn team_code(&self) -> Result<String, TeamCodeError> {
        self.selection.team_code()
    }

    /// # Errors
    ///
    /// Returns the decode error; the selection is unchanged.
    pub fn apply_team_code(&mut self, code: &str) -> Result<TeamCodeOutcome, TeamCodeError> {
        self.selection.apply_team_code(&self.roster, code)
    }

    fn recompute(&mut self) {
        self.view = apply_filters(&self.roster, &self.criteria)
            .into_iter()
            .filter_map(|character| self.roster.position(&character.id))
            .collect();
        log::debug!("view recomputed: {} of {}", self.view.len(), self.roster.len());
    }
}
