//! Team Builder core
//!
//! Platform-agnostic roster loading, portrait matching, filtering, selection and
//! team codes. Nothing in this crate touches the filesystem; data arrives through
//! a [`DataSource`] implementation supplied by the caller.

pub mod character;
pub mod constants;
pub mod filter;
pub mod groups;
pub mod normalize;
pub mod numbers;
pub mod portrait;
pub mod roster;
pub mod selection;
pub mod sheet;
pub mod team;
pub mod team_code;

// Re-export commonly used types
pub use character::{
    Character, CharacterType, GroupList, Stat, StatBlock, StatColor, StatIcon, StatKind,
};
pub use filter::{FilterCriteria, ParseSortError, SortKey, SortOrder, apply_filters};
pub use groups::{GroupCatalog, GroupEntry, display_name as group_display_name, group_icon};
pub use normalize::{derive_id, normalize_row, parse_groups, parse_stat_value};
pub use portrait::{
    FallbackReason, MatchRule, PortraitConfig, PortraitConfigError, PortraitQuery,
    PortraitResolver, Preference, Resolution,
};
pub use roster::{Facets, GroupFacet, Roster};
pub use selection::{SelectionSet, SelectorSession, TeamCodeOutcome, partition_ids};
pub use sheet::{CharacterRow, SheetError, SheetFormat, parse_rows};
pub use team::{StatTotals, TeamSummary};
pub use team_code::{TeamCodeError, decode as decode_team_code, encode as encode_team_code};

/// Trait for abstracting roster data access
/// Platform-specific implementations should provide this
pub trait DataSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load raw character rows
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be read or parsed.
    fn load_rows(&self) -> Result<Vec<CharacterRow>, Self::Error>;

    /// List the filenames available as portraits
    ///
    /// # Errors
    ///
    /// Returns an error if the portrait listing cannot be read.
    fn list_portraits(&self) -> Result<Vec<String>, Self::Error>;
}

/// In-memory data source, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub rows: Vec<CharacterRow>,
    pub portraits: Vec<String>,
}

impl MemorySource {
    #[must_use]
    pub const fn new(rows: Vec<CharacterRow>, portraits: Vec<String>) -> Self {
        Self { rows, portraits }
    }
}

impl DataSource for MemorySource {
    type Error = std::convert::Infallible;

    fn load_rows(&self) -> Result<Vec<CharacterRow>, Self::Error> {
        Ok(self.rows.clone())
    }

    fn list_portraits(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.portraits.clone())
    }
}

/// Builds a [`Roster`] from a data source and a portrait configuration
pub struct RosterLoader<S>
where
    S: DataSource,
{
    source: S,
    config: PortraitConfig,
}

impl<S> RosterLoader<S>
where
    S: DataSource,
{
    /// Create a loader with the default portrait configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, PortraitConfig::default())
    }

    pub const fn with_config(source: S, config: PortraitConfig) -> Self {
        Self { source, config }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Build a resolver over the source's portrait listing.
    /// An unreadable listing degrades to an empty one.
    pub fn resolver(&self) -> PortraitResolver {
        let files = self.source.list_portraits().unwrap_or_else(|err| {
            log::warn!("portrait listing unavailable, every portrait will fall back: {err}");
            Vec::new()
        });
        PortraitResolver::new(self.config.clone(), files)
    }

    /// Load and normalize every row.
    ///
    /// Never fails: an unreadable source yields an empty roster and an error log.
    pub fn load(&self) -> Roster {
        self.try_load().unwrap_or_else(|err| {
            log::error!("failed to load roster rows: {err}");
            Roster::empty()
        })
    }

    /// Like [`Self::load`] but surfaces a row-source error to the caller.
    ///
    /// # Errors
    ///
    /// Returns the source error if rows cannot be loaded.
    pub fn try_load(&self) -> Result<Roster, S::Error> {
        let rows = self.source.load_rows()?;
        let resolver = self.resolver();
        let characters: Vec<Character> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| normalize_row(row, index, &resolver))
            .collect();
        let fallbacks = characters
            .iter()
            .filter(|c| c.image_url == resolver.config().fallback_image)
            .count();
        log::info!(
            "loaded {} characters ({} portraits indexed, {fallbacks} on the fallback image)",
            characters.len(),
            resolver.len()
        );
        Ok(Roster::new(characters))
    }
}
