//! Portrait resolution: map a loosely formatted character name to one image file.
//!
//! Resolution runs in priority order and the first stage that produces a file wins:
//!
//! 1. the special-case table ([`PortraitOverrides`]); a matching entry is final,
//! 2. exact filename patterns built from the folded name ([`patterns`]),
//! 3. heuristic filtering and ranking over the whole listing ([`fallback`]),
//! 4. the configured fallback image, with a logged diagnostic.
//!
//! The listing is sorted once when the resolver is built, so the outcome never
//! depends on directory enumeration order.

pub mod config;
pub mod fallback;
pub mod name;
pub mod overrides;
pub mod patterns;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::character::CharacterType;
pub use config::{PortraitConfig, PortraitConfigError};
pub use fallback::{FallbackReason, Preference};
pub use name::NameParts;
pub use overrides::{OverrideEntry, PortraitOverrides};

/// One indexed image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortraitFile {
    /// Filename exactly as listed.
    pub name: String,
    /// Folded stem, e.g. `iron_man_(civil_war)_back`.
    pub stem: String,
    /// Lower-cased extension without the dot.
    pub ext: String,
}

impl PortraitFile {
    /// Index a listed filename. Hidden files and unknown extensions are skipped.
    #[must_use]
    pub fn parse(name: &str, extensions: &[String]) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.starts_with('.') {
            return None;
        }
        let (stem, ext) = trimmed.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        if !extensions.contains(&ext) {
            return None;
        }
        let stem = name::fold(stem);
        if stem.is_empty() {
            return None;
        }
        Some(Self {
            name: trimmed.to_string(),
            stem,
            ext,
        })
    }

    #[must_use]
    pub fn folded_name(&self) -> String {
        format!("{}.{}", self.stem, self.ext)
    }
}

/// Fold a filename into the `stem.ext` form used for comparisons.
#[must_use]
pub fn fold_file_name(name: &str) -> String {
    match name.trim().rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{}", name::fold(stem), ext.to_ascii_lowercase()),
        None => name::fold(name),
    }
}

/// Sorted listing with a folded-name lookup.
#[derive(Debug, Clone, Default)]
struct PortraitIndex {
    files: Vec<PortraitFile>,
    by_folded: HashMap<String, usize>,
}

impl PortraitIndex {
    fn build<I, S>(files: I, extensions: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<PortraitFile> = files
            .into_iter()
            .filter_map(|f| PortraitFile::parse(f.as_ref(), extensions))
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files.dedup_by(|a, b| a.name == b.name);

        let mut by_folded = HashMap::with_capacity(files.len());
        for (idx, file) in files.iter().enumerate() {
            by_folded.entry(file.folded_name()).or_insert(idx);
        }
        Self { files, by_folded }
    }

    fn get(&self, folded_name: &str) -> Option<&PortraitFile> {
        self.by_folded
            .get(folded_name)
            .and_then(|idx| self.files.get(*idx))
    }
}

/// What the resolver is asked to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortraitQuery<'a> {
    pub name: &'a str,
    pub kind: CharacterType,
    pub set: Option<&'a str>,
}

impl<'a> PortraitQuery<'a> {
    #[must_use]
    pub const fn new(name: &'a str, kind: CharacterType) -> Self {
        Self {
            name,
            kind,
            set: None,
        }
    }

    #[must_use]
    pub const fn with_set(mut self, set: Option<&'a str>) -> Self {
        self.set = set;
        self
    }
}

/// Which stage produced the resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum MatchRule {
    SpecialCase { key: String, preference: Preference },
    ExactPattern { pattern: String },
    Heuristic { preference: Preference },
    Fallback { reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Matched filename, `None` when the fallback image was used.
    pub file: Option<String>,
    pub image_url: String,
    pub rule: MatchRule,
    /// Folded patterns or override files that were tried.
    pub attempted: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl Resolution {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.rule, MatchRule::Fallback { .. })
    }
}

pub struct PortraitResolver {
    config: PortraitConfig,
    extensions: Vec<String>,
    suffixes: Vec<String>,
    index: PortraitIndex,
}

impl PortraitResolver {
    pub fn new<I, S>(config: PortraitConfig, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = config.normalized_extensions();
        let suffixes = config.normalized_suffixes();
        let index = PortraitIndex::build(files, &extensions);
        Self {
            config,
            extensions,
            suffixes,
            index,
        }
    }

    pub fn with_defaults<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(PortraitConfig::default(), files)
    }

    #[must_use]
    pub const fn config(&self) -> &PortraitConfig {
        &self.config
    }

    /// Number of indexed image files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.files.is_empty()
    }

    /// Resolve one character. Never fails; a miss yields the fallback image.
    #[must_use]
    pub fn resolve(&self, query: &PortraitQuery<'_>) -> Resolution {
        let parts = NameParts::parse(query.name);
        let set_number = query.set.and_then(name::set_number);
        let variant = parts.variant_token();

        if let Some(entry) = self.config.overrides.lookup(&parts) {
            let attempted: Vec<String> = entry.files.iter().map(|f| fold_file_name(f)).collect();
            let candidates: Vec<&PortraitFile> =
                attempted.iter().filter_map(|f| self.index.get(f)).collect();
            return match fallback::pick(&candidates, set_number.as_deref(), variant.as_deref()) {
                Some((file, preference)) => self.matched(
                    file,
                    MatchRule::SpecialCase {
                        key: entry.key.clone(),
                        preference,
                    },
                    attempted,
                ),
                None => self.fallback(query.name, FallbackReason::SpecialCaseMissing, attempted),
            };
        }

        let attempted = patterns::exact_patterns(
            &parts,
            query.kind,
            set_number.as_deref(),
            &self.suffixes,
            &self.extensions,
        );
        if let Some((pattern, file)) = attempted
            .iter()
            .find_map(|p| self.index.get(p).map(|file| (p.clone(), file)))
        {
            return self.matched(file, MatchRule::ExactPattern { pattern }, attempted);
        }

        match fallback::filter_candidates(&self.index.files, &parts, query.kind) {
            Ok(candidates) => {
                match fallback::pick(&candidates, set_number.as_deref(), variant.as_deref()) {
                    Some((file, preference)) => {
                        self.matched(file, MatchRule::Heuristic { preference }, attempted)
                    }
                    None => self.fallback(query.name, FallbackReason::NoNameMatch, attempted),
                }
            }
            Err(reason) => self.fallback(query.name, reason, attempted),
        }
    }

    fn matched(&self, file: &PortraitFile, rule: MatchRule, attempted: Vec<String>) -> Resolution {
        log::debug!("portrait {} via {rule:?}", file.name);
        Resolution {
            file: Some(file.name.clone()),
            image_url: self.config.image_url(&file.name),
            rule,
            attempted,
            diagnostic: None,
        }
    }

    fn fallback(&self, name: &str, reason: FallbackReason, attempted: Vec<String>) -> Resolution {
        let diagnostic = format!(
            "no portrait for `{name}` ({}); tried [{}]",
            reason.describe(),
            attempted.join(", ")
        );
        log::warn!("{diagnostic}");
        Resolution {
            file: None,
            image_url: self.config.fallback_image.clone(),
            rule: MatchRule::Fallback { reason },
            attempted,
            diagnostic: Some(diagnostic),
        }
    }
}
