//! Heuristic matching used when no exact pattern exists, plus candidate ranking.

use serde::{Deserialize, Serialize};

use super::PortraitFile;
use super::name::{NameParts, contains_in_order, contains_token, significant_words, words};
use crate::character::CharacterType;
use crate::constants::{CLASSIC_KEYWORD, VILLAIN_TOKEN};

/// Why resolution ended on the fallback image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    /// A special-case entry matched but none of its files exist.
    SpecialCaseMissing,
    /// No file carries the name's words.
    NoNameMatch,
    /// Name matches exist but none agree on variant presence.
    NoVariantMatch,
    /// Name matches exist but none agree on the `classic` keyword.
    NoClassicMatch,
    /// Name matches exist but none agree on the villain suffix.
    NoVillainMatch,
}

impl FallbackReason {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::SpecialCaseMissing => "special-case files missing",
            Self::NoNameMatch => "no file carries the name",
            Self::NoVariantMatch => "no file agrees on variant",
            Self::NoClassicMatch => "no file agrees on classic keyword",
            Self::NoVillainMatch => "no file agrees on villain suffix",
        }
    }
}

/// Which preference picked a candidate out of several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preference {
    SetNumber,
    Variant,
    Numbered,
    First,
}

fn squash(folded: &str) -> String {
    folded
        .chars()
        .filter(|c| !matches!(c, '_' | '(' | ')'))
        .collect()
}

fn carries_name(file: &PortraitFile, name_words: &[&str], squashed_base: &str) -> bool {
    let file_words = words(&file.stem);
    let significant = significant_words(name_words);
    let word_match = !name_words.is_empty()
        && file_words.first() == name_words.first()
        && contains_in_order(&file_words, &significant);
    let squashed_match = name_words.len() > 1 && squash(&file.stem).starts_with(squashed_base);
    word_match || squashed_match
}

fn has_word(file: &PortraitFile, word: &str) -> bool {
    words(&file.stem).contains(&word)
}

/// Narrow the full listing down to files that plausibly show this character.
///
/// # Errors
///
/// Returns the stage that emptied the candidate list.
pub fn filter_candidates<'a>(
    files: &'a [PortraitFile],
    parts: &NameParts,
    kind: CharacterType,
) -> Result<Vec<&'a PortraitFile>, FallbackReason> {
    let base = parts.base_token();
    let name_words = words(&base);
    let squashed_base = squash(&base);

    let named: Vec<&PortraitFile> = files
        .iter()
        .filter(|file| carries_name(file, &name_words, &squashed_base))
        .collect();
    if named.is_empty() {
        return Err(FallbackReason::NoNameMatch);
    }

    let variant_matched: Vec<&PortraitFile> = match parts.variant_token() {
        None => named
            .into_iter()
            .filter(|file| !file.stem.contains('('))
            .collect(),
        Some(variant) => {
            let tokened: Vec<&PortraitFile> = named
                .iter()
                .copied()
                .filter(|file| contains_token(&file.stem, &variant))
                .collect();
            if tokened.is_empty() {
                named
                    .into_iter()
                    .filter(|file| file.stem.contains('('))
                    .collect()
            } else {
                tokened
            }
        }
    };
    if variant_matched.is_empty() {
        return Err(FallbackReason::NoVariantMatch);
    }

    let wants_classic = parts.wants_classic();
    let classic_matched: Vec<&PortraitFile> = variant_matched
        .into_iter()
        .filter(|file| has_word(file, CLASSIC_KEYWORD) == wants_classic)
        .collect();
    if classic_matched.is_empty() {
        return Err(FallbackReason::NoClassicMatch);
    }

    let villains: Vec<&PortraitFile> = classic_matched
        .iter()
        .copied()
        .filter(|file| has_word(file, VILLAIN_TOKEN))
        .collect();
    let side_matched = if kind.is_dual_mode() {
        if villains.is_empty() {
            classic_matched
        } else {
            villains
        }
    } else {
        classic_matched
            .into_iter()
            .filter(|file| !has_word(file, VILLAIN_TOKEN))
            .collect()
    };
    if side_matched.is_empty() {
        return Err(FallbackReason::NoVillainMatch);
    }
    Ok(side_matched)
}

/// Rank candidates: set qualifier, then variant token, then any digit, then first.
#[must_use]
pub fn pick<'a>(
    candidates: &[&'a PortraitFile],
    set_number: Option<&str>,
    variant: Option<&str>,
) -> Option<(&'a PortraitFile, Preference)> {
    if let Some(number) = set_number
        && let Some(file) = candidates
            .iter()
            .copied()
            .find(|f| contains_token(&f.stem, number))
    {
        return Some((file, Preference::SetNumber));
    }
    if let Some(variant) = variant
        && let Some(file) = candidates
            .iter()
            .copied()
            .find(|f| contains_token(&f.stem, variant))
    {
        return Some((file, Preference::Variant));
    }
    if let Some(file) = candidates
        .iter()
        .copied()
        .find(|f| f.stem.chars().any(|c| c.is_ascii_digit()))
    {
        return Some((file, Preference::Numbered));
    }
    candidates.first().map(|file| (*file, Preference::First))
}
