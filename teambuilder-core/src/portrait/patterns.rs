//! Exact filename patterns tried before any heuristic matching.

use super::name::NameParts;
use crate::character::CharacterType;
use crate::constants::{TOKEN_SEPARATOR, VILLAIN_TOKEN};

/// Ordered, folded `stem.ext` patterns for a name.
///
/// Stem order: the primary stem (base plus variant when present), then its
/// villain form for dual-mode characters, then the same pair for the name with
/// a trailing keyword variant removed. Each stem is tried with the set
/// qualifier first, then bare, across every suffix and extension.
#[must_use]
pub fn exact_patterns(
    parts: &NameParts,
    kind: CharacterType,
    set_number: Option<&str>,
    suffixes: &[String],
    extensions: &[String],
) -> Vec<String> {
    let primary = parts.primary_stem();
    if primary.is_empty() {
        return Vec::new();
    }

    // A keyword variant falls back to the plain character's portrait.
    let mut stems = Vec::with_capacity(4);
    for stem in std::iter::once(primary).chain(parts.keyword_stem()) {
        if kind.is_dual_mode() {
            stems.push(stem.clone());
            stems.push(format!("{stem}{TOKEN_SEPARATOR}{VILLAIN_TOKEN}"));
        } else {
            stems.push(stem);
        }
    }

    let mut qualifiers = Vec::with_capacity(2);
    if let Some(number) = set_number.filter(|n| !n.is_empty()) {
        qualifiers.push(format!("{TOKEN_SEPARATOR}{number}"));
    }
    qualifiers.push(String::new());

    let mut patterns = Vec::with_capacity(stems.len() * qualifiers.len() * suffixes.len() * extensions.len());
    for stem in &stems {
        for qualifier in &qualifiers {
            for suffix in suffixes {
                for ext in extensions {
                    let pattern = format!("{stem}{qualifier}{suffix}.{ext}");
                    if !patterns.contains(&pattern) {
                        patterns.push(pattern);
                    }
                }
            }
        }
    }
    patterns
}
