//! Name and filename folding shared by every portrait matching stage.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{
    CLASSIC_KEYWORD, INSIGNIFICANT_WORD_LEN, KEYWORD_VARIANTS, TOKEN_SEPARATOR,
};

fn tag_regex() -> Option<&'static Regex> {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"\[[^\]]*\]").ok()).as_ref()
}

fn parenthetical_regex() -> Option<&'static Regex> {
    static PARENS: OnceLock<Option<Regex>> = OnceLock::new();
    PARENS
        .get_or_init(|| Regex::new(r"\(([^)]*)\)").ok())
        .as_ref()
}

/// Case-fold and collapse whitespace, hyphens and underscores into single `_`.
/// Parentheses survive; other punctuation is dropped.
#[must_use]
pub fn fold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = !out.is_empty();
            continue;
        }
        if !(ch.is_alphanumeric() || ch == '(' || ch == ')') {
            continue;
        }
        if pending_sep {
            out.push(TOKEN_SEPARATOR);
            pending_sep = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Drop parentheses from an already folded token.
#[must_use]
pub fn strip_parens(folded: &str) -> String {
    fold(&folded.replace(['(', ')'], " "))
}

/// Split a folded token into words, ignoring parentheses.
#[must_use]
pub fn words(folded: &str) -> Vec<&str> {
    folded
        .split([TOKEN_SEPARATOR, '(', ')'])
        .filter(|w| !w.is_empty())
        .collect()
}

/// Words long enough to identify a name. Falls back to every word when none qualify.
#[must_use]
pub fn significant_words<'a>(all: &[&'a str]) -> Vec<&'a str> {
    let significant: Vec<&str> = all
        .iter()
        .copied()
        .filter(|w| w.chars().count() > INSIGNIFICANT_WORD_LEN)
        .collect();
    if significant.is_empty() {
        all.to_vec()
    } else {
        significant
    }
}

/// True when `needle` appears in `haystack` in order (not necessarily adjacent).
#[must_use]
pub fn contains_in_order(haystack: &[&str], needle: &[&str]) -> bool {
    let mut remaining = haystack.iter();
    needle
        .iter()
        .all(|word| remaining.any(|candidate| candidate == word))
}

/// True when `token` occurs as whole words inside `folded`.
#[must_use]
pub fn contains_token(folded: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let haystack = format!("_{}_", strip_parens(folded));
    haystack.contains(&format!("_{token}_"))
}

/// First run of ASCII digits in a set label, e.g. `"Set 29"` → `"29"`.
#[must_use]
pub fn set_number(set: &str) -> Option<String> {
    let start = set.find(|c: char| c.is_ascii_digit())?;
    let digits: String = set[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    Some(digits)
}

/// A display name split into its matching parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    /// Name with tags and parentheticals removed, whitespace collapsed.
    pub base: String,
    /// Text of the first non-empty parenthetical.
    pub variant: Option<String>,
}

impl NameParts {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let untagged = match tag_regex() {
            Some(re) => re.replace_all(raw, " ").into_owned(),
            None => raw.to_string(),
        };

        let (variant, remainder) = match parenthetical_regex() {
            Some(re) => {
                let variant = re
                    .captures_iter(&untagged)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| collapse_whitespace(m.as_str()))
                    .find(|v| !v.is_empty());
                (variant, re.replace_all(&untagged, " ").into_owned())
            }
            None => (None, untagged),
        };

        Self {
            base: collapse_whitespace(&remainder),
            variant,
        }
    }

    #[must_use]
    pub fn base_token(&self) -> String {
        fold(&self.base)
    }

    #[must_use]
    pub fn variant_token(&self) -> Option<String> {
        self.variant.as_deref().map(fold).filter(|v| !v.is_empty())
    }

    /// Stem a portrait for this exact name would use: `base_(variant)` or `base`.
    #[must_use]
    pub fn primary_stem(&self) -> String {
        match self.variant_token() {
            Some(variant) => format!("{}{TOKEN_SEPARATOR}({variant})", self.base_token()),
            None => self.base_token(),
        }
    }

    /// Base and variant folded together without parentheses.
    #[must_use]
    pub fn search_key(&self) -> String {
        match self.variant_token() {
            Some(variant) => format!("{}{TOKEN_SEPARATOR}{variant}", self.base_token()),
            None => self.base_token(),
        }
    }

    /// Trailing keyword variant such as `classic` or `goggles`, in or out of parentheses.
    /// A name made of the keyword alone has none.
    #[must_use]
    pub fn keyword_variant(&self) -> Option<&'static str> {
        let key = self.search_key();
        let all = words(&key);
        let (last, rest) = all.split_last()?;
        if rest.is_empty() {
            return None;
        }
        KEYWORD_VARIANTS.iter().copied().find(|keyword| keyword == last)
    }

    /// Folded name with its keyword variant removed: `cyclops_goggles` → `cyclops`.
    #[must_use]
    pub fn keyword_stem(&self) -> Option<String> {
        let keyword = self.keyword_variant()?;
        let key = self.search_key();
        key.strip_suffix(keyword)
            .map(|stem| stem.trim_end_matches(TOKEN_SEPARATOR).to_string())
            .filter(|stem| !stem.is_empty())
    }

    /// Whether the name carries the `classic` keyword anywhere.
    #[must_use]
    pub fn wants_classic(&self) -> bool {
        words(&self.search_key()).contains(&CLASSIC_KEYWORD)
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
