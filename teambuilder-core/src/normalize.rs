//! Raw sheet rows to canonical [`Character`] records.
//!
//! Normalization never rejects a row: missing or malformed cells coerce to
//! defaults so the roster keeps one character per row.

use crate::character::{Character, CharacterType, GroupList, StatBlock, StatKind};
use crate::constants::{
    COLUMN_GROUPS, COLUMN_NAME, COLUMN_SET, COLUMN_TYPE, GROUP_SEPARATOR, PLACEHOLDER_NAME,
    TEAM_CODE_DELIMITER,
};
use crate::numbers::clamp_i64_to_u32;
use crate::portrait::{NameParts, PortraitQuery, PortraitResolver};
use crate::sheet::CharacterRow;

/// Build one character from a sheet row. `index` is the row's position in the sheet.
#[must_use]
pub fn normalize_row(row: &CharacterRow, index: usize, resolver: &PortraitResolver) -> Character {
    let raw_name = row.get(COLUMN_NAME).unwrap_or(PLACEHOLDER_NAME);
    let name = collapse(raw_name);
    let kind = CharacterType::parse(row.get(COLUMN_TYPE));
    let set = row.get(COLUMN_SET).map(str::to_string);
    let groups = parse_groups(row.get(COLUMN_GROUPS));
    let stats = parse_stats(row);

    let resolution =
        resolver.resolve(&PortraitQuery::new(&name, kind).with_set(set.as_deref()));

    let character = Character {
        id: derive_id(&name, index),
        name: name.to_uppercase(),
        variant: NameParts::parse(&name).variant,
        kind,
        set,
        groups,
        image_url: resolution.image_url,
        stats,
    };
    log::debug!(
        "row {index}: {} ({}) -> {}",
        character.id,
        character.kind.label(),
        character.image_url
    );
    character
}

/// Lowercased name with whitespace runs hyphenated, suffixed by the row index.
/// The team-code delimiter never appears in an id.
#[must_use]
pub fn derive_id(name: &str, index: usize) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .replace(TEAM_CODE_DELIMITER, "");
    format!("{slug}-{index}")
}

/// Integer-prefix parse: `"3"`, `"3.7"` and `"3 pts"` are all 3. Anything else is 0.
#[must_use]
pub fn parse_stat_value(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() || negative {
        return 0;
    }
    clamp_i64_to_u32(digits.parse::<i64>().unwrap_or(i64::MAX))
}

/// Split a comma-separated groups cell into trimmed, non-empty labels.
#[must_use]
pub fn parse_groups(raw: Option<&str>) -> GroupList {
    raw.map(|cell| {
        cell.split(GROUP_SEPARATOR)
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_stats(row: &CharacterRow) -> StatBlock {
    let value = |kind: StatKind| parse_stat_value(row.get(kind.column()));
    StatBlock::new(
        value(StatKind::Wild),
        value(StatKind::Heroic),
        value(StatKind::Attack),
        value(StatKind::Movement),
    )
}

fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
