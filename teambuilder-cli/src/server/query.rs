//! Query-string decoding for the roster endpoints.

use teambuilder_core::{
    FilterCriteria, ParseSortError, SortKey, SortOrder, StatKind, TeamCodeError, decode_team_code,
};
use thiserror::Error;
use url::form_urlencoded;

use crate::util::split_csv;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid value `{value}` for `{key}`")]
    InvalidNumber { key: String, value: String },
    #[error(transparent)]
    Sort(#[from] ParseSortError),
    #[error(transparent)]
    TeamCode(#[from] TeamCodeError),
    #[error("expected a `team` or `ids` parameter")]
    MissingTeam,
}

fn pairs(query: Option<&str>) -> Vec<(String, String)> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

fn threshold_kind(key: &str) -> Option<StatKind> {
    key.strip_prefix("min").and_then(StatKind::parse)
}

/// Map `set`, `groups`, `min<Stat>`, `sort` and `order` onto filter criteria.
/// Unknown parameters are ignored; `set=all` means no set filter.
pub fn criteria_from_query(query: Option<&str>) -> Result<FilterCriteria, QueryError> {
    let mut criteria = FilterCriteria::default();
    for (key, value) in pairs(query) {
        match key.as_str() {
            "set" => {
                let value = value.trim();
                if !value.is_empty() && !value.eq_ignore_ascii_case("all") {
                    criteria.set = Some(value.to_string());
                }
            }
            "groups" | "group" => criteria.groups.extend(split_csv(&value)),
            "sort" => criteria.sort = value.parse::<SortKey>()?,
            "order" => criteria.order = value.parse::<SortOrder>()?,
            other => {
                if let Some(kind) = threshold_kind(other) {
                    let min = value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| QueryError::InvalidNumber {
                            key: key.clone(),
                            value: value.clone(),
                        })?;
                    criteria.set_min_stat(kind, min);
                }
            }
        }
    }
    Ok(criteria)
}

/// Ids requested by `team=<code>` or `ids=a,b`. A team code wins when both are present.
pub fn team_ids_from_query(query: Option<&str>) -> Result<Vec<String>, QueryError> {
    let pairs = pairs(query);
    let lookup = |wanted: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == wanted)
            .map(|(_, value)| value.as_str())
    };
    if let Some(code) = lookup("team") {
        // An unescaped `+` in a query string arrives as a space.
        return Ok(decode_team_code(&code.replace(' ', "+"))?);
    }
    lookup("ids").map(split_csv).ok_or(QueryError::MissingTeam)
}
