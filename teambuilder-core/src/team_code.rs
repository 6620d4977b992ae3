//! Shareable team codes: comma-joined character ids in standard base64.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

use crate::constants::{TEAM_CODE_DELIMITER, TEAM_CODE_MAX_LEN};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TeamCodeError {
    #[error("team code is not valid base64")]
    InvalidBase64,
    #[error("team code does not decode to UTF-8 text")]
    InvalidUtf8,
    #[error("team code is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },
}

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Ids that survive an encode/decode round trip unchanged.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(TEAM_CODE_DELIMITER)
}

/// Join ids with the delimiter and base64-encode the result.
///
/// # Errors
///
/// Returns [`TeamCodeError::TooLong`] when the code would exceed the length
/// [`decode`] accepts.
pub fn encode<S: AsRef<str>>(ids: &[S]) -> Result<String, TeamCodeError> {
    let joined = ids
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&TEAM_CODE_DELIMITER.to_string());
    let code = STANDARD.encode(joined);
    if code.len() > TEAM_CODE_MAX_LEN {
        return Err(TeamCodeError::TooLong {
            len: code.len(),
            max: TEAM_CODE_MAX_LEN,
        });
    }
    Ok(code)
}

/// Decode a team code back into its ids. Empty tokens are dropped.
///
/// # Errors
///
/// Returns an error if the code is oversized, not base64, or not UTF-8.
pub fn decode(code: &str) -> Result<Vec<String>, TeamCodeError> {
    let code = code.trim();
    if code.len() > TEAM_CODE_MAX_LEN {
        return Err(TeamCodeError::TooLong {
            len: code.len(),
            max: TEAM_CODE_MAX_LEN,
        });
    }
    let bytes = LENIENT_STANDARD
        .decode(code)
        .or_else(|_| LENIENT_URL_SAFE.decode(code))
        .map_err(|_| TeamCodeError::InvalidBase64)?;
    let text = String::from_utf8(bytes).map_err(|_| TeamCodeError::InvalidUtf8)?;
    Ok(text
        .split(TEAM_CODE_DELIMITER)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_btoa() {
        assert_eq!(encode(&["a", "b"]).unwrap(), "YSxi");
        assert_eq!(encode(&["hulk-1"]).unwrap(), "aHVsay0x");
        assert_eq!(encode::<&str>(&[]).unwrap(), "");
    }

    #[test]
    fn round_trips_valid_ids() {
        let ids = vec![
            "iron-man-(civil-war)-3".to_string(),
            "spider-man-0".to_string(),
            "dr.-strange-12".to_string(),
        ];
        assert!(ids.iter().all(|id| is_valid_id(id)));
        assert_eq!(decode(&encode(&ids).unwrap()).unwrap(), ids);
    }

    #[test]
    fn length_limit_is_shared_by_encode_and_decode() {
        // 3 bytes per 4 base64 characters, so this id encodes to exactly the limit.
        let at_limit = "a".repeat(TEAM_CODE_MAX_LEN / 4 * 3);
        let code = encode(&[at_limit.as_str()]).unwrap();
        assert_eq!(code.len(), TEAM_CODE_MAX_LEN);
        assert_eq!(decode(&code).unwrap(), vec![at_limit.clone()]);

        let over = format!("{at_limit}a");
        assert_eq!(
            encode(&[over.as_str()]),
            Err(TeamCodeError::TooLong {
                len: TEAM_CODE_MAX_LEN + 4,
                max: TEAM_CODE_MAX_LEN,
            })
        );
        assert_eq!(
            decode(&format!("{code}A")),
            Err(TeamCodeError::TooLong {
                len: TEAM_CODE_MAX_LEN + 1,
                max: TEAM_CODE_MAX_LEN,
            })
        );
    }

    #[test]
    fn large_teams_either_round_trip_or_refuse_to_encode() {
        let ids: Vec<String> = (0..300)
            .map(|i| format!("spider-man-(miles-morales)-{i}"))
            .collect();
        assert!(ids.iter().all(|id| is_valid_id(id)));
        assert!(matches!(encode(&ids), Err(TeamCodeError::TooLong { .. })));

        let fits = &ids[..150];
        assert_eq!(decode(&encode(fits).unwrap()).unwrap(), fits);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let code = STANDARD.encode("a,b,,c");
        assert_eq!(decode(&code).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(decode("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn accepts_unpadded_and_url_safe_input() {
        let padded = STANDARD.encode("ab?>");
        assert!(padded.ends_with("=="));
        assert_eq!(decode(padded.trim_end_matches('=')).unwrap(), vec!["ab?>"]);
        let url_safe = padded.replace('+', "-").replace('/', "_");
        assert_eq!(decode(&format!("  {url_safe}\n")).unwrap(), vec!["ab?>"]);
    }

    #[test]
    fn garbage_fails_cleanly() {
        assert_eq!(decode("%%%not base64%%%"), Err(TeamCodeError::InvalidBase64));
        assert_eq!(decode(&STANDARD.encode([0xff_u8, 0xfe])), Err(TeamCodeError::InvalidUtf8));
        assert!(matches!(
            decode(&"A".repeat(TEAM_CODE_MAX_LEN + 4)),
            Err(TeamCodeError::TooLong { .. })
        ));
        for garbage in ["=", "a", "abc=def", "\u{1F600}", "////", "----"] {
            let _ = decode(garbage);
        }
    }

    #[test]
    fn invalid_ids_are_detected() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(" padded"));
        assert!(!is_valid_id("a,b"));
    }
}
