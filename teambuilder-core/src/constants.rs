//! Centralized column names, defaults and matching constants for roster loading.
//!
//! Values here describe the spreadsheet layout and the portrait naming
//! conventions. Anything a deployment may want to tune lives in
//! [`crate::portrait::PortraitConfig`] instead.

// Spreadsheet columns ---------------------------------------------------------
pub const COLUMN_NAME: &str = "Name";
pub const COLUMN_TYPE: &str = "Type";
pub const COLUMN_SET: &str = "Set";
pub const COLUMN_GROUPS: &str = "Groups";
pub const COLUMN_WILD: &str = "nr wild";
pub const COLUMN_HEROIC: &str = "nr heroics";
pub const COLUMN_ATTACK: &str = "nr attacks";
pub const COLUMN_MOVEMENT: &str = "nr movements";

// Row defaults ----------------------------------------------------------------
pub const PLACEHOLDER_NAME: &str = "Unknown";
pub const GROUP_SEPARATOR: char = ',';

// Team codes ------------------------------------------------------------------
pub const TEAM_CODE_DELIMITER: char = ',';
pub const TEAM_CODE_MAX_LEN: usize = 8 * 1024;

// Portrait defaults -----------------------------------------------------------
pub const DEFAULT_PORTRAIT_URL_PREFIX: &str = "/portraits/";
pub const DEFAULT_FALLBACK_PORTRAIT: &str = "/portraits/Batman_29_Back.webp";
pub const DEFAULT_PORTRAIT_EXTENSIONS: [&str; 4] = ["webp", "jpg", "jpeg", "png"];
pub const DEFAULT_PORTRAIT_SUFFIXES: [&str; 3] = ["_back", "_back_jpg", ""];

// Portrait matching -----------------------------------------------------------
pub(crate) const TOKEN_SEPARATOR: char = '_';
pub(crate) const VILLAIN_TOKEN: &str = "villain";
pub(crate) const CLASSIC_KEYWORD: &str = "classic";
/// Trailing words that mark an alternate look of a base character.
pub const KEYWORD_VARIANTS: [&str; 4] = [CLASSIC_KEYWORD, "goggles", "controlled", "punk"];
/// Words of this length or shorter do not count as significant name words.
pub(crate) const INSIGNIFICANT_WORD_LEN: usize = 2;
