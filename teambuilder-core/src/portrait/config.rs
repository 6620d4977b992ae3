use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::overrides::PortraitOverrides;
use crate::constants::{
    DEFAULT_FALLBACK_PORTRAIT, DEFAULT_PORTRAIT_EXTENSIONS, DEFAULT_PORTRAIT_SUFFIXES,
    DEFAULT_PORTRAIT_URL_PREFIX,
};

/// Errors raised when portrait configuration invariants are violated.
#[derive(Debug, Error)]
pub enum PortraitConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fallback image must not be empty")]
    EmptyFallback,
    #[error("at least one portrait extension is required")]
    NoExtensions,
    #[error("override #{index} has an empty key")]
    EmptyOverrideKey { index: usize },
    #[error("override `{key}` lists no files")]
    EmptyOverrideFiles { key: String },
}

/// Tunables for portrait resolution. Every field has a serde default so a
/// partial JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortraitConfig {
    #[serde(default = "PortraitConfig::default_fallback_image")]
    pub fallback_image: String,
    #[serde(default = "PortraitConfig::default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "PortraitConfig::default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "PortraitConfig::default_suffixes")]
    pub suffixes: Vec<String>,
    #[serde(default = "PortraitConfig::default_overrides")]
    pub overrides: PortraitOverrides,
}

impl PortraitConfig {
    fn default_fallback_image() -> String {
        DEFAULT_FALLBACK_PORTRAIT.to_string()
    }

    fn default_url_prefix() -> String {
        DEFAULT_PORTRAIT_URL_PREFIX.to_string()
    }

    fn default_extensions() -> Vec<String> {
        DEFAULT_PORTRAIT_EXTENSIONS
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn default_suffixes() -> Vec<String> {
        DEFAULT_PORTRAIT_SUFFIXES
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn default_overrides() -> PortraitOverrides {
        PortraitOverrides::default_table().clone()
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, PortraitConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), PortraitConfigError> {
        if self.fallback_image.trim().is_empty() {
            return Err(PortraitConfigError::EmptyFallback);
        }
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(PortraitConfigError::NoExtensions);
        }
        for (index, entry) in self.overrides.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(PortraitConfigError::EmptyOverrideKey { index });
            }
            if entry.files.is_empty() {
                return Err(PortraitConfigError::EmptyOverrideFiles {
                    key: entry.key.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn image_url(&self, file: &str) -> String {
        format!("{}{file}", self.url_prefix)
    }

    /// Lower-cased extensions without leading dots.
    pub(crate) fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Folded suffixes; the empty suffix is kept.
    pub(crate) fn normalized_suffixes(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.suffixes.len());
        for suffix in &self.suffixes {
            let folded = super::name::fold(suffix);
            let folded = if folded.is_empty() {
                folded
            } else {
                format!("_{folded}")
            };
            if !out.contains(&folded) {
                out.push(folded);
            }
        }
        out
    }
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            fallback_image: Self::default_fallback_image(),
            url_prefix: Self::default_url_prefix(),
            extensions: Self::default_extensions(),
            suffixes: Self::default_suffixes(),
            overrides: Self::default_overrides(),
        }
    }
}
