//! Data types for the TVDB translator
//!
//! This module contains the core data structures shared by the session,
//! the page parsers and the translation driver.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TvdbError};

/// Account details and saved session cookies from the credential file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login e-mail or user name
    #[serde(default)]
    pub username: String,
    /// Account password
    #[serde(default)]
    pub password: String,
    /// Cookie name to value, as of the last successful login
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Any other keys found in the file, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Credentials {
    /// Create credentials without any saved cookies
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Whether both username and password are filled in
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

/// URLs of a single episode, derived from the season listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLinks {
    /// Canonical episode page
    pub url: String,
    /// Translate page for the selected language
    pub translate_url: String,
}

/// Episode number (leading zeros stripped) to its URLs
pub type EpisodeIndex = BTreeMap<String, EpisodeLinks>;

/// One row of the translations file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    /// Episode number within the season, e.g. "3"
    #[serde(deserialize_with = "string_or_number")]
    pub episode_number: String,
    /// New episode title
    pub episode_title: String,
    /// New episode description
    #[serde(default)]
    pub description: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Form fields to submit, in page order
///
/// Setting a field that already exists replaces its value in place, so the
/// submitted order mirrors the order of the scraped form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Value of a field, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A validated season page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonUrl {
    url: String,
    series_id: String,
}

impl SeasonUrl {
    /// Validate a season URL of the form `<base>/series/<id>/seasons/...`.
    ///
    /// # Errors
    /// Returns `TvdbError::InvalidSeasonUrl` if the input does not match.
    ///
    /// # Examples
    /// ```
    /// use tvdb_core::SeasonUrl;
    ///
    /// let season = SeasonUrl::parse(
    ///     "https://www.thetvdb.com/series/the-expanse/seasons/official/1",
    ///     "https://www.thetvdb.com",
    /// ).unwrap();
    /// assert_eq!(season.series_id(), "the-expanse");
    /// ```
    pub fn parse(input: &str, base_url: &str) -> Result<Self> {
        let url = input.trim();
        let series_prefix = format!("{}/series/", base_url.trim_end_matches('/'));
        if !url.starts_with(&series_prefix) || !url.contains("/seasons/") {
            return Err(TvdbError::InvalidSeasonUrl(url.to_string()));
        }

        let re = regex_lite::Regex::new(r"/series/(.+?)/seasons/")
            .map_err(|e| TvdbError::InvalidSeasonUrl(e.to_string()))?;
        let series_id = re
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TvdbError::InvalidSeasonUrl(url.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            series_id,
        })
    }

    /// The full season URL
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Series slug or id between `/series/` and `/seasons/`
    pub fn series_id(&self) -> &str {
        &self.series_id
    }
}

impl fmt::Display for SeasonUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// What happened to a single translation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EpisodeOutcome {
    /// Submission answered with HTTP 200
    Updated,
    /// Submission answered with another status
    Rejected(u16),
    /// Translate page had no translate form, nothing was submitted
    SkippedNoForm,
    /// Episode number does not appear in the season listing
    NotInSeason,
    /// Fetching or submitting failed at the HTTP level
    Failed(String),
}

impl EpisodeOutcome {
    /// Whether the episode was updated
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated)
    }
}
