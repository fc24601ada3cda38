//! Main translation API
//!
//! This module combines the authenticated session with the parsers to push
//! a table of episode translations onto TheTVDB, one episode at a time.

use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::client::TvdbSession;
use crate::error::{Result, TvdbError};
use crate::parser::{build_translate_form, parse_episode_list};
use crate::types::{EpisodeIndex, EpisodeLinks, EpisodeOutcome, SeasonUrl, TranslationEntry};

/// Per-episode results of a translation run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Episode number and what happened to it
    pub outcomes: Vec<(String, EpisodeOutcome)>,
}

impl RunSummary {
    /// Number of episodes that were updated
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .count()
    }

    /// Number of entries that were processed but not updated
    pub fn not_updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success() && *outcome != EpisodeOutcome::NotInSeason)
            .count()
    }

    /// Number of entries whose episode is not in the season
    pub fn not_in_season(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == EpisodeOutcome::NotInSeason)
            .count()
    }

    /// Outcome recorded for an episode number
    pub fn outcome(&self, episode_number: &str) -> Option<&EpisodeOutcome> {
        self.outcomes
            .iter()
            .find(|(number, _)| number == episode_number)
            .map(|(_, outcome)| outcome)
    }
}

/// Sequential translation driver
///
/// # Example
/// ```no_run
/// use tvdb_core::{CredentialStore, SeasonUrl, Translator, TvdbSession};
///
/// # async fn example() -> Result<(), tvdb_core::TvdbError> {
/// let store = CredentialStore::new("config/account.json");
/// let credentials = store.load()?.into_credentials(store.path())?;
/// let session = TvdbSession::new(store, credentials)?;
///
/// let season = SeasonUrl::parse(
///     "https://www.thetvdb.com/series/dark/seasons/official/1",
///     "https://www.thetvdb.com",
/// )?;
/// let entries = tvdb_core::load_translations(std::path::Path::new("episodes_titles.json"))?;
///
/// let mut translator = Translator::new(session, "deu");
/// let summary = translator.run(&season, &entries).await?;
/// println!("{} episodes updated", summary.updated());
/// # Ok(())
/// # }
/// ```
pub struct Translator {
    session: TvdbSession,
    language_code: String,
}

impl Translator {
    /// Create a driver that submits translations for `language_code`.
    pub fn new(session: TvdbSession, language_code: impl Into<String>) -> Self {
        Self {
            session,
            language_code: language_code.into(),
        }
    }

    /// Language code translations are submitted for
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Borrow the underlying session
    pub fn session(&self) -> &TvdbSession {
        &self.session
    }

    /// Give the session back
    pub fn into_session(self) -> TvdbSession {
        self.session
    }

    /// Fetch a season page and index its episodes.
    ///
    /// # Errors
    /// - `TvdbError::MalformedEpisodeRow` - the listing has an unexpected row
    /// - `TvdbError::SessionExpired` / `TvdbError::Http` - fetching failed
    pub async fn load_season(&mut self, season: &SeasonUrl) -> Result<EpisodeIndex> {
        let html = self.session.fetch_page(season.as_str()).await?;
        let base_url = self.session.base_url().to_string();
        parse_episode_list(&html, &base_url, &self.language_code)
    }

    /// Translate a single episode.
    ///
    /// Only a 200 answer counts as updated. A translate page without a form
    /// is skipped instead of posting an empty payload.
    ///
    /// # Errors
    /// - `TvdbError::SessionExpired` - the session could not be restored
    /// - `TvdbError::Http` - fetching or submitting failed
    pub async fn translate_episode(
        &mut self,
        links: &EpisodeLinks,
        entry: &TranslationEntry,
    ) -> Result<EpisodeOutcome> {
        let html = self.session.fetch_page(&links.translate_url).await?;
        let form = build_translate_form(&html, &entry.episode_title, &entry.description)?;
        if form.is_empty() {
            warn!(
                "No translate form found for episode {}, skipping.",
                entry.episode_number
            );
            return Ok(EpisodeOutcome::SkippedNoForm);
        }

        let response = self.session.update_episode(&form).await?;
        let status = response.status();
        if status == StatusCode::OK {
            info!("Episode {} translated successfully.", entry.episode_number);
            Ok(EpisodeOutcome::Updated)
        } else {
            warn!(
                "Episode {} was not updated, server answered {status}.",
                entry.episode_number
            );
            Ok(EpisodeOutcome::Rejected(status.as_u16()))
        }
    }

    /// Apply every entry whose episode exists in the season.
    ///
    /// Episodes are independent: an HTTP failure on one is recorded and the
    /// run moves on. A lost session or a malformed listing ends the run.
    ///
    /// # Errors
    /// Returns the first fatal error (`SessionExpired`, `MalformedEpisodeRow`, ...).
    pub async fn run(
        &mut self,
        season: &SeasonUrl,
        entries: &[TranslationEntry],
    ) -> Result<RunSummary> {
        let index = self.load_season(season).await?;
        info!("Found {} episodes in {season}.", index.len());

        let mut summary = RunSummary::default();
        for entry in entries {
            let number = entry.episode_number.trim().trim_start_matches('0');
            let Some(links) = index.get(number) else {
                debug!("Episode {} is not part of this season.", entry.episode_number);
                summary
                    .outcomes
                    .push((entry.episode_number.clone(), EpisodeOutcome::NotInSeason));
                continue;
            };

            info!("Processing episode {} ...", entry.episode_number);
            let outcome = match self.translate_episode(links, entry).await {
                Ok(outcome) => outcome,
                Err(TvdbError::Http(e)) => {
                    warn!("Episode {} failed: {e}", entry.episode_number);
                    EpisodeOutcome::Failed(e.to_string())
                }
                Err(e) => return Err(e),
            };
            summary.outcomes.push((entry.episode_number.clone(), outcome));
        }

        Ok(summary)
    }
}
