//! Season page parser for TheTVDB
//!
//! Parses the episode table of a season page into an index of episode
//! number to episode and translate URLs.

use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::error::{Result, TvdbError};
use crate::types::{EpisodeIndex, EpisodeLinks};

use super::selector;

/// Parse the episode list from a season page.
///
/// The first row of the `div#episodes` table is a header and is skipped.
/// A page without the episodes container is an empty season.
///
/// # Arguments
/// * `html` - Raw HTML content of the season page
/// * `base_url` - Site root that relative episode links are joined onto
/// * `language_code` - Language whose translate URL should be derived
///
/// # Returns
/// * `Ok(EpisodeIndex)` with one entry per episode row
/// * `Err(TvdbError::MalformedEpisodeRow)` if a row lacks cells or a link
pub fn parse_episode_list(html: &str, base_url: &str, language_code: &str) -> Result<EpisodeIndex> {
    let document = Html::parse_document(html);
    let mut index = EpisodeIndex::new();

    let container_selector = selector("div#episodes")?;
    let Some(container) = document.select(&container_selector).next() else {
        return Ok(index);
    };

    let base = Url::parse(base_url).map_err(|e| TvdbError::InvalidUrl(format!("{base_url}: {e}")))?;
    let row_selector = selector("tr")?;

    for (position, row) in container.select(&row_selector).enumerate().skip(1) {
        let (number, links) = parse_episode_row(&row, position, &base, language_code)?;
        index.insert(number, links);
    }

    Ok(index)
}

/// Parse one `tr` of the episode table.
fn parse_episode_row(
    row: &ElementRef,
    position: usize,
    base: &Url,
    language_code: &str,
) -> Result<(String, EpisodeLinks)> {
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
    let [number_cell, link_cell, ..] = cells.as_slice() else {
        return Err(malformed(position, "expected at least two cells"));
    };

    let code = number_cell.text().collect::<String>();
    let number = episode_key(&code)
        .ok_or_else(|| malformed(position, &format!("no episode number in `{}`", code.trim())))?;

    let href = link_cell
        .select(&link_selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| malformed(position, "episode link is missing"))?;

    let url = base
        .join(href.trim())
        .map_err(|e| TvdbError::InvalidUrl(format!("{href}: {e}")))?
        .to_string();
    let translate_url = format!(
        "{}/translate/{}/0/single",
        url.trim_end_matches('/'),
        language_code
    );

    Ok((number, EpisodeLinks { url, translate_url }))
}

/// Turn an episode code cell such as `S01E05` into the index key `5`.
///
/// The text after the first `E` is taken with leading zeros stripped.
///
/// # Examples
/// ```
/// use tvdb_core::parser::episode_key;
///
/// assert_eq!(episode_key("S01E05").as_deref(), Some("5"));
/// assert_eq!(episode_key(" S02E10 ").as_deref(), Some("10"));
/// assert_eq!(episode_key("Special"), None);
/// ```
pub fn episode_key(code: &str) -> Option<String> {
    let segment = code.trim().split('E').nth(1)?;
    Some(segment.trim().trim_start_matches('0').to_string())
}

fn malformed(position: usize, reason: &str) -> TvdbError {
    TvdbError::MalformedEpisodeRow(format!("row {position}: {reason}"))
}
