//! HTML parsers for TheTVDB pages
//!
//! This module contains parsers for extracting data from TheTVDB HTML pages:
//! - `login`: Extract the anti-forgery token from the login page
//! - `episodes`: Parse a season page into an episode index
//! - `translate`: Rebuild the translate form of an episode page

pub mod episodes;
pub mod login;
pub mod translate;

use scraper::Selector;

use crate::error::{Result, TvdbError};

// Re-export main parsing functions
pub use episodes::{episode_key, parse_episode_list};
pub use login::extract_login_token;
pub use translate::{build_translate_form, DESCRIPTION_FIELD, TITLE_FIELD};

/// Parse a CSS selector, mapping failures into `TvdbError::ParseError`.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TvdbError::ParseError(format!("selector `{css}`: {e:?}")))
}
