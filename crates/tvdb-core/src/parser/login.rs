//! Login page parser
//!
//! The login form carries a one-time `_token` hidden input that has to be
//! posted back together with the credentials.

use scraper::Html;

use crate::error::{Result, TvdbError};

use super::selector;

/// Extract the `_token` value from the login page HTML.
///
/// # Errors
/// Returns `TvdbError::TokenNotFound` if the input or its value is missing.
///
/// # Examples
/// ```
/// use tvdb_core::parser::extract_login_token;
///
/// let html = r#"<form><input type="hidden" name="_token" value="t0k3n"></form>"#;
/// assert_eq!(extract_login_token(html).unwrap(), "t0k3n");
/// ```
pub fn extract_login_token(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let token_selector = selector(r#"input[name="_token"]"#)?;

    document
        .select(&token_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(TvdbError::TokenNotFound)
}
