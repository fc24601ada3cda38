//! Translate page parser for TheTVDB
//!
//! Rebuilds the episode translate form from the page so hidden fields
//! (tokens, ids, language) are posted back exactly as the site rendered them.

use scraper::Html;

use crate::error::Result;
use crate::types::FormPayload;

use super::selector;

/// Form field holding the translated episode title
pub const TITLE_FIELD: &str = "episode_name";

/// Form field holding the translated episode description
pub const DESCRIPTION_FIELD: &str = "episode_overview";

/// Build the submission payload for an episode translate page.
///
/// Every named `input` and `textarea` of `form.episode-translate-form` is
/// copied in document order, then the title and description fields are
/// overwritten with the new values.
///
/// # Arguments
/// * `html` - Raw HTML content of the translate page
/// * `title` - New episode title
/// * `description` - New episode description
///
/// # Returns
/// The payload, or an empty payload if the page has no translate form.
/// Callers must not submit an empty payload.
pub fn build_translate_form(html: &str, title: &str, description: &str) -> Result<FormPayload> {
    let document = Html::parse_document(html);
    let mut form = FormPayload::new();

    let form_selector = selector("form.episode-translate-form")?;
    let Some(form_element) = document.select(&form_selector).next() else {
        return Ok(form);
    };

    let field_selector = selector("input, textarea")?;
    for field in form_element.select(&field_selector) {
        let element = field.value();
        let Some(name) = element.attr("name") else {
            continue;
        };

        let value = if element.name() == "textarea" {
            let text = field.text().collect::<String>();
            if text.is_empty() {
                element.attr("value").unwrap_or_default().to_string()
            } else {
                text
            }
        } else {
            element.attr("value").unwrap_or_default().to_string()
        };

        form.set(name, value);
    }

    form.set(TITLE_FIELD, title);
    form.set(DESCRIPTION_FIELD, description);

    Ok(form)
}
