//! Interactive prompts
//!
//! Values given on the command line are used when valid; otherwise the user
//! is asked until the input passes validation.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use dialoguer::Input;
use tracing::{info, warn};
use tvdb_core::{Languages, SeasonUrl};

/// Season URL from `preset` or from the terminal
pub fn season_url(preset: Option<&str>, base_url: &str) -> Result<SeasonUrl> {
    if let Some(input) = preset {
        match SeasonUrl::parse(input, base_url) {
            Ok(season) => return Ok(season),
            Err(e) => warn!("{e}"),
        }
    }

    let input: String = Input::new()
        .with_prompt("Enter season URL")
        .validate_with(|input: &String| -> Result<(), String> {
            SeasonUrl::parse(input, base_url)
                .map(|_| ())
                .map_err(|_| "Invalid season URL format. Please try again.".to_string())
        })
        .interact_text()?;

    Ok(SeasonUrl::parse(&input, base_url)?)
}

/// Language code from `preset` or from the terminal
pub fn language_code(preset: Option<&str>, languages: &Languages) -> Result<String> {
    let code = match preset.map(str::trim).filter(|code| languages.resolve(code).is_some()) {
        Some(code) => code.to_string(),
        None => {
            if let Some(code) = preset {
                warn!("Unknown language code '{code}'.");
            }
            Input::<String>::new()
                .with_prompt("Enter language code")
                .validate_with(|input: &String| -> Result<(), String> {
                    match languages.resolve(input.trim()) {
                        Some(_) => Ok(()),
                        None => Err("Invalid language code. Please try again.".to_string()),
                    }
                })
                .interact_text()?
                .trim()
                .to_string()
        }
    };

    if let Some(name) = languages.resolve(&code) {
        info!("Selected language: {name} ({code})");
    }
    Ok(code)
}

/// Block until the user presses Enter
pub fn wait_for_enter() {
    print!("Press Enter to close this window...");
    let _ = io::stdout().flush();
    let _ = io::stdin().lock().read_line(&mut String::new());
}
