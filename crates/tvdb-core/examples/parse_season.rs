//! Print the episode index of a saved season page.
//!
//! cargo run -p tvdb-core --example parse_season -- season.html deu

use tvdb_core::client::DEFAULT_BASE_URL;
use tvdb_core::parser::parse_episode_list;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: parse_season <season.html> [language]")?;
    let language = args.next().unwrap_or_else(|| "eng".to_string());

    let html = std::fs::read_to_string(&path)?;
    let index = parse_episode_list(&html, DEFAULT_BASE_URL, &language)?;

    println!("{} episodes in {path}:", index.len());
    for (number, links) in &index {
        println!("  {number:>4}  {}", links.translate_url);
    }

    Ok(())
}
