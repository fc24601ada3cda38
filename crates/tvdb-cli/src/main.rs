//! Command-line front-end for bulk TheTVDB episode translations.
//!
//! Loads the account, languages and translations files, asks for the season
//! and language when they are not given as flags, then runs the translator.

mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tvdb_core::client::DEFAULT_BASE_URL;
use tvdb_core::{
    load_translations, ClientConfig, CredentialStore, Languages, Translator, TvdbSession,
};

#[derive(Debug, Parser)]
#[command(name = "tvdb-translate", version, about = "Bulk-update episode translations on TheTVDB")]
struct Cli {
    /// Account file holding username, password and saved cookies
    #[arg(long, env = "TVDB_ACCOUNT_FILE", default_value = "config/account.json")]
    account: PathBuf,

    /// Languages file mapping language codes to names
    #[arg(long, default_value = "languages.json")]
    languages: PathBuf,

    /// Translations file with episodeNumber, episodeTitle and description
    #[arg(long, default_value = "episodes_titles.json")]
    translations: PathBuf,

    /// Site root
    #[arg(long, env = "TVDB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Season page URL; prompted for when missing or invalid
    #[arg(long)]
    season: Option<String>,

    /// Language code to translate into; prompted for when missing or invalid
    #[arg(long)]
    language: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Maximum requests per second (0 disables pacing)
    #[arg(long, default_value_t = 2.0)]
    rate: f64,

    /// Log request details
    #[arg(short, long)]
    verbose: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    };

    if !cli.no_pause {
        prompt::wait_for_enter();
    }
    code
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let store = CredentialStore::new(&cli.account);
    let credentials = store
        .load()
        .with_context(|| format!("reading '{}'", cli.account.display()))?
        .into_credentials(store.path())?;

    let languages = Languages::load(&cli.languages)?;
    let entries = load_translations(&cli.translations)?;
    info!("Loaded {} translations.", entries.len());

    let season = prompt::season_url(cli.season.as_deref(), &cli.base_url)?;
    let language_code = prompt::language_code(cli.language.as_deref(), &languages)?;

    let config = ClientConfig {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
        requests_per_second: cli.rate,
        ..ClientConfig::default()
    };
    let session = TvdbSession::with_config(config, store, credentials)?;

    let mut translator = Translator::new(session, language_code);
    let summary = translator.run(&season, &entries).await?;
    info!(
        "Done: {} updated, {} not updated, {} not in this season.",
        summary.updated(),
        summary.not_updated(),
        summary.not_in_season()
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
