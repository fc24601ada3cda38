//! TVDB Translator Core Library
//!
//! This crate provides the core functionality for bulk-updating episode
//! title and description translations on TheTVDB.
//!
//! # Features
//! - Cookie-based login session that re-authenticates on expiry
//! - Season page scraping into an episode index
//! - Translate form synthesis that keeps the page's hidden fields
//! - Credential, languages and translations file handling

pub mod catalog;
pub mod client;
pub mod credentials;
pub mod error;
pub mod parser;
pub mod translator;
pub mod types;

// Re-export main types for convenience
pub use catalog::{load_translations, Languages};
pub use client::{ClientConfig, RateLimiter, TvdbSession};
pub use credentials::{CredentialStore, LoadOutcome, SetupReason};
pub use error::{Result, TvdbError};
pub use translator::{RunSummary, Translator};
pub use types::{
    Credentials, EpisodeIndex, EpisodeLinks, EpisodeOutcome, FormPayload, SeasonUrl,
    TranslationEntry,
};
