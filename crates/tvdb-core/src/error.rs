//! Error types for the TVDB translator
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for TVDB translator operations
#[derive(Error, Debug)]
pub enum TvdbError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading or writing a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A local JSON file could not be decoded or encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Credential file was missing or corrupt and a template has been written
    #[error("Please fill in your credentials in '{}' and run the script again.", .0.display())]
    CredentialsNeedSetup(PathBuf),

    /// Username or password is blank in the credential file
    #[error("'username' or 'password' is missing or empty in '{}'. Please update it with your credentials and run the script again.", .0.display())]
    IncompleteCredentials(PathBuf),

    /// Credential file is valid JSON but not shaped like an account
    #[error("Invalid credential file: {0}")]
    InvalidCredentials(String),

    /// Languages or translations file is missing
    #[error("File '{}' not found. Please ensure it exists.", .0.display())]
    CatalogMissing(PathBuf),

    /// Login page carried no `_token` input
    #[error("Login token not found on the login page")]
    TokenNotFound,

    /// Site did not accept the login attempt
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// Session expired and logging in again failed
    #[error("Session expired and login failed. Cannot proceed without login.")]
    SessionExpired,

    /// Episode listing row lacked the expected cells or link
    #[error("Malformed episode row: {0}")]
    MalformedEpisodeRow(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Input did not look like a season page URL
    #[error("Invalid season URL format: {0}")]
    InvalidSeasonUrl(String),
}

/// Result type alias for TVDB translator operations
pub type Result<T> = std::result::Result<T, TvdbError>;
