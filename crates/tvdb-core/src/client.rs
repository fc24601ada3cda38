//! Authenticated HTTP session for TheTVDB
//!
//! This module provides a cookie-based session that logs in through the
//! site's login form and transparently logs in again when a request gets
//! bounced to the login page.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, REFERER};
use reqwest::{Method, Response, Url};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::error::{Result, TvdbError};
use crate::parser::extract_login_token;
use crate::types::{Credentials, FormPayload};

/// Base URL for TheTVDB
pub const DEFAULT_BASE_URL: &str = "https://www.thetvdb.com";

/// Cookie the site sets once a login has been accepted
pub const AUTH_COOKIE: &str = "TVDB_AUTHENTICATED";

/// Path of the login form (GET for the token, POST for the credentials)
const LOGIN_PATH: &str = "/auth/login";

/// Path the episode translate form posts to
const TRANSLATE_STORE_PATH: &str = "/episodes/translatestore";

/// Default User-Agent mimicking a desktop browser
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:141.0) Gecko/20100101 Firefox/141.0";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// so a long translation run does not hammer the site.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// A non-positive rate disables limiting.
    ///
    /// # Example
    /// ```
    /// use tvdb_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Wait until the next request is allowed
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the TheTVDB session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root (default: `https://www.thetvdb.com`)
    pub base_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            requests_per_second: 2.0,
        }
    }
}

impl ClientConfig {
    /// Site root without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL of the login form
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base(), LOGIN_PATH)
    }

    /// Full URL the translate form posts to
    pub fn translate_store_url(&self) -> String {
        format!("{}{}", self.base(), TRANSLATE_STORE_PATH)
    }
}

/// Authenticated session against TheTVDB
///
/// Owns the HTTP client, its cookie jar and the account it logs in with.
/// Cookies of a successful login are written back through the
/// [`CredentialStore`] so the next run can reuse them.
pub struct TvdbSession {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
    login_url: Url,
    translate_store_url: Url,
    store: CredentialStore,
    credentials: Credentials,
    rate_limiter: RateLimiter,
}

impl TvdbSession {
    /// Create a session with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new(store: CredentialStore, credentials: Credentials) -> Result<Self> {
        Self::with_config(ClientConfig::default(), store, credentials)
    }

    /// Create a session with custom configuration
    ///
    /// Saved cookies from `credentials` are loaded into the jar.
    ///
    /// # Errors
    /// - `TvdbError::InvalidUrl` - `config.base_url` is not a valid URL
    /// - `TvdbError::Http` - the HTTP client cannot be created
    pub fn with_config(
        config: ClientConfig,
        store: CredentialStore,
        credentials: Credentials,
    ) -> Result<Self> {
        let base_url = parse_url(config.base())?;
        let login_url = parse_url(&config.login_url())?;
        let translate_store_url = parse_url(&config.translate_store_url())?;

        let jar = Arc::new(Jar::default());
        if credentials.cookies.is_empty() {
            info!("No existing session cookies found.");
        } else {
            info!("Found existing cookies, loading into session.");
            for (name, value) in &credentials.cookies {
                jar.add_cookie_str(&format!("{name}={value}"), &base_url);
            }
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url,
            login_url,
            translate_store_url,
            store,
            credentials,
            rate_limiter: RateLimiter::new(config.requests_per_second),
        })
    }

    /// Log in through the site's login form.
    ///
    /// Never fails: any problem is logged and reported as `false`.
    /// On success the new cookies are saved to the credential file.
    pub async fn login(&mut self) -> bool {
        match self.try_login().await {
            Ok(()) => {
                info!("Successfully logged in and session cookies are stored.");
                true
            }
            Err(e) => {
                warn!("Login failed: {e}. Please check your credentials or site changes.");
                false
            }
        }
    }

    /// Log in, reporting why it failed.
    ///
    /// # Errors
    /// - `TvdbError::TokenNotFound` - login page has no `_token`
    /// - `TvdbError::Http` - either request failed or returned an error status
    /// - `TvdbError::LoginRejected` - the site did not authenticate the session
    /// - `TvdbError::Io` / `TvdbError::Json` - saving the cookies failed
    pub async fn try_login(&mut self) -> Result<()> {
        self.rate_limiter.acquire().await;
        let page = self
            .client
            .get(self.login_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let token = extract_login_token(&page)?;

        self.rate_limiter.acquire().await;
        let login_form = [
            ("_token", token.as_str()),
            ("email", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("remember", "on"),
        ];
        let response = self
            .client
            .post(self.login_url.clone())
            .header(REFERER, self.login_url.as_str())
            .form(&login_form)
            .send()
            .await?
            .error_for_status()?;

        let cookies = self.cookie_map();
        if !cookies.contains_key(AUTH_COOKIE) {
            return Err(TvdbError::LoginRejected(format!(
                "no {AUTH_COOKIE} cookie was set"
            )));
        }
        if *response.url() == self.login_url {
            return Err(TvdbError::LoginRejected(
                "still on the login page".to_string(),
            ));
        }

        info!("Saving session cookies to file...");
        self.credentials.cookies = cookies;
        self.store.save(&self.credentials)?;
        info!("Session cookies saved.");
        Ok(())
    }

    /// Send a request, logging in again if the session has expired.
    ///
    /// A response that was redirected onto the login page means the session
    /// is gone. The session logs in once and replays the request once.
    ///
    /// # Errors
    /// - `TvdbError::SessionExpired` - logging in again failed
    /// - `TvdbError::Http` - the request itself failed
    pub async fn request(
        &mut self,
        method: Method,
        url: &str,
        form: Option<&FormPayload>,
        headers: Option<HeaderMap>,
    ) -> Result<Response> {
        let response = self.send(method.clone(), url, form, headers.clone()).await?;
        if !is_expired_redirect(&self.login_url, url, response.url()) {
            return Ok(response);
        }

        warn!("Session seems to have expired. Attempting to log in again.");
        if !self.login().await {
            return Err(TvdbError::SessionExpired);
        }

        info!("Login successful. Retrying original request.");
        self.send(method, url, form, headers).await
    }

    /// GET a page and return its HTML.
    ///
    /// # Errors
    /// Returns `TvdbError::Http` for transport failures and error statuses.
    pub async fn fetch_page(&mut self, url: &str) -> Result<String> {
        let response = self.request(Method::GET, url, None, None).await?;
        Ok(response.error_for_status()?.text().await?)
    }

    /// Submit an episode translate form.
    ///
    /// # Errors
    /// Same as [`TvdbSession::request`].
    pub async fn update_episode(&mut self, form: &FormPayload) -> Result<Response> {
        let url = self.translate_store_url.to_string();
        self.request(Method::POST, &url, Some(form), None).await
    }

    /// Cookies the jar would send to the site, by name
    pub fn cookie_map(&self) -> BTreeMap<String, String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().map(parse_cookie_header).ok())
            .unwrap_or_default()
    }

    /// The account this session logs in with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Site root
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Login form URL
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    async fn send(
        &mut self,
        method: Method,
        url: &str,
        form: Option<&FormPayload>,
        headers: Option<HeaderMap>,
    ) -> Result<Response> {
        self.rate_limiter.acquire().await;
        debug!(%method, url, "sending request");

        let mut builder = self.client.request(method, url);
        if let Some(form) = form {
            builder = builder.form(form);
        }
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        Ok(builder.send().await?)
    }
}

/// Whether a response was bounced to the login page.
///
/// reqwest hides the redirect history, so a final URL that differs from the
/// requested one stands in for "was redirected".
fn is_expired_redirect(login_url: &Url, requested: &str, final_url: &Url) -> bool {
    if !final_url.as_str().starts_with(login_url.as_str()) {
        return false;
    }
    match Url::parse(requested) {
        Ok(requested) => requested != *final_url,
        Err(_) => requested != final_url.as_str(),
    }
}

/// Split a `Cookie` header value (`a=1; b=2`) into name/value pairs.
fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| TvdbError::InvalidUrl(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(credentials: Credentials) -> TvdbSession {
        TvdbSession::new(CredentialStore::new("unused-account.json"), credentials).unwrap()
    }

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_disabled() {
        let limiter = RateLimiter::new(0.0);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let mut limiter = RateLimiter::new(10.0); // 100ms interval

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        // Second acquire should wait at least 100ms
        assert!(elapsed >= Duration::from_millis(100));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.thetvdb.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.requests_per_second, 2.0);
        assert!(config.user_agent.contains("Firefox"));
    }

    #[test]
    fn test_client_config_urls() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.login_url(), "http://localhost:8080/auth/login");
        assert_eq!(
            config.translate_store_url(),
            "http://localhost:8080/episodes/translatestore"
        );
    }

    #[test]
    fn test_session_creation() {
        let session = session_with(Credentials::new("user", "pass"));
        assert_eq!(session.login_url().as_str(), "https://www.thetvdb.com/auth/login");
        assert!(session.cookie_map().is_empty());
    }

    #[test]
    fn test_session_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        let result = TvdbSession::with_config(
            config,
            CredentialStore::new("unused-account.json"),
            Credentials::new("user", "pass"),
        );
        assert!(matches!(result, Err(TvdbError::InvalidUrl(_))));
    }

    #[test]
    fn test_session_seeds_saved_cookies() {
        let mut credentials = Credentials::new("user", "pass");
        credentials
            .cookies
            .insert(AUTH_COOKIE.to_string(), "1".to_string());
        credentials
            .cookies
            .insert("laravel_session".to_string(), "abc".to_string());

        let session = session_with(credentials.clone());
        assert_eq!(session.cookie_map(), credentials.cookies);
    }

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("a=1; TVDB_AUTHENTICATED=yes;b=x=y");
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
        assert_eq!(cookies.get(AUTH_COOKIE).map(String::as_str), Some("yes"));
        assert_eq!(cookies.get("b").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn test_is_expired_redirect() {
        let login = Url::parse("https://www.thetvdb.com/auth/login").unwrap();
        let bounced = Url::parse("https://www.thetvdb.com/auth/login?next=%2Fseries").unwrap();
        let season = "https://www.thetvdb.com/series/x/seasons/official/1";

        assert!(is_expired_redirect(&login, season, &bounced));
        assert!(is_expired_redirect(&login, season, &login));
        // Asking for the login page itself is not an expiry
        assert!(!is_expired_redirect(&login, login.as_str(), &login));
        // Ending somewhere else is not an expiry either
        let other = Url::parse(season).unwrap();
        assert!(!is_expired_redirect(&login, season, &other));
    }
}
