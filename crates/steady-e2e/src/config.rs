// Config - Suite settings from the environment and per-environment .env files
//
// Lookup order for every key: process environment, then
// config/environments/<ENV>.env, then the built-in default. The .env file is
// read into a map; the process environment is never modified.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://superbet.ro";
pub const DEFAULT_ENV: &str = "local";
pub const DEFAULT_RETRY_COUNT: u32 = 2;
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const DEFAULT_SCREENSHOT_DIR: &str = "test-results/screenshots";

/// Directory holding `<env>.env` files, relative to the working directory.
pub const ENVIRONMENTS_DIR: &str = "config/environments";

/// Delay between re-attempts of a failed click or fill.
const ACTION_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Resolved suite settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Site under test, e.g. "https://superbet.ro"
    pub base_url: String,
    /// Environment name selecting the .env file
    pub env: String,
    pub headless: bool,
    /// Extra attempts for mutating actions
    pub retry_count: u32,
    /// Whole-test budget, enforced by the runner
    pub timeout: Duration,
    pub screenshot_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            env: DEFAULT_ENV.to_string(),
            headless: true,
            retry_count: DEFAULT_RETRY_COUNT,
            timeout: DEFAULT_TEST_TIMEOUT,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
        }
    }
}

impl Settings {
    /// Loads settings for the environment named by `ENV` (default "local").
    ///
    /// # Errors
    ///
    /// Returns `Config` if the .env file is malformed or a value does not parse.
    /// A missing .env file is not an error.
    pub fn load() -> Result<Self> {
        let env = std::env::var("ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let file = Path::new(ENVIRONMENTS_DIR).join(format!("{}.env", env));
        Self::load_from(&file)
    }

    /// Loads settings using `file` as the .env source.
    pub fn load_from(file: &Path) -> Result<Self> {
        let file_values = read_env_file(file)?;
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        })
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = get("BASE_URL").unwrap_or(defaults.base_url);
        url::Url::parse(&base_url).map_err(|e| Error::Config {
            key: "BASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            env: get("ENV").unwrap_or(defaults.env),
            headless: match get("HEADLESS") {
                Some(value) => parse_bool("HEADLESS", &value)?,
                None => defaults.headless,
            },
            retry_count: match get("RETRY_COUNT") {
                Some(value) => parse_number("RETRY_COUNT", &value)?,
                None => defaults.retry_count,
            },
            timeout: match get("TIMEOUT") {
                Some(value) => Duration::from_millis(parse_number("TIMEOUT", &value)?),
                None => defaults.timeout,
            },
            screenshot_dir: get("SCREENSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.screenshot_dir),
        })
    }

    /// Absolute URL for a path on the site under test.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Leading-dot cookie domain for the base URL's host, e.g. ".superbet.ro".
    ///
    /// Only a leading `www.` is stripped; other subdomains are kept, so
    /// `https://m.superbet.ro` gives ".m.superbet.ro". `None` when the base
    /// URL has no host.
    pub fn cookie_domain(&self) -> Option<String> {
        let url = url::Url::parse(&self.base_url).ok()?;
        let host = url.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        Some(format!(".{}", host))
    }

    /// Retry policy for clicks and fills: `retry_count` extra attempts.
    pub fn action_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.retry_count.saturating_add(1), ACTION_RETRY_DELAY)
    }
}

fn read_env_file(file: &Path) -> Result<HashMap<String, String>> {
    match dotenvy::from_path_iter(file) {
        Ok(iter) => iter
            .collect::<std::result::Result<HashMap<_, _>, _>>()
            .map_err(|e| Error::Config {
                key: file.display().to_string(),
                reason: e.to_string(),
            }),
        Err(e) if e.not_found() => {
            tracing::debug!(file = %file.display(), "no environment file, using defaults");
            Ok(HashMap::new())
        }
        Err(e) => Err(Error::Config {
            key: file.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(Error::Config {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| Error::Config {
        key: key.to_string(),
        reason: format!("'{}': {}", value, e),
    })
}
