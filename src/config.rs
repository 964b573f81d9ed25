//! Configuration types for comic-wall-poster

use crate::error::{Error, Result};
use std::{fmt, path::PathBuf, time::Duration};

/// VK API version sent with every method call
pub const VK_API_VERSION: &str = "5.131";

/// Environment key holding the VK access token
pub const ENV_ACCESS_TOKEN: &str = "VK_ACCESS_TOKEN";
/// Environment key holding the target community id
pub const ENV_GROUP_ID: &str = "VK_GROUP_ID";
/// Optional override for the temporary image location
pub const ENV_IMAGE_PATH: &str = "COMIC_IMAGE_PATH";
/// Optional override for the per-request timeout, in seconds
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";

/// Settings for one publishing run
///
/// Loaded once at startup and handed to every client. Base URLs are configurable so
/// tests can point the clients at a mock server.
#[derive(Clone)]
pub struct Config {
    /// VK access token with `photos` and `wall` rights for the community
    pub access_token: String,

    /// Community id, in `1..=i64::MAX` (it is negated where VK addresses the community)
    pub group_id: u64,

    /// VK API version (default: "5.131")
    pub api_version: String,

    /// VK method endpoint base (default: "https://api.vk.com/method/")
    pub api_base_url: String,

    /// Comic archive base (default: "https://xkcd.com/")
    pub comic_base_url: String,

    /// Where the downloaded image is kept during the run (default: "image.jpg")
    pub image_path: PathBuf,

    /// Timeout applied to each HTTP request (default: 30s)
    pub http_timeout: Duration,
}

impl Config {
    /// Create a config with defaults for everything except the credentials
    ///
    /// The group id is not checked here; see [`Config::validate`].
    pub fn new(access_token: impl Into<String>, group_id: u64) -> Self {
        Self {
            access_token: access_token.into(),
            group_id,
            api_version: VK_API_VERSION.to_string(),
            api_base_url: "https://api.vk.com/method/".to_string(),
            comic_base_url: "https://xkcd.com/".to_string(),
            image_path: PathBuf::from("image.jpg"),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "could not load .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `VK_ACCESS_TOKEN` and `VK_GROUP_ID` are required; the group id must be a
    /// positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ENV_ACCESS_TOKEN)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::config(ENV_ACCESS_TOKEN, format!("{} is not set", ENV_ACCESS_TOKEN))
            })?;

        let raw_group = lookup(ENV_GROUP_ID)
            .ok_or_else(|| Error::config(ENV_GROUP_ID, format!("{} is not set", ENV_GROUP_ID)))?;
        // Some setups store the community id already negated
        let group_id = raw_group
            .trim()
            .trim_start_matches('-')
            .parse::<u64>()
            .map_err(|_| invalid_group_id(&raw_group))?;

        let mut config = Self::new(access_token, group_id);
        config.validate()?;

        if let Some(path) = lookup(ENV_IMAGE_PATH).filter(|p| !p.trim().is_empty()) {
            config.image_path = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    Error::config(
                        ENV_HTTP_TIMEOUT,
                        format!(
                            "{} must be a positive number of seconds, got '{}'",
                            ENV_HTTP_TIMEOUT, raw
                        ),
                    )
                })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Check invariants that `new` and direct field edits do not enforce
    ///
    /// The group id must be non-zero and fit in `i64`, or its negation would address
    /// some other wall.
    pub fn validate(&self) -> Result<()> {
        if self.group_id == 0 || i64::try_from(self.group_id).is_err() {
            return Err(invalid_group_id(&self.group_id.to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("group_id", &self.group_id)
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("comic_base_url", &self.comic_base_url)
            .field("image_path", &self.image_path)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn invalid_group_id(raw: &str) -> Error {
    Error::config(
        ENV_GROUP_ID,
        format!(
            "{} must be a positive integer up to {}, got '{}'",
            ENV_GROUP_ID,
            i64::MAX,
            raw
        ),
    )
}
