//! xkcd archive client: comic metadata lookup and image download

use crate::config::Config;
use crate::error::{RemoteError, Result};
use crate::http::{build_client, ensure_success, parse_base_url, read_json};
use crate::types::Comic;
use rand::Rng;
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const METADATA_FILE: &str = "info.0.json";

/// Client for the comic archive's JSON metadata endpoints
#[derive(Clone, Debug)]
pub struct ComicClient {
    http: Client,
    base_url: Url,
}

impl ComicClient {
    /// Create a client for `config.comic_base_url`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client(config.http_timeout)?,
            base_url: parse_base_url(&config.comic_base_url)?,
        })
    }

    /// Fetch the most recently published comic
    pub async fn latest(&self) -> Result<Comic> {
        let url = self.join(METADATA_FILE)?;
        self.fetch_metadata(url).await
    }

    /// Fetch metadata for comic `id`
    ///
    /// Does not check the id against the published range; see [`ComicClient::select`].
    pub async fn get(&self, id: u32) -> Result<Comic> {
        let url = self.join(&format!("{}/{}", id, METADATA_FILE))?;
        let comic = self.fetch_metadata(url).await?;

        if comic.num != id {
            return Err(RemoteError::malformed(
                "comic metadata",
                format!("requested comic {} but archive returned {}", id, comic.num),
            )
            .into());
        }
        Ok(comic)
    }

    /// Resolve the comic to publish
    ///
    /// The published range is read from the archive on every call. With `requested`
    /// set, that comic is used if it is in range; otherwise one is picked uniformly at
    /// random from `1..=latest`.
    pub async fn select(&self, requested: Option<u32>) -> Result<Comic> {
        let latest = self.latest().await?;
        if latest.num == 0 {
            return Err(RemoteError::malformed("comic metadata", "latest comic number is 0").into());
        }

        let id = match requested {
            Some(id) => {
                check_in_range(id, latest.num)?;
                id
            }
            None => pick_comic_id(&mut rand::thread_rng(), latest.num),
        };
        info!(comic_id = id, latest = latest.num, "selected comic");

        if id == latest.num {
            return Ok(latest);
        }
        self.get(id).await
    }

    /// Download `image_url` into `dest`, replacing any existing file
    ///
    /// Returns the number of bytes written.
    pub async fn download_image(&self, image_url: &str, dest: &Path) -> Result<u64> {
        debug!(url = %image_url, ?dest, "downloading comic image");

        let response = self
            .http
            .get(image_url)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(RemoteError::from)?;

        tokio::fs::write(dest, &bytes).await?;

        debug!(?dest, size = bytes.len(), "comic image saved");
        Ok(bytes.len() as u64)
    }

    async fn fetch_metadata(&self, url: Url) -> Result<Comic> {
        debug!(%url, "fetching comic metadata");

        let response = self.http.get(url).send().await.map_err(RemoteError::from)?;
        let response = ensure_success(response).await?;
        Ok(read_json(response, "comic metadata").await?)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::malformed("comic URL", e).into())
    }
}

/// Pick a comic number uniformly from `1..=latest`
pub fn pick_comic_id<R: Rng + ?Sized>(rng: &mut R, latest: u32) -> u32 {
    rng.gen_range(1..=latest.max(1))
}

fn check_in_range(id: u32, latest: u32) -> std::result::Result<(), RemoteError> {
    if id == 0 || id > latest {
        return Err(RemoteError::ComicOutOfRange { id, latest });
    }
    Ok(())
}
