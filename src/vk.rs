//! VK API client for posting a photo to a community wall
//!
//! Posting a photo takes three dependent API calls plus one raw upload:
//!
//! 1. `photos.getWallUploadServer` issues a single-use upload URL
//! 2. the image is POSTed to that URL as multipart field `photo`
//! 3. `photos.saveWallPhoto` turns the upload handle into a permanent photo
//! 4. `wall.post` publishes a post on behalf of the community with the photo attached
//!
//! VK reports most failures as `{"error": {...}}` inside an HTTP 200 response, so
//! every method response is checked for an error envelope, not just the status.

use crate::config::{Config, ENV_GROUP_ID};
use crate::error::{Error, RemoteError, Result};
use crate::http::{build_client, ensure_success, parse_base_url, read_json};
use crate::types::{SavedPhoto, UploadTicket, UploadedPhoto};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const GET_WALL_UPLOAD_SERVER: &str = "photos.getWallUploadServer";
const SAVE_WALL_PHOTO: &str = "photos.saveWallPhoto";
const WALL_POST: &str = "wall.post";

/// Multipart field name the upload server expects
const UPLOAD_FIELD: &str = "photo";

/// `owner_id` that addresses a community wall: VK uses negative ids for communities
///
/// Fails for 0 and for ids that do not fit in `i64`; a wrapped value would address
/// a different wall.
pub fn community_owner_id(group_id: u64) -> Result<i64> {
    i64::try_from(group_id)
        .ok()
        .filter(|id| *id > 0)
        .and_then(i64::checked_neg)
        .ok_or_else(|| {
            Error::config(
                ENV_GROUP_ID,
                format!("group id {} cannot be addressed as a wall owner", group_id),
            )
        })
}

/// Standard VK method response
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

impl<T> Envelope<T> {
    fn into_response(self, method: &str) -> std::result::Result<T, RemoteError> {
        if let Some(error) = self.error {
            return Err(RemoteError::Api {
                method: method.to_string(),
                code: error.error_code,
                message: error.error_msg,
            });
        }
        self.response.ok_or_else(|| {
            RemoteError::malformed(format!("{} response", method), "missing 'response'")
        })
    }
}

/// `wall.post` result; only the post id is of interest
#[derive(Debug, Deserialize)]
struct WallPostResult {
    post_id: Option<i64>,
}

/// Client for the VK methods used to publish a photo post
#[derive(Clone)]
pub struct VkClient {
    http: Client,
    api_base: Url,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("api_base", &self.api_base.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl VkClient {
    /// Create a client using the token, API version and endpoint from `config`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client(config.http_timeout)?,
            api_base: parse_base_url(&config.api_base_url)?,
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Request a single-use upload URL for the community's wall
    pub async fn get_wall_upload_server(&self, group_id: u64) -> Result<UploadTicket> {
        let url = self.method_url(GET_WALL_UPLOAD_SERVER)?;
        debug!(method = GET_WALL_UPLOAD_SERVER, group_id, "calling VK API");

        let response = self
            .http
            .get(url)
            .query(&[("group_id", group_id.to_string())])
            .query(&self.auth_params())
            .send()
            .await
            .map_err(RemoteError::from)?;

        Ok(self.read_method(response, GET_WALL_UPLOAD_SERVER).await?)
    }

    /// Upload the image at `image` to `upload_url`
    ///
    /// The returned handle is opaque and is meant to be passed as-is to
    /// [`VkClient::save_wall_photo`].
    pub async fn upload_photo(&self, upload_url: &str, image: &Path) -> Result<UploadedPhoto> {
        let bytes = tokio::fs::read(image).await?;
        let file_name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();
        debug!(?image, size = bytes.len(), "uploading photo");

        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(bytes).file_name(file_name));
        let response = self
            .http
            .post(upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let response = ensure_success(response).await?;

        let body: serde_json::Value = read_json(response, "photo upload response").await?;
        // The upload server uses a flat {"error": "..."} shape, not the method envelope
        if let Some(error) = body.get("error") {
            return Err(RemoteError::malformed(
                "photo upload response",
                format!("upload server reported error: {}", error),
            )
            .into());
        }
        Ok(serde_json::from_value(body)
            .map_err(|e| RemoteError::malformed("photo upload response", e))?)
    }

    /// Save an uploaded photo to the community's wall album
    ///
    /// Fails if VK returns no saved photo, which happens when the handle is invalid
    /// or was already used.
    pub async fn save_wall_photo(
        &self,
        group_id: u64,
        uploaded: &UploadedPhoto,
    ) -> Result<SavedPhoto> {
        let url = self.method_url(SAVE_WALL_PHOTO)?;
        debug!(method = SAVE_WALL_PHOTO, group_id, "calling VK API");

        let response = self
            .http
            .post(url)
            .query(&[
                ("group_id", group_id.to_string()),
                ("photo", uploaded.photo.to_string()),
                ("server", uploaded.server.to_string()),
                ("hash", uploaded.hash.to_string()),
            ])
            .query(&self.auth_params())
            .send()
            .await
            .map_err(RemoteError::from)?;

        let saved: Vec<SavedPhoto> = self.read_method(response, SAVE_WALL_PHOTO).await?;
        let photo = saved.into_iter().next().ok_or_else(|| {
            RemoteError::malformed("photos.saveWallPhoto response", "no photo was saved")
        })?;

        info!(
            owner_id = photo.owner_id,
            media_id = photo.media_id,
            "photo saved to wall album"
        );
        Ok(photo)
    }

    /// Publish a post on the community wall with `photo` attached
    ///
    /// The post is attributed to the community. Returns the post id if VK reported one.
    pub async fn wall_post(
        &self,
        group_id: u64,
        photo: &SavedPhoto,
        message: &str,
    ) -> Result<Option<i64>> {
        let url = self.method_url(WALL_POST)?;
        let owner_id = community_owner_id(group_id)?;
        let attachment = photo.attachment();
        debug!(method = WALL_POST, owner_id, %attachment, "calling VK API");

        let mut form = vec![
            ("owner_id", owner_id.to_string()),
            ("message", message.to_string()),
            ("from_group", "1".to_string()),
            ("attachments", attachment),
        ];
        form.extend(self.auth_params());

        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(RemoteError::from)?;

        let result: WallPostResult = self.read_method(response, WALL_POST).await?;
        Ok(result.post_id)
    }

    async fn read_method<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        method: &str,
    ) -> std::result::Result<T, RemoteError> {
        let response = ensure_success(response).await?;
        let envelope: Envelope<T> = read_json(response, &format!("{} response", method)).await?;
        envelope.into_response(method)
    }

    fn auth_params(&self) -> [(&'static str, String); 2] {
        [
            ("access_token", self.access_token.clone()),
            ("v", self.api_version.clone()),
        ]
    }

    fn method_url(&self, method: &str) -> std::result::Result<Url, RemoteError> {
        self.api_base
            .join(method)
            .map_err(|e| RemoteError::malformed("VK method URL", e))
    }
}
