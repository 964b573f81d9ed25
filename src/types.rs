//! Transient records passed between pipeline steps

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Comic metadata as returned by the archive's `info.0.json`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Comic {
    /// Comic number
    pub num: u32,
    /// Absolute URL of the comic image
    pub img: String,
    /// Caption (the archive's alt text)
    pub alt: String,
}

/// Single-use upload URL issued by `photos.getWallUploadServer`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadTicket {
    /// Where the photo must be POSTed
    pub upload_url: String,
}

/// Value returned by the upload server and forwarded verbatim
///
/// VK sends `server` as a number and `photo`/`hash` as strings, but none of them are
/// interpreted here. Numbers keep their JSON text form so nothing is lost or reformatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opaque(String);

impl Opaque {
    /// The value as it will be sent back to VK
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Opaque {
    fn from(value: &str) -> Self {
        Opaque(value.to_string())
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Opaque {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Opaque(s)),
            serde_json::Value::Number(n) => Ok(Opaque(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, got {}",
                other
            ))),
        }
    }
}

/// Provisional handle for an uploaded but not yet saved photo
///
/// All three fields come from the same upload response and must reach
/// `photos.saveWallPhoto` together and unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadedPhoto {
    /// Upload server id
    pub server: Opaque,
    /// Photo descriptor token
    pub photo: Opaque,
    /// Integrity hash
    pub hash: Opaque,
}

/// Permanent reference to a photo saved on the community wall
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SavedPhoto {
    /// Owner of the photo (negative for communities)
    pub owner_id: i64,
    /// Photo id within the owner's albums
    #[serde(rename = "id")]
    pub media_id: i64,
}

impl SavedPhoto {
    /// Attachment reference for `wall.post`, e.g. `photo-42_999`
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.media_id)
    }
}

/// Outcome of a successful run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedPost {
    /// Comic that was posted
    pub comic_id: u32,
    /// Attachment string sent with the post
    pub attachment: String,
    /// Wall post id, when VK reported one
    pub post_id: Option<i64>,
}
