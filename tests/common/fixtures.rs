//! Mock comic archive and VK endpoints served from one wiremock server

use comic_wall_poster::Config;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Bytes served as the comic image
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n fake comic image body";

/// Route of the comic image on the mock server
pub const IMAGE_ROUTE: &str = "/imgs/comic.png";

/// Priority for mocks that must win over the happy-path ones (wiremock: lower wins)
pub const OVERRIDE: u8 = 1;

/// Mock server, scratch directory and a config pointing at both
pub struct Harness {
    pub server: MockServer,
    pub temp_dir: TempDir,
    pub config: Config,
}

impl Harness {
    /// Start a mock server and build a config for group 42
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::new("test-token", 42);
        config.comic_base_url = format!("{}/xkcd/", server.uri());
        config.api_base_url = format!("{}/method/", server.uri());
        config.image_path = temp_dir.path().join("image.jpg");
        config.http_timeout = std::time::Duration::from_secs(5);

        Self {
            server,
            temp_dir,
            config,
        }
    }

    /// Where the pipeline keeps the downloaded image
    pub fn image_path(&self) -> PathBuf {
        self.config.image_path.clone()
    }

    /// URL of the served comic image
    pub fn image_url(&self) -> String {
        format!("{}{}", self.server.uri(), IMAGE_ROUTE)
    }

    /// URL handed out as the upload ticket
    pub fn upload_url(&self) -> String {
        format!("{}/upload/x", self.server.uri())
    }

    /// Archive reports `latest` as the newest comic
    pub async fn mount_latest(&self, latest: u32) {
        let img = self.image_url();
        Mock::given(method("GET"))
            .and(path("/xkcd/info.0.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "num": latest,
                "img": img,
                "alt": "latest caption",
                "title": "Latest",
            })))
            .mount(&self.server)
            .await;
    }

    /// Archive serves comic `num` with the given caption
    pub async fn mount_comic(&self, num: u32, alt: &str) {
        let img = self.image_url();
        Mock::given(method("GET"))
            .and(path(format!("/xkcd/{}/info.0.json", num)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "num": num,
                "img": img,
                "alt": alt,
                "title": format!("Comic {}", num),
            })))
            .mount(&self.server)
            .await;
    }

    /// Archive answers any comic id, echoing the id back
    pub async fn mount_any_comic(&self) {
        let img = self.image_url();
        Mock::given(method("GET"))
            .and(path_regex(r"^/xkcd/\d+/info\.0\.json$"))
            .respond_with(move |request: &Request| {
                let num: u32 = request
                    .url
                    .path_segments()
                    .and_then(|mut segments| segments.nth(1))
                    .and_then(|id| id.parse().ok())
                    .unwrap();
                ResponseTemplate::new(200).set_body_json(json!({
                    "num": num,
                    "img": img,
                    "alt": format!("caption {}", num),
                }))
            })
            .mount(&self.server)
            .await;
    }

    /// Serve the comic image bytes
    pub async fn mount_image(&self) {
        Mock::given(method("GET"))
            .and(path(IMAGE_ROUTE))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES))
            .mount(&self.server)
            .await;
    }

    /// `photos.getWallUploadServer` issues [`Harness::upload_url`]
    pub async fn mount_upload_server(&self) {
        let upload_url = self.upload_url();
        Mock::given(method("GET"))
            .and(path("/method/photos.getWallUploadServer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"upload_url": upload_url, "album_id": -14, "user_id": 7}
            })))
            .mount(&self.server)
            .await;
    }

    /// Upload server returns handle `{server: 1, photo: "p", hash: "h"}`
    pub async fn mount_upload(&self) {
        Mock::given(method("POST"))
            .and(path("/upload/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "server": 1,
                "photo": "p",
                "hash": "h"
            })))
            .mount(&self.server)
            .await;
    }

    /// `photos.saveWallPhoto` returns photo `-42_999`
    pub async fn mount_save(&self) {
        Mock::given(method("POST"))
            .and(path("/method/photos.saveWallPhoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [{"owner_id": -42, "id": 999, "album_id": -14}]
            })))
            .mount(&self.server)
            .await;
    }

    /// `wall.post` accepts the post
    pub async fn mount_wall_post(&self) {
        Mock::given(method("POST"))
            .and(path("/method/wall.post"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"post_id": 321}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount every step after comic selection with successful responses
    pub async fn mount_publish_path(&self) {
        self.mount_image().await;
        self.mount_upload_server().await;
        self.mount_upload().await;
        self.mount_save().await;
        self.mount_wall_post().await;
    }

    /// Mount a successful run for comic `num` with caption `alt`
    pub async fn mount_happy_path(&self, latest: u32, num: u32, alt: &str) {
        self.mount_latest(latest).await;
        self.mount_comic(num, alt).await;
        self.mount_publish_path().await;
    }

    /// Make requests to `route` fail with `response`, taking precedence over other mocks
    pub async fn fail_at(&self, http_method: &str, route: &str, response: ResponseTemplate) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(response)
            .with_priority(OVERRIDE)
            .mount(&self.server)
            .await;
    }
}
