//! Comic-to-wall publishing pipeline
//!
//! One run is a fixed sequence where each step feeds the next:
//! select comic, download image, get upload URL, upload, save photo, post.
//! The first failing step aborts the run. Once the download starts, the image is
//! removed on every exit path by a [`TempFile`] guard.

use crate::comic::ComicClient;
use crate::config::Config;
use crate::error::Result;
use crate::temp_file::TempFile;
use crate::types::{Comic, PublishedPost};
use crate::vk::VkClient;
use tracing::{info, instrument};

/// Publishes comics to the configured community wall
#[derive(Debug)]
pub struct Publisher {
    config: Config,
    comics: ComicClient,
    vk: VkClient,
}

impl Publisher {
    /// Build the archive and VK clients from `config`
    ///
    /// No network request is made here. Fails if `config` does not pass
    /// [`Config::validate`].
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let comics = ComicClient::new(&config)?;
        let vk = VkClient::new(&config)?;
        Ok(Self { config, comics, vk })
    }

    /// Publish a comic picked uniformly at random from the published range
    pub async fn publish_random(&self) -> Result<PublishedPost> {
        self.publish(None).await
    }

    /// Publish comic `id`
    ///
    /// Fails with [`RemoteError::ComicOutOfRange`](crate::RemoteError::ComicOutOfRange)
    /// if `id` has not been published.
    pub async fn publish_comic(&self, id: u32) -> Result<PublishedPost> {
        self.publish(Some(id)).await
    }

    #[instrument(skip(self), fields(group_id = self.config.group_id))]
    async fn publish(&self, requested: Option<u32>) -> Result<PublishedPost> {
        let comic = self.comics.select(requested).await?;

        // Guard from here on: a file already at the path is only removed once this run
        // starts writing over it
        let image = TempFile::new(&self.config.image_path);
        self.post_comic(&comic, &image).await
    }

    async fn post_comic(&self, comic: &Comic, image: &TempFile) -> Result<PublishedPost> {
        let group_id = self.config.group_id;

        let size = self.comics.download_image(&comic.img, image.path()).await?;
        info!(comic_id = comic.num, size, "comic image downloaded");

        let ticket = self.vk.get_wall_upload_server(group_id).await?;
        info!("upload URL issued");

        let uploaded = self.vk.upload_photo(&ticket.upload_url, image.path()).await?;
        info!("photo uploaded");

        let saved = self.vk.save_wall_photo(group_id, &uploaded).await?;
        let attachment = saved.attachment();

        let post_id = self.vk.wall_post(group_id, &saved, &comic.alt).await?;
        info!(comic_id = comic.num, %attachment, ?post_id, "comic published");

        Ok(PublishedPost {
            comic_id: comic.num,
            attachment,
            post_id,
        })
    }
}
