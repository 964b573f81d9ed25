//! # comic-wall-poster
//!
//! Posts a random xkcd comic, with its alt text as the caption, to a VK community wall.
//!
//! A run is strictly sequential: pick a comic, download the image to a scoped temporary
//! file, obtain a VK upload URL, upload the image, save it as a wall photo, and publish a
//! post attributed to the community. Any failure aborts the run; the temporary image is
//! removed either way.
//!
//! ## Quick Start
//!
//! ```no_run
//! use comic_wall_poster::{Config, Publisher};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads VK_ACCESS_TOKEN and VK_GROUP_ID (and a .env file if present)
//!     let config = Config::from_env()?;
//!
//!     let publisher = Publisher::new(config)?;
//!     let post = publisher.publish_random().await?;
//!     println!("posted comic {} as {}", post.comic_id, post.attachment);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// xkcd archive client
pub mod comic;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
mod http;
/// Publishing pipeline
pub mod publisher;
/// Scoped temporary file
pub mod temp_file;
/// Records passed between pipeline steps
pub mod types;
/// VK API client
pub mod vk;

// Re-export commonly used types
pub use comic::ComicClient;
pub use config::Config;
pub use error::{Error, RemoteError, Result};
pub use publisher::Publisher;
pub use temp_file::TempFile;
pub use types::{Comic, PublishedPost, SavedPhoto, UploadTicket, UploadedPhoto};
pub use vk::VkClient;
