//! Publish one random xkcd comic to the configured VK community wall.
//!
//! Requires `VK_ACCESS_TOKEN` and `VK_GROUP_ID` in the environment or a `.env` file.
//! Log verbosity follows `RUST_LOG` (default: `info`).

use comic_wall_poster::{Config, Publisher};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> comic_wall_poster::Result<()> {
    let config = Config::from_env()?;
    let publisher = Publisher::new(config)?;
    publisher.publish_random().await?;
    Ok(())
}
