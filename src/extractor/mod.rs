//! Media extraction engines
//!
//! Downloads are delegated to an external engine behind the [`MediaExtractor`]
//! trait. Two implementations are provided:
//!
//! - [`YtDlpExtractor`]: runs the external `yt-dlp` binary
//! - [`NoOpExtractor`]: stand-in when no binary is available; every call
//!   returns `Error::NotSupported`
//!
//! Tests inject their own implementations through
//! [`MediaDownloader::with_extractor`](crate::MediaDownloader::with_extractor).
//!
//! ## Usage
//!
//! ```no_run
//! use orbit_dl::config::ToolsConfig;
//! use orbit_dl::extractor::{MediaExtractor, YtDlpExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = YtDlpExtractor::from_config(&ToolsConfig::default())
//!         .expect("yt-dlp binary not found");
//!
//!     let info = extractor.fetch_metadata("https://example.com/watch?v=1").await?;
//!     println!("{} from {}", info.title, info.platform);
//!     Ok(())
//! }
//! ```

mod cli;
mod noop;
mod parser;
mod traits;

pub use cli::YtDlpExtractor;
pub use noop::NoOpExtractor;
pub use traits::{ExtractorCapabilities, MediaExtractor};
