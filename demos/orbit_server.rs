//! REST API server example
//!
//! Runs orbit-dl with the REST API enabled, then shuts down cleanly on
//! Ctrl+C / SIGTERM.
//!
//! An optional JSON config file can be passed as the first argument:
//!
//! ```json
//! { "download_dir": "downloads", "max_concurrent_downloads": 2, "api": { "swagger_ui": true } }
//! ```
//!
//! After starting, you can:
//! - Analyze a URL via POST http://127.0.0.1:54322/api/analyze
//! - Start a download via POST http://127.0.0.1:54322/api/download
//! - Poll it via GET http://127.0.0.1:54322/api/status/<task_id>
//! - Stream events via GET http://127.0.0.1:54322/api/events

use orbit_dl::{Config, MediaDownloader, run_with_shutdown};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orbit_dl=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str::<Config>(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let downloader = Arc::new(MediaDownloader::new(config).await?);
    let base = format!("http://{}/api", downloader.get_config().server.api.bind_address);

    println!("Starting orbit-dl REST API server");
    println!("API Base: {base}");
    println!("Download folder: {}", downloader.download_dir().display());
    println!();
    println!("Example commands:");
    println!("  curl -X POST {base}/download \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"url\": \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\", \"format\": \"audio\"}}'");
    println!();
    println!("  curl {base}/status/<task_id>");
    println!("  curl -N {base}/events");

    let server = downloader.spawn_api_server();

    run_with_shutdown((*downloader).clone()).await?;
    server.abort();

    Ok(())
}
