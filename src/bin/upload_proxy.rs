//! Image upload proxy
//!
//! Small standalone server that signs and forwards browser image uploads to
//! the media host, so the API secret never reaches the client. Configured
//! from the environment: `PORT`, `ALLOWED_ORIGIN`, `UPLOAD_SECRET` and the
//! three `CLOUDINARY_*` credentials.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tracing::{info, warn};

use plant_bio::create_upload_router;
use plant_bio::infrastructure::media::CloudinaryClient;
use plant_bio::interfaces::http::modules::upload::UploadState;
use plant_bio::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use plant_bio::UploadConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = UploadConfig::from_env()?;
    if config.cloudinary.is_none() {
        warn!("Cloudinary credentials missing; uploads will fail until they are set");
    }
    if config.upload_secret.is_none() {
        warn!("UPLOAD_SECRET not set; the upload endpoint accepts any caller");
    }

    let allowed_origin = HeaderValue::from_str(&config.allowed_origin)?;
    let state = UploadState {
        uploader: Arc::new(CloudinaryClient::new(config.cloudinary)),
        upload_secret: config.upload_secret,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Upload server running on http://{} (allowed origin {})",
        addr, config.allowed_origin
    );

    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    axum::serve(listener, create_upload_router(state, allowed_origin))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await?;

    info!("👋 Upload server stopped");
    Ok(())
}
