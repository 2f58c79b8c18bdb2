use std::net::SocketAddr;
use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;

use cardmix::config::AppConfig;
use cardmix::services::audio::{FfmpegEngine, Mixer};
use cardmix::services::{ElevenLabsSynthesizer, HttpTrackFetcher, MixPipeline, SupabasePublisher};
use cardmix::utils::ffmpeg::{ffmpeg_version, locate_ffmpeg};
use cardmix::utils::logger::init_logger;
use cardmix::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = AppConfig::from_env()?;
    tokio::fs::create_dir_all(&config.work_dir).await?;

    let ffmpeg = locate_ffmpeg(config.ffmpeg_path.as_deref())?;
    match ffmpeg_version(&ffmpeg).await {
        Ok(version) => info!("Using {} ({})", ffmpeg.display(), version),
        Err(e) => warn!("Could not query ffmpeg version: {}", e),
    }

    if config.supabase_key.is_empty() {
        warn!("SUPABASE_KEY is not set, uploads will be rejected by storage");
    }
    if config.elevenlabs_api_key.is_empty() {
        warn!("ELEVENLABS_API_KEY is not set, speech synthesis will fail");
    }

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.upstream_timeout() {
        http = http.timeout(timeout);
    }
    let http = http.build()?;

    let mut engine = FfmpegEngine::new(ffmpeg);
    if let Some(limit) = config.max_concurrent_mixes {
        engine = engine.with_max_concurrent(limit);
    }

    let synthesizer = Arc::new(ElevenLabsSynthesizer::new(
        http.clone(),
        config.elevenlabs_base_url.clone(),
        config.elevenlabs_api_key.clone(),
    ));
    let publisher = Arc::new(SupabasePublisher::new(
        http.clone(),
        config.supabase_url.clone(),
        config.supabase_key.clone(),
    ));

    let pipeline = Arc::new(MixPipeline::new(
        synthesizer.clone(),
        Arc::new(HttpTrackFetcher::new(http)),
        Mixer::new(Arc::new(engine)),
        publisher.clone(),
        config.work_dir.clone(),
    ));

    let state = AppState {
        pipeline,
        synthesizer,
        publisher,
        max_upload_bytes: config.max_upload_bytes,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server running on http://localhost:{}", config.port);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
