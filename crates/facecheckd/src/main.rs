use anyhow::{Context, Result};
use config::{BusKind, Config};
use dbus_interface::{FaceCheckService, BUS_NAME, OBJECT_PATH};
use facecheck_onnx::OnnxEmbeddingSource;
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;
mod engine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    tracing::info!(bus = config.bus.as_str(), "facecheckd starting");

    // Fail fast: a daemon without models cannot answer anything useful.
    let source = OnnxEmbeddingSource::load(config.source.clone())
        .context("loading face models")?;
    let engine = engine::spawn_engine(source)?;

    let builder = match config.bus {
        BusKind::System => zbus::connection::Builder::system()?,
        BusKind::Session => zbus::connection::Builder::session()?,
    };
    let _connection = builder
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, FaceCheckService::new(engine, config.bus.as_str()))?
        .build()
        .await
        .context("registering on D-Bus")?;

    tracing::info!(name = BUS_NAME, path = OBJECT_PATH, "facecheckd ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("facecheckd shutting down");

    Ok(())
}
