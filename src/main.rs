mod accumulator;
mod chunk;
mod config;
mod driver;
mod error;
mod file_ops;
mod gui;
mod models;
mod offload;
mod reader;
mod session;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chunkhash=info")))
        .init();

    let settings = config::Settings::load()?;
    tracing::info!(chunk_size = settings.chunk_size.get(), algorithm = %settings.algorithm, "starting");

    iced::application(
        "ChunkHash - Chunked File Hasher",
        gui::ChunkHashApp::update,
        gui::ChunkHashApp::view,
    )
    .window(window::Settings {
        size: Size::new(1000.0, 640.0),
        resizable: true,
        ..window::Settings::default()
    })
    .run_with(move || gui::ChunkHashApp::new(settings))
    .map_err(|e| anyhow::anyhow!("running the window: {e}"))
}
