//! Saturi Convert Server
//!
//! HTTP server that rewrites text in a Korean regional dialect and narrates it
//! with an OpenAI-compatible speech API.

use anyhow::Result;
use clap::Parser;
use saturi_common::tracing::init_tracing;
use saturi_common::{Config, HttpServerBuilder, ListenArgs};
use saturi_convert::ConvertServer;

/// Command-line arguments for the conversion server.
#[derive(Parser, Debug)]
#[command(name = "saturi-convert")]
#[command(about = "Korean dialect conversion and narration server")]
struct Args {
    /// Listen address configuration
    #[command(flatten)]
    listen: ListenArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads HOST/PORT
    Config::load_dotenv();

    // Parse command-line arguments
    let args = Args::parse();

    init_tracing();

    tracing::info!("saturi-convert server starting...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        base_url = %config.openai_base_url,
        chat_model = %config.chat_model,
        tts_model = %config.tts_model,
        tts_voice = %config.tts_voice,
        audio_output_dir = %config.audio_output_dir.display(),
        runtime_mode = %config.runtime_mode,
        "Configuration loaded"
    );

    let listen = args.listen.into_addr();
    let router = ConvertServer::new(&config).router();

    tracing::info!(listen = %listen, "Starting HTTP server");

    HttpServerBuilder::new(router)
        .with_listen(listen)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
