use std::net::SocketAddr;
use std::sync::Arc;
use log::{error, info, warn};
use tokio::net::TcpListener;

use wordsmith::config::ServerConfig;
use wordsmith::server::{self, AppState};
use wordsmith::webhook::{LogSink, WebhookConfig};
use wordsmith::{GeminiClient, RateWindow, ToolAdapter};

#[tokio::main]
async fn main()
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run().await
    {   error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), wordsmith::Error>
{   let config = ServerConfig::from_env()?;
    info!(
      "Starting in {:?} mode, model {}",
      config.environment, config.llm.model
    );
    if !config.supabase_configured()
    {   warn!("Supabase is not configured; billing events are only logged");
    }

    let gemini = GeminiClient::new(
      config.gemini_api_key.clone()
    , config.llm.clone()
    );
    let adapter = ToolAdapter::from_config(Arc::new(gemini), &config.llm);
    let state = AppState::new(
      adapter
    , RateWindow::from_config(&config.rate)
    , Arc::new(LogSink)
    , WebhookConfig::from_server_config(&config)
    );

    let app = server::router(state)
      .layer(server::cors_layer(&config.frontend_url)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(|e| {
      wordsmith::Error::Other(format!("Failed to bind {}: {}", addr, e))
    })?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
      .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
      })
      .await
      .map_err(|e| wordsmith::Error::Other(format!("Server error: {}", e)))
}
