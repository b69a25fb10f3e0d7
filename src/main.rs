use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod download;
mod error;
mod extractor;
mod info;
mod options;
mod request;
mod util;
mod validate;

pub use error::{Error, Result};

use app::AppState;
use config::Config;
use extractor::Ytdlp;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  if let Err(e) = run().await {
    error!("fatal error: {:#}", e);
    std::process::exit(1);
  }
}

async fn run() -> anyhow::Result<()> {
  let config = Config::from_env().context("failed to load configuration")?;
  info!("using extractor {}", config.ytdlp_path.display());

  let extractor = Arc::new(Ytdlp::new(&config.ytdlp_path));
  let app = app::router(AppState::new(extractor, &config), &config);

  info!("listening on {}", config.bind_addr);
  axum::Server::try_bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?
    .serve(app.into_make_service())
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      error!("failed to listen for ctrl-c: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        error!("failed to listen for SIGTERM: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }

  info!("shutting down");
}
