//! promhello server
//!
//! - App listener (default :5000): `GET /` greets and counts requests
//! - Metrics listener (default :8000): `/metrics`, `/healthz`, `/readyz`
//! - Optional `promhello.yaml` in the working directory; `RUST_LOG` for logs

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promhello_core::Result;
use promhello_server::{app_state::AppState, config, server};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "promhello failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_or_default(config::DEFAULT_CONFIG_PATH)?;
    let state = AppState::new(cfg)?;

    tracing::info!("promhello starting");
    let bound = server::BoundServer::bind(state).await?;
    bound.serve(server::shutdown_signal()).await
}
