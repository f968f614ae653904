//! Listener bootstrap.
//!
//! Both listeners are bound before either starts serving, metrics first, so
//! a port conflict on either side aborts startup before any traffic is
//! accepted. Once bound, the two accept loops run concurrently and share a
//! single shutdown signal. On shutdown `/readyz` reports 503 for
//! `shutdown.drain_grace_ms` before either listener stops accepting.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::watch;

use promhello_core::error::{PromHelloError, Result};

use crate::app_state::AppState;
use crate::router::{build_app_router, build_metrics_router};

pub struct BoundServer {
    state: AppState,
    app: TcpListener,
    metrics: TcpListener,
}

impl BoundServer {
    /// Bind both listeners from the state's config.
    pub async fn bind(state: AppState) -> Result<Self> {
        let metrics_addr = state.cfg().metrics_addr()?;
        let app_addr = state.cfg().app_addr()?;

        let metrics = bind_listener("metrics", metrics_addr).await?;
        let app = bind_listener("app", app_addr).await?;

        Ok(Self { state, app, metrics })
    }

    pub fn app_addr(&self) -> Result<SocketAddr> {
        local_addr(&self.app)
    }

    pub fn metrics_addr(&self) -> Result<SocketAddr> {
        local_addr(&self.metrics)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` resolves and the drain grace period has passed,
    /// then let in-flight requests finish on both listeners.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = watch::channel(false);
        let state = self.state.clone();
        let grace = state.cfg().shutdown.drain_grace();
        tokio::spawn(async move {
            shutdown.await;
            // Readiness fails first; listeners stay open for the grace period
            // so scrapers and load balancers can observe it.
            state.set_draining();
            tracing::info!(grace_ms = grace.as_millis() as u64, "draining");
            tokio::time::sleep(grace).await;
            tracing::info!("closing listeners");
            let _ = tx.send(true);
        });

        let app_addr = self.app_addr()?;
        let metrics_addr = self.metrics_addr()?;
        tracing::info!(app = %app_addr, metrics = %metrics_addr, "promhello ready");

        let app = axum::serve(self.app, build_app_router(self.state.clone()))
            .with_graceful_shutdown(wait_for(rx.clone()))
            .into_future();
        let metrics = axum::serve(self.metrics, build_metrics_router(self.state))
            .with_graceful_shutdown(wait_for(rx))
            .into_future();

        tokio::try_join!(app, metrics)
            .map_err(|e| PromHelloError::Internal(format!("server failed: {e}")))?;
        tracing::info!("listeners closed");
        Ok(())
    }
}

async fn bind_listener(listener: &'static str, addr: SocketAddr) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(l) => {
            tracing::info!(%listener, %addr, "listener bound");
            Ok(l)
        }
        Err(source) => Err(PromHelloError::Bind { listener, addr, source }),
    }
}

fn local_addr(l: &TcpListener) -> Result<SocketAddr> {
    l.local_addr()
        .map_err(|e| PromHelloError::Internal(format!("local_addr failed: {e}")))
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    // Sender dropped without signalling also ends the wait.
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
