//! Control panel HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use petdoor_core::constants::DEFAULT_HTTP_BIND;
use petdoor_engine::SharedDoor;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router;
use crate::error::{NetworkError, NetworkResult};

/// Configuration for the control panel server
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_HTTP_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 80))),
        }
    }
}

/// Bound control panel server
#[derive(Debug)]
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    /// Bind to the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if the address is unavailable.
    pub async fn bind(config: HttpServerConfig) -> NetworkResult<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| NetworkError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;

        info!(addr = %config.bind_addr, "control panel listening");
        Ok(Self { listener })
    }

    /// Actual bound address (useful with port 0).
    pub fn local_addr(&self) -> NetworkResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until `shutdown` completes.
    pub async fn serve<F>(self, door: SharedDoor, shutdown: F) -> NetworkResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, create_router(door))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("control panel stopped");
        Ok(())
    }
}
