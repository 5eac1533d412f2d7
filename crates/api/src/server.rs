//! Axum HTTP-Server fuer die REST-API

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;

use crate::routes::router;
use crate::ApiState;

/// HTTP-Server der REST-API
pub struct RestServer {
    bind_addr: SocketAddr,
}

impl RestServer {
    pub fn neu(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Startet den Server und laeuft bis `shutdown` abgeschlossen ist
    pub async fn starten(
        self,
        state: ApiState,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "REST-Server gestartet");

        // Peer-Adresse fuer das Rate Limiting ohne Proxy
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        tracing::info!("REST-Server beendet");
        Ok(())
    }
}
