//! Viewer-WebSocket (`/ws?channelId=` bzw. `/ws?userId=`)

use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    response::Response,
};
use echosprite_protocol::ViewerAbfrage;
use echosprite_signaling::{fehler_senden, viewer_bedienen};

use crate::ApiState;

/// GET /ws – Upgrade und Bedienung bis zum Verbindungsende
pub async fn viewer(
    State(state): State<ApiState>,
    Query(abfrage): Query<ViewerAbfrage>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let abo = match abfrage.abo() {
            Ok(abo) => abo,
            Err(e) => {
                tracing::warn!(fehler = %e, "Viewer ohne gueltiges Abo abgewiesen");
                fehler_senden(socket, e.to_string()).await;
                return;
            }
        };

        state.health.viewer_verbunden();
        state.metriken.viewer_connections.inc();
        viewer_bedienen(socket, abo, state.tracker.clone(), state.broadcaster.clone()).await;
        state.metriken.viewer_connections.dec();
        state.health.viewer_getrennt();
    })
}
