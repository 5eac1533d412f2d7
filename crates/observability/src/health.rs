//! Health-Check fuer EchoSprite
//!
//! Endpoint: `GET /health`
//! Response: JSON mit Status, Version, Uptime, Datenbank-, Bot- und
//! Viewer-Status. Die REST-API liefert dieselbe Antwort aus.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Status des Health-Checks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Discord-Teil der Health-Antwort
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscordStatus {
    /// `online` oder `offline`
    pub bot: String,
    /// `configured` oder `not configured`
    pub oauth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebsocketStatus {
    pub connections: usize,
}

/// Antwort des Health-Check-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    /// `connected` oder `disconnected`
    pub database: String,
    pub discord: DiscordStatus,
    pub websocket: WebsocketStatus,
}

/// Geteilter Zustand fuer den Health-Check
#[derive(Clone)]
pub struct HealthState {
    pub start_time: Arc<Instant>,
    pub db_connected: Arc<AtomicBool>,
    pub bot_online: Arc<AtomicBool>,
    pub oauth_konfiguriert: Arc<AtomicBool>,
    pub viewer_verbindungen: Arc<AtomicUsize>,
}

impl HealthState {
    pub fn neu() -> Self {
        Self {
            start_time: Arc::new(Instant::now()),
            db_connected: Arc::new(AtomicBool::new(true)),
            bot_online: Arc::new(AtomicBool::new(false)),
            oauth_konfiguriert: Arc::new(AtomicBool::new(false)),
            viewer_verbindungen: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn db_verbunden(&self) -> bool {
        self.db_connected.load(Ordering::Relaxed)
    }

    pub fn db_status_setzen(&self, verbunden: bool) {
        self.db_connected.store(verbunden, Ordering::Relaxed);
    }

    pub fn bot_ist_online(&self) -> bool {
        self.bot_online.load(Ordering::Relaxed)
    }

    pub fn bot_status_setzen(&self, online: bool) {
        self.bot_online.store(online, Ordering::Relaxed);
    }

    pub fn oauth_ist_konfiguriert(&self) -> bool {
        self.oauth_konfiguriert.load(Ordering::Relaxed)
    }

    pub fn oauth_status_setzen(&self, konfiguriert: bool) {
        self.oauth_konfiguriert.store(konfiguriert, Ordering::Relaxed);
    }

    pub fn viewer_verbunden(&self) {
        self.viewer_verbindungen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn viewer_getrennt(&self) {
        // Nie unter 0
        let _ = self
            .viewer_verbindungen
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    pub fn anzahl_viewer(&self) -> usize {
        self.viewer_verbindungen.load(Ordering::Relaxed)
    }

    /// Baut die Health-Antwort aus dem aktuellen Zustand
    pub fn antwort(&self) -> HealthResponse {
        let db = self.db_verbunden();
        HealthResponse {
            status: if db {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.uptime_seconds(),
            database: if db { "connected" } else { "disconnected" }.to_string(),
            discord: DiscordStatus {
                bot: if self.bot_ist_online() { "online" } else { "offline" }.to_string(),
                oauth: if self.oauth_ist_konfiguriert() {
                    "configured"
                } else {
                    "not configured"
                }
                .to_string(),
            },
            websocket: WebsocketStatus {
                connections: self.anzahl_viewer(),
            },
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::neu()
    }
}

/// Axum-Router fuer den `/health`-Endpunkt
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// `GET /health` – gibt den Serverstatus zurueck
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    // 200 auch bei degraded, die Probe soll nicht failen
    (StatusCode::OK, Json(state.antwort()))
}
