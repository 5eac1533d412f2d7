//! Prometheus-kompatible Metriken fuer EchoSprite
//!
//! Registrierte Metriken:
//! - `echosprite_viewer_connections` – Gauge: Verbundene OBS-Viewer
//! - `echosprite_voice_members` – Gauge: Mitglieder in Voice-Kanaelen
//! - `echosprite_voice_events_total` – Counter: Verarbeitete Voice-Ereignisse
//! - `echosprite_slash_commands_total` – Counter: Slash-Befehle (command)
//! - `echosprite_http_requests_total` – Counter: HTTP-Anfragen (method, status)
//! - `echosprite_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit (method)

use anyhow::Result;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Alle EchoSprite-Prometheus-Metriken
#[derive(Clone)]
pub struct EchoSpriteMetrics {
    pub registry: Arc<Registry>,

    pub viewer_connections: IntGauge,
    pub voice_members: IntGauge,
    pub voice_events_total: IntCounter,
    pub slash_commands_total: IntCounterVec,

    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl EchoSpriteMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Viewer / Voice ---
        let viewer_connections = IntGauge::with_opts(Opts::new(
            "echosprite_viewer_connections",
            "Anzahl verbundener OBS-Viewer",
        ))?;
        registry.register(Box::new(viewer_connections.clone()))?;

        let voice_members = IntGauge::with_opts(Opts::new(
            "echosprite_voice_members",
            "Anzahl Mitglieder in beobachteten Voice-Kanaelen",
        ))?;
        registry.register(Box::new(voice_members.clone()))?;

        let voice_events_total = IntCounter::with_opts(Opts::new(
            "echosprite_voice_events_total",
            "Gesamtanzahl verarbeiteter Voice-Ereignisse",
        ))?;
        registry.register(Box::new(voice_events_total.clone()))?;

        // --- Bot ---
        let slash_commands_total = IntCounterVec::new(
            Opts::new(
                "echosprite_slash_commands_total",
                "Gesamtanzahl ausgefuehrter Slash-Befehle",
            ),
            &["command"],
        )?;
        registry.register(Box::new(slash_commands_total.clone()))?;

        // --- HTTP ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("echosprite_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "echosprite_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            viewer_connections,
            voice_members,
            voice_events_total,
            slash_commands_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen ausgefuehrten Slash-Befehl
    pub fn befehl_zaehlen(&self, befehl: &str) {
        self.slash_commands_total.with_label_values(&[befehl]).inc();
    }

    /// Erfasst eine abgeschlossene HTTP-Anfrage
    pub fn anfrage_erfassen(&self, methode: &str, status: u16, dauer_sekunden: f64) {
        self.http_requests_total
            .with_label_values(&[methode, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[methode])
            .observe(dauer_sekunden);
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: EchoSpriteMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<EchoSpriteMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            axum::http::StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
