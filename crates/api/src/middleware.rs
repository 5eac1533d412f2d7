//! Axum-Middleware: Rate Limiting, Sicherheits-Header, CORS

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::VERBORGENE_MELDUNG;
use crate::rate_limit::LimitKlasse;
use crate::ApiState;

/// Content-Security-Policy fuer alle Antworten
pub const CSP: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; script-src 'self'; \
img-src 'self' data: https:; connect-src 'self' https://discord.com wss:; font-src 'self'; \
object-src 'none'; media-src 'self'; frame-src 'none'";

/// Client-IP: erster Eintrag aus `x-forwarded-for`, sonst die Peer-Adresse
pub fn client_ip(req: &Request<Body>) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// 429-Antwort einer Limit-Klasse
pub fn zu_viele_anfragen(klasse: LimitKlasse, retry_after: u64) -> Response {
    let (error, message) = klasse.antworttexte();
    let mut antwort = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response();
    antwort
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    antwort
}

async fn begrenzen(state: &ApiState, klasse: LimitKlasse, req: Request<Body>, next: Next) -> Response {
    let ip = client_ip(&req);
    if let Err(retry_after) = state.limiter.pruefen(klasse, &ip) {
        tracing::warn!(ip = %ip, klasse = ?klasse, retry_after, "Rate-Limit ueberschritten");
        return zu_viele_anfragen(klasse, retry_after);
    }

    let antwort = next.run(req).await;
    // Erfolgreiche Logins zaehlen nicht gegen das Auth-Limit
    if klasse == LimitKlasse::Auth && antwort.status().as_u16() < 400 {
        state.limiter.erstatten(klasse, &ip);
    }
    antwort
}

/// Allgemeines Limit fuer `/api/...`
pub async fn api_limit(State(state): State<ApiState>, req: Request<Body>, next: Next) -> Response {
    begrenzen(&state, LimitKlasse::Allgemein, req, next).await
}

/// Strenges Limit fuer `/auth/...`
pub async fn auth_limit(State(state): State<ApiState>, req: Request<Body>, next: Next) -> Response {
    begrenzen(&state, LimitKlasse::Auth, req, next).await
}

/// Limit fuer Bild-Uploads
pub async fn upload_limit(State(state): State<ApiState>, req: Request<Body>, next: Next) -> Response {
    begrenzen(&state, LimitKlasse::Upload, req, next).await
}

/// Ersetzt im Produktionsmodus die Details von 500er-Antworten
pub async fn interne_fehler_verbergen(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let antwort = next.run(req).await;
    if state.konfig.produktion && antwort.status() == StatusCode::INTERNAL_SERVER_ERROR {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "Internal server error",
                "message": VERBORGENE_MELDUNG,
            })),
        )
            .into_response();
    }
    antwort
}

/// Sicherheits-Header, die jede Antwort bekommt
pub fn sicherheits_header() -> [(HeaderName, HeaderValue); 3] {
    [
        (header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP)),
        // OBS-Browserquellen laden Bilder von fremden Origins
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
    ]
}

/// CORS: entweder die konfigurierten Origins (mit Cookies) oder alle
pub fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
