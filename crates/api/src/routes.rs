//! Route-Definitionen und Layer-Aufbau der REST-API

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use echosprite_observability::timing_middleware;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{
    api_limit, auth_limit, cors, interne_fehler_verbergen, sicherheits_header, upload_limit,
};
use crate::ApiState;

/// Maximale Groesse eines Request-Bodys (vier Bilder als Daten-URL)
pub const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

fn auth_router(state: &ApiState) -> Router<ApiState> {
    Router::new()
        .route("/auth/discord", get(handlers::auth::login))
        .route("/auth/discord/callback", get(handlers::auth::callback))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", get(handlers::auth::logout))
        .route_layer(from_fn_with_state(state.clone(), auth_limit))
}

fn api_router(state: &ApiState) -> Router<ApiState> {
    let upload = || from_fn_with_state(state.clone(), upload_limit);

    Router::new()
        // Avatare
        .route(
            "/api/avatar",
            put(handlers::avatar::hochladen)
                .route_layer(upload())
                .delete(handlers::avatar::loeschen),
        )
        .route("/api/avatar/:discord_id", get(handlers::avatar::abrufen))
        // Voice
        .route(
            "/api/channel/:channel_id/members",
            get(handlers::channel::mitglieder),
        )
        .route("/api/voice/speaking", put(handlers::avatar::sprechen))
        // Anonyme Konfigurationen
        .route(
            "/api/avatar-config",
            post(handlers::config::speichern).route_layer(upload()),
        )
        .route("/api/avatar-config/:public_id", get(handlers::config::laden))
        .route(
            "/api/avatar-config/:public_id/stats",
            get(handlers::config::statistik),
        )
        // Chat
        .route("/api/lumimon/chat", post(handlers::chat::lumimon))
        .route("/api/monster/chat", post(handlers::chat::monster))
        // Admin
        .route("/api/admin/users", get(handlers::admin::benutzer))
        .route("/api/admin/stats", get(handlers::admin::statistik))
        .route_layer(from_fn_with_state(state.clone(), api_limit))
}

/// Erstellt den vollstaendigen Router mit allen Layern
pub fn router(state: ApiState) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::info::index))
        .route("/health", get(handlers::info::health))
        .route("/ws", get(handlers::ws::viewer))
        .merge(auth_router(&state))
        .merge(api_router(&state))
        .layer(from_fn_with_state(state.clone(), interne_fehler_verbergen))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn_with_state(state.metriken.clone(), timing_middleware));

    for (name, wert) in sicherheits_header() {
        app = app.layer(SetResponseHeaderLayer::if_not_present(name, wert));
    }

    app.layer(cors(&state.konfig.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
